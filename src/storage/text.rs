//! Plain-text graph persistence
//!
//! # Format
//!
//! ```text
//! <vertex_count> <edge_count>
//! <source_0> <target_0> <cost_0>
//! <source_1> <target_1> <cost_1>
//! ...
//! ```
//!
//! Vertex ids are remapped to `0..vertex_count` on save, so a save/load round
//! trip preserves topology and costs but not the original ids. On load, edge
//! ids are the zero-based position of each edge line. Only the first header
//! token is read back.

use super::{EdgeId, Graph, VertexId};
use crate::error::{GraphError, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Largest vertex count accepted in a header (graphs >4B vertices not supported)
pub const MAX_VERTEX_COUNT: u32 = u32::MAX;

/// Upper bound on vertices pre-allocated from a header before any are added
const PRESIZE_LIMIT: usize = 1 << 20;

impl Graph {
    /// Write graph to a text file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be created or written
    pub fn save_graph<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source: io::Error| GraphError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.write_text(&mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        debug!(
            path = %path.display(),
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            "saved graph"
        );
        Ok(())
    }

    /// Replace this graph with the contents of a text file
    ///
    /// The file is parsed completely before `self` is touched, so on error the
    /// current graph is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file cannot be opened, `Io` if reading
    /// fails, `Parse` for malformed lines and `InvalidVertex` for edges that
    /// reference vertices outside the declared range
    pub fn load_graph<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::read_text(path)?;
        Ok(())
    }

    /// Read a graph from a text file
    ///
    /// # Errors
    ///
    /// Same as [`Graph::load_graph`]
    pub fn read_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|source| GraphError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|source| GraphError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let graph = Self::from_text_str(&text)?;
        debug!(
            path = %path.display(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "loaded graph"
        );
        Ok(graph)
    }

    /// Async variant of [`Graph::save_graph`]
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be created or written
    pub async fn save_graph_async<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_text_string();

        tokio::fs::write(path, text)
            .await
            .map_err(|source| GraphError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), vertices = self.vertex_count(), "saved graph");
        Ok(())
    }

    /// Async variant of [`Graph::load_graph`]
    ///
    /// # Errors
    ///
    /// Same as [`Graph::load_graph`]
    pub async fn load_graph_async<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|source| GraphError::FileNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .await
            .map_err(|source| GraphError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        *self = Self::from_text_str(&text)?;
        debug!(path = %path.display(), vertices = self.vertex_count(), "loaded graph");
        Ok(())
    }

    /// Encode graph in the text format
    ///
    /// Vertices are numbered in iteration order; edges are written per source
    /// vertex. Shadowed edges count towards the header but get no line.
    ///
    /// # Errors
    ///
    /// Propagates errors from `writer`
    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }

    /// Encode graph in the text format into a string
    #[must_use]
    pub fn to_text_string(&self) -> String {
        self.to_string()
    }

    /// Decode a graph from text
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed lines or a vertex count above
    /// [`MAX_VERTEX_COUNT`], and `InvalidVertex` for edges that reference
    /// vertices outside the declared range
    ///
    /// # Example
    ///
    /// ```
    /// use weighted_digraph::{EdgeId, Graph, VertexId};
    ///
    /// let graph = Graph::from_text_str("3 2\n0 1 4\n2 0 -1\n").unwrap();
    ///
    /// assert_eq!(graph.vertex_count(), 3);
    /// assert_eq!(graph.get_edge(VertexId(2), VertexId(0)).unwrap(), EdgeId(1));
    /// assert_eq!(graph.get_edge_cost(EdgeId(1)).unwrap(), -1);
    /// ```
    pub fn from_text_str(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| GraphError::parse(1, "missing header line"))?;
        let vertex_count = parse_vertex_count(header)?;

        let capacity =
            usize::try_from(vertex_count).map_or(PRESIZE_LIMIT, |n| n.min(PRESIZE_LIMIT));
        let mut graph = Self::with_capacity(capacity);
        for id in 0..vertex_count {
            graph.add_vertex(VertexId(i64::from(id)))?;
        }

        let mut next_edge = 0_i64;
        for (index, line) in lines {
            if line.trim().is_empty() {
                continue;
            }

            let (source, target, cost) = parse_edge_line(line, index + 1)?;
            graph.add_edge(EdgeId(next_edge), VertexId(source), VertexId(target), cost)?;
            next_edge += 1;
        }

        Ok(graph)
    }
}

/// Text format encoding, see the module docs
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dense: HashMap<VertexId, usize> = self
            .vertex_iterator()
            .enumerate()
            .map(|(index, vertex)| (vertex, index))
            .collect();

        writeln!(f, "{} {}", self.vertex_count(), self.edge_count())?;

        for (_, info) in self.indexed_edges() {
            if let (Some(source), Some(target)) = (dense.get(&info.source), dense.get(&info.target))
            {
                writeln!(f, "{source} {target} {}", info.cost)?;
            }
        }

        Ok(())
    }
}

impl FromStr for Graph {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text_str(s)
    }
}

fn parse_vertex_count(header: &str) -> Result<u32> {
    let token = header
        .split_whitespace()
        .next()
        .ok_or_else(|| GraphError::parse(1, "empty header line"))?;

    let count: i64 = token
        .parse()
        .map_err(|e| GraphError::parse(1, format!("invalid vertex count {token:?}: {e}")))?;
    if count < 0 {
        return Err(GraphError::parse(1, format!("negative vertex count {count}")));
    }

    u32::try_from(count).map_err(|_| {
        GraphError::parse(
            1,
            format!("vertex count {count} exceeds limit {MAX_VERTEX_COUNT}"),
        )
    })
}

fn parse_edge_line(line: &str, line_no: usize) -> Result<(i64, i64, i64)> {
    let mut tokens = line.split_whitespace();

    let source = parse_token(&mut tokens, line_no, "source")?;
    let target = parse_token(&mut tokens, line_no, "target")?;
    let cost = parse_token(&mut tokens, line_no, "cost")?;

    if tokens.next().is_some() {
        return Err(GraphError::parse(
            line_no,
            "expected exactly three tokens: source target cost",
        ));
    }

    Ok((source, target, cost))
}

fn parse_token(tokens: &mut SplitWhitespace<'_>, line_no: usize, field: &str) -> Result<i64> {
    let token = tokens
        .next()
        .ok_or_else(|| GraphError::parse(line_no, format!("missing {field}")))?;

    token
        .parse()
        .map_err(|e| GraphError::parse(line_no, format!("invalid {field} {token:?}: {e}")))
}
