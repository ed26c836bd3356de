//! Error types for graph operations and persistence

use crate::storage::{EdgeId, VertexId};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GraphError>;

/// Which argument of an operation referred to a missing vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRole {
    /// Source endpoint of an edge
    Source,
    /// Target endpoint of an edge
    Target,
    /// Vertex argument of a vertex-keyed operation
    Vertex,
}

impl fmt::Display for VertexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Source => "source",
            Self::Target => "target",
            Self::Vertex => "vertex",
        };
        f.write_str(name)
    }
}

/// Graph container errors
#[derive(Debug, Error)]
pub enum GraphError {
    /// Vertex id does not exist, already exists (on insert), or has no edge to it (`get_edge`)
    #[error("Invalid {role} vertex id {id}")]
    InvalidVertex {
        /// Rejected vertex id
        id: VertexId,
        /// Argument the id was passed as
        role: VertexRole,
    },

    /// Edge id does not exist, or already exists (on insert)
    #[error("Invalid edge id {id}")]
    InvalidEdge {
        /// Rejected edge id
        id: EdgeId,
    },

    /// Graph file could not be opened for reading
    #[error("File {} is not found", path.display())]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
        /// Underlying open failure
        #[source]
        source: io::Error,
    },

    /// Graph file could not be created, written, or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// Line in a graph file does not match the expected layout
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the file
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Parquet encoding or decoding failed
    #[cfg(feature = "storage")]
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow batch construction or column access failed
    #[cfg(feature = "storage")]
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

impl GraphError {
    pub(crate) const fn invalid_vertex(id: VertexId, role: VertexRole) -> Self {
        Self::InvalidVertex { id, role }
    }

    pub(crate) const fn invalid_edge(id: EdgeId) -> Self {
        Self::InvalidEdge { id }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// True for [`GraphError::InvalidVertex`]
    #[must_use]
    pub const fn is_invalid_vertex(&self) -> bool {
        matches!(self, Self::InvalidVertex { .. })
    }

    /// True for [`GraphError::InvalidEdge`]
    #[must_use]
    pub const fn is_invalid_edge(&self) -> bool {
        matches!(self, Self::InvalidEdge { .. })
    }

    /// True for [`GraphError::Parse`]
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
