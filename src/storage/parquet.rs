//! Parquet snapshot that preserves vertex and edge ids
//!
//! Based on `DuckDB` (Raasveldt et al., SIGMOD 2019) columnar storage patterns.
//!
//! # Format
//!
//! Graphs are stored as two Parquet files:
//! - `{path}_vertices.parquet`: (`vertex_id`)
//! - `{path}_edges.parquet`: (`edge_id`, source, target, cost, shadowed)
//!
//! Only rows with `shadowed = false` are replayed into the adjacency index;
//! shadowed rows are restored as edge records alone, so the index after a
//! read matches the one that was written.

use super::{EdgeId, EdgeInfo, Graph, VertexId};
use crate::error::{GraphError, Result};
use arrow::array::{Array, BooleanArray, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

impl Graph {
    /// Write graph to Parquet files
    ///
    /// Creates two files:
    /// - `{path}_vertices.parquet`: Vertex ids
    /// - `{path}_edges.parquet`: Edge table (`edge_id`, source, target, cost, shadowed)
    ///
    /// # Errors
    ///
    /// Returns error if file I/O fails or Arrow conversion fails
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let base_path = path.as_ref();

        self.write_vertices_parquet(base_path)?;
        self.write_edges_parquet(base_path)?;

        debug!(
            path = %base_path.display(),
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            "wrote parquet snapshot"
        );
        Ok(())
    }

    /// Read graph from Parquet files
    ///
    /// # Errors
    ///
    /// Returns error if files don't exist, Arrow conversion fails, or the
    /// snapshot references unknown vertices or repeats ids
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref();
        let mut graph = Self::new();

        for vertex in Self::read_vertices_parquet(base_path)? {
            graph.add_vertex(vertex)?;
        }

        let mut shadowed = Vec::new();
        for (edge, info, is_shadowed) in Self::read_edges_parquet(base_path)? {
            if is_shadowed {
                shadowed.push((edge, info));
            } else {
                graph.add_edge(edge, info.source, info.target, info.cost)?;
            }
        }
        for (edge, info) in shadowed {
            graph.insert_shadowed_edge(edge, info)?;
        }

        debug!(
            path = %base_path.display(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "read parquet snapshot"
        );
        Ok(graph)
    }

    fn write_vertices_parquet(&self, base_path: &Path) -> Result<()> {
        let vertices_path = suffixed(base_path, "vertices");

        let vertex_ids: Vec<i64> = self.vertex_iterator().map(|v| v.0).collect();

        let schema = Arc::new(Schema::new(vec![Field::new(
            "vertex_id",
            DataType::Int64,
            false,
        )]));

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Int64Array::from(vertex_ids))],
        )?;

        write_batch(&vertices_path, schema, &batch)
    }

    fn write_edges_parquet(&self, base_path: &Path) -> Result<()> {
        let edges_path = suffixed(base_path, "edges");

        let mut edge_ids = Vec::with_capacity(self.edge_count());
        let mut sources = Vec::with_capacity(self.edge_count());
        let mut targets = Vec::with_capacity(self.edge_count());
        let mut costs = Vec::with_capacity(self.edge_count());
        let mut shadowed = Vec::with_capacity(self.edge_count());

        for edge in self.edge_iterator() {
            let info = self.get_edge_info(edge)?;
            edge_ids.push(edge.0);
            sources.push(info.source.0);
            targets.push(info.target.0);
            costs.push(info.cost);
            shadowed.push(self.is_shadowed(edge));
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("edge_id", DataType::Int64, false),
            Field::new("source", DataType::Int64, false),
            Field::new("target", DataType::Int64, false),
            Field::new("cost", DataType::Int64, false),
            Field::new("shadowed", DataType::Boolean, false),
        ]));

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(edge_ids)),
                Arc::new(Int64Array::from(sources)),
                Arc::new(Int64Array::from(targets)),
                Arc::new(Int64Array::from(costs)),
                Arc::new(BooleanArray::from(shadowed)),
            ],
        )?;

        write_batch(&edges_path, schema, &batch)
    }

    fn read_vertices_parquet(base_path: &Path) -> Result<Vec<VertexId>> {
        let mut vertices = Vec::new();

        for batch in read_batches(&suffixed(base_path, "vertices"))? {
            let ids = int64_column(&batch, 0, "vertex_id")?;
            vertices.extend(ids.values().iter().map(|&id| VertexId(id)));
        }

        Ok(vertices)
    }

    fn read_edges_parquet(base_path: &Path) -> Result<Vec<(EdgeId, EdgeInfo, bool)>> {
        let mut edges = Vec::new();

        for batch in read_batches(&suffixed(base_path, "edges"))? {
            let edge_ids = int64_column(&batch, 0, "edge_id")?;
            let sources = int64_column(&batch, 1, "source")?;
            let targets = int64_column(&batch, 2, "target")?;
            let costs = int64_column(&batch, 3, "cost")?;
            let shadowed = bool_column(&batch, 4, "shadowed")?;

            for i in 0..batch.num_rows() {
                edges.push((
                    EdgeId(edge_ids.value(i)),
                    EdgeInfo {
                        source: VertexId(sources.value(i)),
                        target: VertexId(targets.value(i)),
                        cost: costs.value(i),
                    },
                    shadowed.value(i),
                ));
            }
        }

        Ok(edges)
    }
}

fn suffixed(base_path: &Path, kind: &str) -> PathBuf {
    PathBuf::from(format!("{}_{kind}.parquet", base_path.display()))
}

fn write_batch(path: &Path, schema: Arc<Schema>, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(
            parquet::basic::ZstdLevel::try_new(3)?,
        ))
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    Ok(())
}

fn read_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path).map_err(|source| GraphError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(batch_result?);
    }
    Ok(batches)
}

fn int64_column<'a>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a Int64Array> {
    typed_column(batch, index, name)
}

fn bool_column<'a>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a BooleanArray> {
    typed_column(batch, index, name)
}

fn typed_column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    index: usize,
    name: &str,
) -> Result<&'a T> {
    if batch.num_columns() <= index {
        return Err(ArrowError::SchemaError(format!("Missing {name} column")).into());
    }

    let column = batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ArrowError::SchemaError(format!("Invalid {name} column type")))?;

    if column.null_count() > 0 {
        return Err(ArrowError::SchemaError(format!("Null values in {name} column")).into());
    }

    Ok(column)
}
