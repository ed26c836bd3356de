//! Hash-indexed directed graph with caller-chosen vertex and edge ids
//!
//! # Index layout
//!
//! ```text
//! Graph: e10 = 0 → 1 (cost 5), e11 = 0 → 2 (cost -1), e12 = 2 → 2 (cost 0)
//!
//!   out_edges: {0: {1: e10, 2: e11}, 1: {}, 2: {2: e12}}
//!   in_edges:  {0: {}, 1: {0: e10}, 2: {0: e11, 2: e12}}
//!   edge_info: {e10: (0, 1, 5), e11: (0, 2, -1), e12: (2, 2, 0)}
//! ```
//!
//! Every vertex owns exactly one (possibly empty) entry in both adjacency maps,
//! and every edge reachable through them satisfies
//! `out_edges[s][t] == e` and `in_edges[t][s] == e`.

use crate::error::{GraphError, Result, VertexRole};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{trace, warn};

/// Vertex identifier (caller-chosen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub i64);

/// Edge identifier (caller-chosen, independent of the vertex namespace)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub i64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for VertexId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for EdgeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Edge-table record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo {
    /// Source vertex
    pub source: VertexId,
    /// Target vertex
    pub target: VertexId,
    /// Edge cost (sign unconstrained)
    pub cost: i64,
}

type Adjacency = HashMap<VertexId, HashMap<VertexId, EdgeId>>;

/// Directed, edge-weighted graph
///
/// At most one edge is indexed per ordered `(source, target)` pair. Adding a
/// second edge between the same pair re-points both adjacency entries at the
/// new edge; the displaced edge keeps its edge-table record and is reported
/// by [`Graph::is_shadowed`].
///
/// Iterators borrow the graph immutably, so the graph cannot be mutated while
/// one is alive.
///
/// # Example
///
/// ```
/// use weighted_digraph::{EdgeId, Graph, VertexId};
///
/// let mut graph = Graph::new();
/// graph.add_vertex(VertexId(0)).unwrap();
/// graph.add_vertex(VertexId(1)).unwrap();
/// graph.add_edge(EdgeId(10), VertexId(0), VertexId(1), 5).unwrap();
///
/// assert_eq!(graph.get_edge(VertexId(0), VertexId(1)).unwrap(), EdgeId(10));
/// assert_eq!(graph.get_edge_cost(EdgeId(10)).unwrap(), 5);
/// assert_eq!(graph.get_out_degree(VertexId(0)).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Current vertex ids
    vertex_ids: HashSet<VertexId>,

    /// Forward index: source → (target → edge)
    out_edges: Adjacency,

    /// Reverse index: target → (source → edge)
    in_edges: Adjacency,

    /// Edge table; its keys are the current edge ids
    edge_info: HashMap<EdgeId, EdgeInfo>,

    /// Edges whose adjacency entries were taken over by a later edge
    shadowed: HashSet<EdgeId>,
}

impl Graph {
    /// Create new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new empty graph with room for `vertices` vertices
    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertex_ids: HashSet::with_capacity(vertices),
            out_edges: HashMap::with_capacity(vertices),
            in_edges: HashMap::with_capacity(vertices),
            ..Self::default()
        }
    }

    /// Get number of vertices
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_ids.len()
    }

    /// Get number of edges, shadowed edges included
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_info.len()
    }

    /// True when the graph has no vertices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_ids.is_empty()
    }

    /// Check whether `vertex` is a current vertex id
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertex_ids.contains(&vertex)
    }

    /// Check whether `edge` is a current edge id
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edge_info.contains_key(&edge)
    }

    /// Check whether `edge` exists but lost its adjacency entries to a later
    /// edge between the same ordered pair
    #[must_use]
    pub fn is_shadowed(&self, edge: EdgeId) -> bool {
        self.shadowed.contains(&edge)
    }

    /// Iterate over all vertex ids (unspecified order)
    pub fn vertex_iterator(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_ids.iter().copied()
    }

    /// Iterate over all edge ids (unspecified order)
    pub fn edge_iterator(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_info.keys().copied()
    }

    /// Get the edge from `source` to `target`
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` (role `Source`) if `source` is not a vertex, and
    /// `InvalidVertex` (role `Target`) if `target` is not a vertex or no edge
    /// from `source` reaches it
    pub fn get_edge(&self, source: VertexId, target: VertexId) -> Result<EdgeId> {
        let targets = self
            .out_edges
            .get(&source)
            .ok_or(GraphError::invalid_vertex(source, VertexRole::Source))?;

        targets
            .get(&target)
            .copied()
            .ok_or(GraphError::invalid_vertex(target, VertexRole::Target))
    }

    /// Count edges whose target is `vertex`
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` if `vertex` does not exist
    pub fn get_in_degree(&self, vertex: VertexId) -> Result<usize> {
        Self::adjacency_of(&self.in_edges, vertex).map(HashMap::len)
    }

    /// Count edges whose source is `vertex`
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` if `vertex` does not exist
    pub fn get_out_degree(&self, vertex: VertexId) -> Result<usize> {
        Self::adjacency_of(&self.out_edges, vertex).map(HashMap::len)
    }

    /// Iterate over the sources of all edges into `vertex`
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` if `vertex` does not exist
    pub fn ingoing_edge_iterator(
        &self,
        vertex: VertexId,
    ) -> Result<impl Iterator<Item = VertexId> + '_> {
        Ok(Self::adjacency_of(&self.in_edges, vertex)?.keys().copied())
    }

    /// Iterate over the targets of all edges out of `vertex`
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` if `vertex` does not exist
    pub fn outgoing_edge_iterator(
        &self,
        vertex: VertexId,
    ) -> Result<impl Iterator<Item = VertexId> + '_> {
        Ok(Self::adjacency_of(&self.out_edges, vertex)?.keys().copied())
    }

    /// Get the edge-table record for `edge`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdge` if `edge` does not exist
    pub fn get_edge_info(&self, edge: EdgeId) -> Result<&EdgeInfo> {
        self.edge_info
            .get(&edge)
            .ok_or(GraphError::invalid_edge(edge))
    }

    /// Get `(source, target)` of `edge`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdge` if `edge` does not exist
    pub fn get_endpoints(&self, edge: EdgeId) -> Result<(VertexId, VertexId)> {
        self.get_edge_info(edge).map(|info| (info.source, info.target))
    }

    /// Get cost of `edge`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdge` if `edge` does not exist
    pub fn get_edge_cost(&self, edge: EdgeId) -> Result<i64> {
        self.get_edge_info(edge).map(|info| info.cost)
    }

    /// Overwrite cost of `edge`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdge` if `edge` does not exist
    pub fn set_edge_cost(&mut self, edge: EdgeId, new_cost: i64) -> Result<()> {
        let info = self
            .edge_info
            .get_mut(&edge)
            .ok_or(GraphError::invalid_edge(edge))?;
        info.cost = new_cost;
        Ok(())
    }

    /// Add an isolated vertex
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` if `vertex` already exists
    pub fn add_vertex(&mut self, vertex: VertexId) -> Result<()> {
        if !self.vertex_ids.insert(vertex) {
            return Err(GraphError::invalid_vertex(vertex, VertexRole::Vertex));
        }

        self.out_edges.insert(vertex, HashMap::new());
        self.in_edges.insert(vertex, HashMap::new());
        Ok(())
    }

    /// Remove `vertex` and every edge incident to it
    ///
    /// # Errors
    ///
    /// Returns `InvalidVertex` if `vertex` does not exist
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<()> {
        if !self.vertex_ids.remove(&vertex) {
            return Err(GraphError::invalid_vertex(vertex, VertexRole::Vertex));
        }

        let incoming = self.in_edges.remove(&vertex).unwrap_or_default();
        let outgoing = self.out_edges.remove(&vertex).unwrap_or_default();

        for (source, edge) in incoming {
            if let Some(targets) = self.out_edges.get_mut(&source) {
                targets.remove(&vertex);
            }
            self.edge_info.remove(&edge);
            trace!(edge = %edge, vertex = %vertex, "cascaded incoming edge removal");
        }

        for (target, edge) in outgoing {
            if let Some(sources) = self.in_edges.get_mut(&target) {
                sources.remove(&vertex);
            }
            // Self-loops were already dropped with the incoming entries
            self.edge_info.remove(&edge);
            trace!(edge = %edge, vertex = %vertex, "cascaded outgoing edge removal");
        }

        let edge_info = &mut self.edge_info;
        self.shadowed.retain(|edge| {
            let incident = edge_info
                .get(edge)
                .is_some_and(|info| info.source == vertex || info.target == vertex);
            if incident {
                edge_info.remove(edge);
            }
            !incident
        });

        Ok(())
    }

    /// Add edge `edge` from `source` to `target`
    ///
    /// Self-loops are allowed. If an edge from `source` to `target` already
    /// exists, the new edge takes over both adjacency entries and the old one
    /// becomes shadowed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdge` if `edge` already exists, and `InvalidVertex` if
    /// `source` or `target` does not exist. Nothing is modified on error.
    pub fn add_edge(
        &mut self,
        edge: EdgeId,
        source: VertexId,
        target: VertexId,
        cost: i64,
    ) -> Result<()> {
        if self.edge_info.contains_key(&edge) {
            return Err(GraphError::invalid_edge(edge));
        }
        if !self.vertex_ids.contains(&source) {
            return Err(GraphError::invalid_vertex(source, VertexRole::Source));
        }
        if !self.vertex_ids.contains(&target) {
            return Err(GraphError::invalid_vertex(target, VertexRole::Target));
        }

        self.edge_info.insert(
            edge,
            EdgeInfo {
                source,
                target,
                cost,
            },
        );
        let displaced = self
            .out_edges
            .entry(source)
            .or_default()
            .insert(target, edge);
        self.in_edges.entry(target).or_default().insert(source, edge);

        if let Some(previous) = displaced {
            warn!(
                previous = %previous,
                edge = %edge,
                source = %source,
                target = %target,
                "edge replaces existing edge between the same vertices in the adjacency index"
            );
            self.shadowed.insert(previous);
        }

        Ok(())
    }

    /// Remove `edge`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdge` if `edge` does not exist
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<()> {
        let info = self
            .edge_info
            .remove(&edge)
            .ok_or(GraphError::invalid_edge(edge))?;

        // Adjacency entries of a shadowed edge belong to the edge that replaced it
        if self.shadowed.remove(&edge) {
            return Ok(());
        }

        if let Some(targets) = self.out_edges.get_mut(&info.source) {
            targets.remove(&info.target);
        }
        if let Some(sources) = self.in_edges.get_mut(&info.target) {
            sources.remove(&info.source);
        }

        Ok(())
    }

    /// Remove all vertices and edges
    pub fn clear_graph(&mut self) {
        self.vertex_ids.clear();
        self.out_edges.clear();
        self.in_edges.clear();
        self.edge_info.clear();
        self.shadowed.clear();
    }

    /// Restore a shadowed edge record without touching the adjacency index
    ///
    /// Same validation as [`Graph::add_edge`].
    #[cfg_attr(not(feature = "storage"), allow(dead_code))]
    pub(crate) fn insert_shadowed_edge(&mut self, edge: EdgeId, info: EdgeInfo) -> Result<()> {
        if self.edge_info.contains_key(&edge) {
            return Err(GraphError::invalid_edge(edge));
        }
        if !self.vertex_ids.contains(&info.source) {
            return Err(GraphError::invalid_vertex(info.source, VertexRole::Source));
        }
        if !self.vertex_ids.contains(&info.target) {
            return Err(GraphError::invalid_vertex(info.target, VertexRole::Target));
        }

        self.edge_info.insert(edge, info);
        self.shadowed.insert(edge);
        Ok(())
    }

    /// Edges reachable through the forward index, grouped by source vertex
    pub(crate) fn indexed_edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeInfo)> + '_ {
        self.vertex_ids
            .iter()
            .filter_map(|vertex| self.out_edges.get(vertex))
            .flat_map(HashMap::values)
            .filter_map(|edge| self.edge_info.get(edge).map(|info| (*edge, info)))
    }

    fn adjacency_of(
        index: &Adjacency,
        vertex: VertexId,
    ) -> Result<&HashMap<VertexId, EdgeId>> {
        index
            .get(&vertex)
            .ok_or(GraphError::invalid_vertex(vertex, VertexRole::Vertex))
    }
}
