
/*!
The partial-order DAG underlying the consensus engine.

Two permanent sentinel vertices frame every read: `enter` (the only source)
and `exit` (the only sink). Each internal vertex carries one DNA base plus
read-coverage bookkeeping, so that every path from `enter` to `exit` spells
out one plausible sequence over the reads folded in so far.
*/

use log::trace;
use petgraph::graph::NodeIndex;
use petgraph::visit::Topo;
use petgraph::{Directed, Graph, Incoming, Outgoing};
use rustc_hash::FxHashSet as HashSet;

/// Stable handle to a vertex; vertices are never removed, so handles stay valid
/// for the lifetime of the graph.
pub type VertexIndex = NodeIndex<usize>;

/// Base label used for the `enter` sentinel in rendered output
pub const ENTER_BASE: u8 = b'^';
/// Base label used for the `exit` sentinel in rendered output
pub const EXIT_BASE: u8 = b'$';

/// GraphViz flag: fill consensus-path vertices
pub const COLOR_NODES: u32 = 0x1;
/// GraphViz flag: render id, coverage and score details per vertex
pub const VERBOSE_NODES: u32 = 0x2;

/// Per-vertex bookkeeping for one aligned position in consensus-space.
#[derive(Clone, Debug)]
pub struct PoaVertex {
    /// The base this vertex represents; `^`/`$` for the sentinels
    pub base: u8,
    /// Number of reads that pass through this vertex at a match position
    pub reads: usize,
    /// Number of reads whose aligned extent covers this vertex
    pub spanning_reads: usize,
    /// Per-vertex score; only meaningful after consensus extraction
    pub score: f32,
    /// Best score reachable along any incoming path; only meaningful after consensus extraction
    pub reaching_score: f32
}

impl PoaVertex {
    fn new(base: u8, reads: usize) -> PoaVertex {
        PoaVertex {
            base,
            reads,
            spanning_reads: 0,
            score: 0.0,
            reaching_score: 0.0
        }
    }
}

/// The partial-order DAG plus its two sentinels and the count of folded-in reads.
///
/// All mutation goes through the read-threading entry points; external callers
/// only ever hold [`VertexIndex`] handles.
#[derive(Clone, Debug)]
pub struct PoaGraph {
    /// The DAG itself; vertex and edge insertion order is load-bearing for determinism
    dag: Graph<PoaVertex, (), Directed, usize>,
    /// The unique source vertex
    enter: VertexIndex,
    /// The unique sink vertex
    exit: VertexIndex,
    /// Number of reads folded into the graph so far
    num_reads: usize
}

impl Default for PoaGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PoaGraph {
    /// Creates a graph containing only the two sentinels.
    pub fn new() -> PoaGraph {
        let mut dag = Graph::default();
        let enter = dag.add_node(PoaVertex::new(ENTER_BASE, 0));
        let exit = dag.add_node(PoaVertex::new(EXIT_BASE, 0));
        PoaGraph {
            dag,
            enter,
            exit,
            num_reads: 0
        }
    }

    /// Adds a vertex for one read base, seen by exactly one read so far.
    pub(crate) fn add_base_vertex(&mut self, base: u8) -> VertexIndex {
        self.dag.add_node(PoaVertex::new(base, 1))
    }

    /// Adds the edge `u -> v` unless it already exists. Threading only ever
    /// links vertices that are topologically ordered, so the graph stays acyclic.
    pub(crate) fn link(&mut self, u: VertexIndex, v: VertexIndex) {
        if !self.dag.contains_edge(u, v) {
            trace!("link {} -> {}", u.index(), v.index());
            self.dag.add_edge(u, v, ());
        }
    }

    /// Bumps the folded-read counter; called once per successfully threaded read.
    pub(crate) fn count_read(&mut self) {
        self.num_reads += 1;
    }

    // getters
    pub fn enter_vertex(&self) -> VertexIndex {
        self.enter
    }

    pub fn exit_vertex(&self) -> VertexIndex {
        self.exit
    }

    pub fn is_sentinel(&self, v: VertexIndex) -> bool {
        v == self.enter || v == self.exit
    }

    pub fn num_reads(&self) -> usize {
        self.num_reads
    }

    pub fn num_vertices(&self) -> usize {
        self.dag.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.dag.edge_count()
    }

    /// Immutable access to the bookkeeping record of one vertex.
    pub fn vertex(&self, v: VertexIndex) -> &PoaVertex {
        &self.dag[v]
    }

    pub(crate) fn vertex_mut(&mut self, v: VertexIndex) -> &mut PoaVertex {
        &mut self.dag[v]
    }

    /// The base carried by a vertex.
    pub fn base(&self, v: VertexIndex) -> u8 {
        self.dag[v].base
    }

    /// Predecessors of `v` in edge-insertion order. Tie-breaking in the
    /// aligner and the consensus extractor depends on this order being stable.
    pub fn in_vertices(&self, v: VertexIndex) -> Vec<VertexIndex> {
        let mut preds: Vec<VertexIndex> = self.dag.neighbors_directed(v, Incoming).collect();
        // petgraph walks adjacency newest-first
        preds.reverse();
        preds
    }

    /// Successors of `v` in edge-insertion order.
    pub fn out_vertices(&self, v: VertexIndex) -> Vec<VertexIndex> {
        let mut succs: Vec<VertexIndex> = self.dag.neighbors_directed(v, Outgoing).collect();
        succs.reverse();
        succs
    }

    /// A full topological ordering of the vertices. Recomputed on demand; the
    /// visit is a deterministic function of insertion order, which makes the
    /// whole pipeline reproducible for a fixed read order.
    pub fn topo_order(&self) -> Vec<VertexIndex> {
        let mut order = Vec::with_capacity(self.dag.node_count());
        let mut topo = Topo::new(&self.dag);
        while let Some(v) = topo.next(&self.dag) {
            order.push(v);
        }
        assert_eq!(order.len(), self.dag.node_count(), "graph must stay acyclic");
        order
    }

    /// Marks every vertex from `start` up to (excluding) `end` in topological
    /// order as covered by one more spanning read.
    pub(crate) fn tag_span(&mut self, start: VertexIndex, end: VertexIndex) {
        let mut spanning = false;
        for v in self.topo_order() {
            if v == start {
                spanning = true;
            }
            if v == end {
                break;
            }
            if spanning {
                self.dag[v].spanning_reads += 1;
            }
        }
    }

    /// Concatenates the bases along a path of vertex handles.
    pub fn sequence_along_path(&self, path: &[VertexIndex]) -> Vec<u8> {
        path.iter().map(|&v| self.dag[v].base).collect()
    }

    /// Renders the graph in GraphViz dot format for inspection.
    /// # Arguments
    /// * `flags` - bitwise OR of [`COLOR_NODES`] and [`VERBOSE_NODES`]
    /// * `consensus_path` - vertices to highlight when [`COLOR_NODES`] is set
    pub fn to_graphviz(&self, flags: u32, consensus_path: Option<&[VertexIndex]>) -> String {
        let on_path: HashSet<VertexIndex> = consensus_path
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default();

        let mut out = String::from("digraph G {\n");
        for v in self.dag.node_indices() {
            let info = &self.dag[v];
            let colored = (flags & COLOR_NODES) != 0 && on_path.contains(&v);
            let label = if (flags & VERBOSE_NODES) != 0 {
                format!(
                    "{{ {{ {} | {} }} |{{ {} | {} }} |{{ {:.2} | {:.2} }} }}",
                    v.index(),
                    info.base as char,
                    info.reads,
                    info.spanning_reads,
                    info.score,
                    info.reaching_score
                )
            } else {
                format!("{{ {} | {} }}", info.base as char, info.reads)
            };
            if colored {
                out.push_str(&format!(
                    "{}[shape=Mrecord, style=\"filled\", fillcolor=\"lightblue\" , label=\"{}\"];\n",
                    v.index(),
                    label
                ));
            } else {
                out.push_str(&format!("{}[shape=Mrecord, label=\"{}\"];\n", v.index(), label));
            }
        }
        for e in self.dag.edge_indices() {
            let (src, dst) = self.dag.edge_endpoints(e).unwrap();
            out.push_str(&format!("{}->{} ;\n", src.index(), dst.index()));
        }
        out.push('}');
        out
    }

    /// True if the graph still satisfies the DAG requirement; intended for tests
    /// and debug assertions.
    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.dag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let graph = PoaGraph::new();
        assert_eq!(graph.num_vertices(), 2);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.num_reads(), 0);
        assert_eq!(graph.base(graph.enter_vertex()), ENTER_BASE);
        assert_eq!(graph.base(graph.exit_vertex()), EXIT_BASE);
        assert_eq!(graph.topo_order().len(), 2);
    }

    #[test]
    fn test_link_is_idempotent() {
        let mut graph = PoaGraph::new();
        let a = graph.add_base_vertex(b'A');
        let b = graph.add_base_vertex(b'C');
        graph.link(a, b);
        graph.link(a, b);
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_neighbor_order_is_insertion_order() {
        let mut graph = PoaGraph::new();
        let a = graph.add_base_vertex(b'A');
        let c = graph.add_base_vertex(b'C');
        let g = graph.add_base_vertex(b'G');
        graph.link(a, g);
        graph.link(c, g);
        assert_eq!(graph.in_vertices(g), vec![a, c]);
        graph.link(a, c);
        assert_eq!(graph.out_vertices(a), vec![g, c]);
    }

    #[test]
    fn test_tag_span_excludes_end() {
        let mut graph = PoaGraph::new();
        let enter = graph.enter_vertex();
        let exit = graph.exit_vertex();
        let a = graph.add_base_vertex(b'A');
        let c = graph.add_base_vertex(b'C');
        let g = graph.add_base_vertex(b'G');
        graph.link(enter, a);
        graph.link(a, c);
        graph.link(c, g);
        graph.link(g, exit);

        graph.tag_span(a, g);
        assert_eq!(graph.vertex(a).spanning_reads, 1);
        assert_eq!(graph.vertex(c).spanning_reads, 1);
        assert_eq!(graph.vertex(g).spanning_reads, 0);

        // degenerate span tags nothing
        graph.tag_span(c, c);
        assert_eq!(graph.vertex(c).spanning_reads, 1);
    }

    #[test]
    fn test_topo_order_on_chain() {
        let mut graph = PoaGraph::new();
        let enter = graph.enter_vertex();
        let exit = graph.exit_vertex();
        let a = graph.add_base_vertex(b'A');
        let c = graph.add_base_vertex(b'C');
        graph.link(enter, a);
        graph.link(a, c);
        graph.link(c, exit);
        assert_eq!(graph.topo_order(), vec![enter, a, c, exit]);
        assert!(graph.is_acyclic());
    }
}
