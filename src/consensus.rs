
/*!
This module provides access to the PoaConsensus, which folds reads into a
partial-order graph and extracts the single best consensus path.

# Example usage
```rust
use poa_con::consensus::PoaConsensus;

let reads = [
    b"GGG".to_vec(),
    b"TGGG".to_vec() // the extra T is outvoted
];

// add all the reads
let mut pc: PoaConsensus = Default::default();
for r in reads.iter() {
    pc.add_read(r).unwrap();
}

// run consensus and check the results
let (sequence, path) = pc.consensus();
assert_eq!(sequence, b"GGG");
assert_eq!(path.len(), 3);
```
*/

use log::debug;

use crate::graph::{PoaGraph, VertexIndex};
use crate::poa_config::{AlignMode, PoaConfig};

impl PoaGraph {
    /// Scores every vertex by read coverage and returns the maximum-reaching
    /// path through the DAG, excluding the sentinels. Vertex `score` and
    /// `reaching_score` fields are overwritten as a side effect.
    ///
    /// A vertex scores positively when more than half of the relevant reads
    /// pass through it; the small negative offset breaks ties in favor of
    /// skipping half-full vertices. For the clipped modes the denominator is
    /// the spanning coverage floored at `min_coverage` instead of the total
    /// read count.
    /// # Arguments
    /// * `mode` - the alignment regime the reads were folded in with
    /// * `min_coverage` - basal coverage floor, consulted only for non-global modes
    pub fn consensus_path(&mut self, mode: AlignMode, min_coverage: i32) -> Vec<VertexIndex> {
        if self.num_reads() == 0 {
            return vec![];
        }

        let total_reads = self.num_reads() as f32;
        let enter = self.enter_vertex();
        let exit = self.exit_vertex();
        let order = self.topo_order();

        self.vertex_mut(enter).reaching_score = 0.0;

        let mut best_prev: Vec<Option<VertexIndex>> = vec![None; self.num_vertices()];
        let mut best_vertex: Option<VertexIndex> = None;
        let mut best_reaching = f32::MIN;

        for &v in order.iter().filter(|&&x| x != enter && x != exit) {
            let info = self.vertex(v);
            let score = match mode {
                AlignMode::Global => 2.0 * info.reads as f32 - total_reads - 0.0001,
                _ => {
                    2.0 * info.reads as f32
                        - (info.spanning_reads as i32).max(min_coverage) as f32
                        - 0.0001
                }
            };

            let mut reaching = score;
            let mut prev = None;
            for u in self.in_vertices(v) {
                let rsc = score + self.vertex(u).reaching_score;
                if rsc > reaching {
                    reaching = rsc;
                    prev = Some(u);
                }
                if rsc > best_reaching {
                    best_reaching = rsc;
                    best_vertex = Some(v);
                }
            }

            let info = self.vertex_mut(v);
            info.score = score;
            info.reaching_score = reaching;
            best_prev[v.index()] = prev;
        }

        // trace back from the best-scoring vertex
        let mut path = vec![];
        let mut cursor = best_vertex;
        while let Some(v) = cursor {
            path.push(v);
            cursor = best_prev[v.index()];
        }
        path.reverse();

        debug!(
            "consensus path covers {} of {} vertices, best reaching score {:.2}",
            path.len(),
            self.num_vertices() - 2,
            best_reaching
        );
        path
    }
}

/// Core utility that folds reads into a partial-order graph and extracts the
/// consensus. One instance holds one graph; the scoring config is fixed at
/// construction so every read is aligned under the same regime.
#[derive(Debug, Default)]
pub struct PoaConsensus {
    /// The graph all reads are folded into
    graph: PoaGraph,
    /// The config for this consensus run
    config: PoaConfig
}

impl PoaConsensus {
    /// Creates a new instance of PoaConsensus with the given scoring config.
    /// # Arguments
    /// * `config` - scoring parameters and alignment mode
    /// # Errors
    /// * None so far
    pub fn with_config(config: PoaConfig) -> Result<PoaConsensus, Box<dyn std::error::Error>> {
        Ok(PoaConsensus {
            graph: PoaGraph::new(),
            config
        })
    }

    /// Folds one read into the graph and returns the vertex each base landed on.
    /// # Arguments
    /// * `read` - the new read to fold in
    /// # Errors
    /// * if the read is empty or contains a base outside `ACGT`
    pub fn add_read(&mut self, read: &[u8]) -> Result<Vec<VertexIndex>, Box<dyn std::error::Error>> {
        self.graph.add_read(read, &self.config)
    }

    /// Extracts the consensus sequence and its vertex path from the current
    /// graph. An empty graph yields an empty consensus.
    pub fn consensus(&mut self) -> (Vec<u8>, Vec<VertexIndex>) {
        let path = self
            .graph
            .consensus_path(self.config.align_mode, self.config.min_coverage);
        let sequence = self.graph.sequence_along_path(&path);
        (sequence, path)
    }

    /// Convenience constructor that folds a whole read set and returns the
    /// ready-to-query instance.
    /// # Arguments
    /// * `reads` - the reads, folded in the given order
    /// * `config` - scoring parameters and alignment mode
    /// # Errors
    /// * if any read is rejected
    pub fn find_consensus<S: AsRef<[u8]>>(
        reads: &[S],
        config: PoaConfig
    ) -> Result<PoaConsensus, Box<dyn std::error::Error>> {
        let mut pc = PoaConsensus::with_config(config)?;
        for read in reads.iter() {
            pc.add_read(read.as_ref())?;
        }
        Ok(pc)
    }

    // getters
    pub fn graph(&self) -> &PoaGraph {
        &self.graph
    }

    pub fn config(&self) -> &PoaConfig {
        &self.config
    }

    pub fn num_reads(&self) -> usize {
        self.graph.num_reads()
    }
}
