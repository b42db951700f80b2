/*!
# poa_con
This library provides access to a partial-order alignment (POA) consensus engine for DNA reads.

Key benefits:
* Reads are folded into a partial-order graph one at a time, so agreement and divergence between them stays visible
* Global, semiglobal, and local alignment regimes for full-length, tiled, or staggered read sets
* Bitwise-deterministic output for a fixed read order and scoring config

Performance notes:
* Alignment cost scales with graph size times read length, so highly divergent read sets grow the graph and slow down later reads
* The graph only ever grows; callers batching many read sets should use one engine instance per set

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

/// Sequence-to-graph dynamic programming and the per-vertex alignment columns
pub mod aligner;
/// Main functionality for the consensus component
pub mod consensus;
/// Utility for generating examples
pub mod example_gen;
/// The partial-order DAG and its per-vertex bookkeeping
pub mod graph;
/// Configuration for the consensus engine
pub mod poa_config;
/// Traceback threading of aligned reads into the graph
pub mod threading;
/// Single-base variant candidates along a consensus path
pub mod variants;
