
/*!
Contains configuration information for the POA consensus algorithm.
Typical usage is to the use the builder to construct the config, e.g.
```
use poa_con::poa_config::{AlignMode, PoaConfig, PoaConfigBuilder};
let config: PoaConfig = PoaConfigBuilder::default()
    .align_mode(AlignMode::Semiglobal)
    .min_coverage(4)
    .build()
    .unwrap();
```
*/

/// Enumeration of the supported alignment regimes for folding a read into the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlignMode {
    /// End-to-end alignment of the read against the graph
    #[default]
    Global,
    /// Read is aligned end-to-end, but graph prefix/suffix may be skipped freely
    Semiglobal,
    /// Both read and graph may be clipped freely on either end
    Local
}

/**
Contains configuration information for the POA consensus algorithm.
Typical usage is to the use the builder to construct the config, e.g.
```
use poa_con::poa_config::{AlignMode, PoaConfig, PoaConfigBuilder};
let config: PoaConfig = PoaConfigBuilder::default()
    .align_mode(AlignMode::Semiglobal)
    .min_coverage(4)
    .build()
    .unwrap();
```
*/
#[derive(derive_builder::Builder, Clone, Debug)]
#[builder(default)]
pub struct PoaConfig {
    /// Score added when a read base matches the graph base
    pub match_score: i32,
    /// Score added when a read base mismatches the graph base
    pub mismatch_score: i32,
    /// Score added when a read base is consumed without advancing in the graph
    pub insert_score: i32,
    /// Score added when a graph vertex is skipped without consuming a read base
    pub delete_score: i32,
    /// The alignment regime; must be the same for every read added to one graph
    pub align_mode: AlignMode,
    /// Basal read coverage assumed by the caller; vertices covered by fewer
    /// spanning reads are penalized during consensus extraction. Only
    /// consulted for semiglobal/local consensus. Not clamped against the
    /// actual read count.
    pub min_coverage: i32
}

impl Default for PoaConfig {
    fn default() -> Self {
        Self {
            // these four mirror the long-standing CCS defaults
            match_score: 3,
            mismatch_score: -5,
            insert_score: -4,
            delete_score: -4,
            // global is the common case for full-length subreads
            align_mode: AlignMode::Global,
            // zero makes max(spanning, min_coverage) a no-op; callers with
            // staggered reads should raise this
            min_coverage: 0
        }
    }
}
