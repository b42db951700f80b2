
/*!
Single-base variant candidates relative to a consensus path.

After consensus extraction the graph still remembers every branch the reads
disagreed on. Walking the consensus path and probing its local neighborhood
surfaces the plausible one-base edits, each scored with the vertex score
computed during extraction.
*/

use rustc_hash::FxHashSet as HashSet;
use std::fmt;

use crate::graph::{PoaGraph, VertexIndex};

/// The three kinds of single-base edits proposed against a consensus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Insertion,
    Deletion,
    Substitution
}

/// One proposed single-base mutation, positioned along the consensus
/// (0-based) and scored with the absolute vertex score of the supporting
/// branch. Note that for substitutions an absolute score is reported rather
/// than a delta against the replaced vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMutation {
    /// What kind of edit is proposed
    kind: MutationKind,
    /// 0-based position along the consensus path
    position: usize,
    /// The proposed base; `-` for deletions
    base: u8,
    /// Score of the supporting branch vertex (negated skipped-vertex score for deletions)
    score: f32
}

impl ScoredMutation {
    /// Constructor
    pub fn new(kind: MutationKind, position: usize, base: u8, score: f32) -> ScoredMutation {
        ScoredMutation {
            kind,
            position,
            base,
            score
        }
    }

    // Getters
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

impl fmt::Display for ScoredMutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            MutationKind::Deletion => {
                write!(f, "Deletion @{}:{} {:.2}", self.position, self.position + 1, self.score)
            }
            MutationKind::Insertion => {
                write!(f, "Insertion ({}) @{} {:.2}", self.base as char, self.position, self.score)
            }
            MutationKind::Substitution => write!(
                f,
                "Substitution ({}) @{}:{} {:.2}",
                self.base as char,
                self.position,
                self.position + 1,
                self.score
            )
        }
    }
}

impl PoaGraph {
    /// Proposes single-base edits against a consensus path, using the vertex
    /// scores left behind by [`PoaGraph::consensus_path`]. The interior of the
    /// path is probed; the first and last two positions are skipped.
    /// # Arguments
    /// * `best_path` - the consensus path, sentinels excluded
    pub fn find_possible_variants(&self, best_path: &[VertexIndex]) -> Vec<ScoredMutation> {
        let mut variants = vec![];
        if best_path.len() < 5 {
            return variants;
        }

        for i in 2..best_path.len() - 2 {
            let children = self.out_vertices(best_path[i]);
            let child_set: HashSet<VertexIndex> = children.iter().cloned().collect();

            // a direct edge to the vertex two steps down suggests deleting the
            // vertex in between
            if child_set.contains(&best_path[i + 2]) {
                let score = -self.vertex(best_path[i + 1]).score;
                variants.push(ScoredMutation::new(MutationKind::Deletion, i + 1, b'-', score));
            }

            // a child that connects straight back to the next consensus vertex
            // suggests inserting its base
            let look_back: HashSet<VertexIndex> =
                self.in_vertices(best_path[i + 1]).into_iter().collect();
            let mut best_insert: Option<VertexIndex> = None;
            for &w in children.iter() {
                if look_back.contains(&w)
                    && best_insert.map_or(true, |b| self.vertex(w).score > self.vertex(b).score)
                {
                    best_insert = Some(w);
                }
            }
            if let Some(w) = best_insert {
                variants.push(ScoredMutation::new(
                    MutationKind::Insertion,
                    i + 1,
                    self.base(w),
                    self.vertex(w).score
                ));
            }

            // an off-path child that rejoins two steps down suggests
            // substituting the next consensus base
            let look_back: HashSet<VertexIndex> =
                self.in_vertices(best_path[i + 2]).into_iter().collect();
            let mut best_mismatch: Option<VertexIndex> = None;
            for &w in children.iter() {
                if w == best_path[i + 1] {
                    continue;
                }
                if look_back.contains(&w)
                    && best_mismatch.map_or(true, |b| self.vertex(w).score > self.vertex(b).score)
                {
                    best_mismatch = Some(w);
                }
            }
            if let Some(w) = best_mismatch {
                variants.push(ScoredMutation::new(
                    MutationKind::Substitution,
                    i + 1,
                    self.base(w),
                    self.vertex(w).score
                ));
            }
        }
        variants
    }
}
