
/*!
Folding reads into the graph.

The first read becomes a plain chain between the sentinels. Every later read
is aligned by [`crate::aligner`] and then threaded back to front: matches
reuse existing vertices, everything else grows new branches that are joined
into the graph through a pending fork vertex.
*/

use log::debug;
use simple_error::bail;

use crate::aligner::{align_read, AlignmentColumnMap, MoveType};
use crate::graph::{PoaGraph, VertexIndex};
use crate::poa_config::{AlignMode, PoaConfig};

/// Returns true for the four bases the engine accepts.
fn valid_base(base: u8) -> bool {
    matches!(base, b'A' | b'C' | b'G' | b'T')
}

impl PoaGraph {
    /// Folds one read into the graph and returns the vertex each read base
    /// landed on.
    /// # Arguments
    /// * `read` - the read to fold in
    /// * `config` - scoring parameters and alignment mode; must be the same
    ///   for every read added to one graph
    /// # Errors
    /// * if the read is empty
    /// * if the read contains a base outside `ACGT`
    pub fn add_read(
        &mut self,
        read: &[u8],
        config: &PoaConfig
    ) -> Result<Vec<VertexIndex>, Box<dyn std::error::Error>> {
        if read.is_empty() {
            bail!("cannot fold an empty read into the graph");
        }
        if let Some(&bad) = read.iter().find(|&&b| !valid_base(b)) {
            bail!("read contains a base outside ACGT: '{}'", bad as char);
        }

        let path = if self.num_reads() == 0 {
            self.thread_first_read(read)
        } else {
            let columns = align_read(self, read, config);
            let score = columns[&self.exit_vertex()].score[read.len()];
            let path = self.traceback_and_thread(read, &columns, config);
            debug!(
                "read {} threaded with score {:.2}; graph now has {} vertices, {} edges",
                self.num_reads() + 1,
                score,
                self.num_vertices(),
                self.num_edges()
            );
            path
        };
        self.count_read();
        Ok(path)
    }

    /// Builds the linear chain `enter -> b1 -> ... -> bn -> exit` for the
    /// first read; nothing to align against yet.
    fn thread_first_read(&mut self, read: &[u8]) -> Vec<VertexIndex> {
        let enter = self.enter_vertex();
        let exit = self.exit_vertex();

        let mut path = Vec::with_capacity(read.len());
        let mut prev = enter;
        for &base in read.iter() {
            let v = self.add_base_vertex(base);
            self.link(prev, v);
            path.push(v);
            prev = v;
        }
        self.link(prev, exit);
        self.tag_span(path[0], path[path.len() - 1]);
        path
    }

    /// Walks the filled alignment table from `(exit, read end)` back to
    /// `(enter, 0)`, mutating the graph as it goes.
    ///
    /// `fork` holds the vertex that the next newly created branch vertex must
    /// point at; it is flushed whenever the traceback rejoins an existing
    /// vertex, and connected from `enter` if it survives to the end.
    fn traceback_and_thread(
        &mut self,
        read: &[u8],
        columns: &AlignmentColumnMap,
        config: &PoaConfig
    ) -> Vec<VertexIndex> {
        let read_len = read.len();
        let enter = self.enter_vertex();
        let exit = self.exit_vertex();

        let mut i = read_len;
        let mut u = exit;
        let mut v: Option<VertexIndex> = None;
        let mut fork: Option<VertexIndex> = None;
        let end_span = columns[&exit].previous_vertex[read_len];
        let mut path: Vec<Option<VertexIndex>> = vec![None; read_len];

        while !(u == enter && i == 0) {
            let col = &columns[&u];
            let prev = col.previous_vertex[i];

            match col.reaching_move[i] {
                MoveType::Start => {
                    // any read prefix left at a free start becomes a fresh branch
                    if fork.is_none() {
                        fork = v;
                    }
                    while i > 0 {
                        let branch = self.add_base_vertex(read[i - 1]);
                        self.link(branch, fork.expect("start move requires a traceback predecessor"));
                        path[i - 1] = Some(branch);
                        fork = Some(branch);
                        i -= 1;
                    }
                }
                MoveType::End => {
                    assert!(fork.is_none() && u == exit && v.is_none(), "end move must open the traceback");
                    fork = Some(exit);
                    if config.align_mode == AlignMode::Local {
                        // the alignment may have ended before the read did;
                        // thread the clipped suffix down to the best row
                        let prev_scores = &columns[&prev].score;
                        let mut best_row = 0;
                        for (row, &s) in prev_scores.iter().enumerate() {
                            if s > prev_scores[best_row] {
                                best_row = row;
                            }
                        }
                        while i > best_row {
                            let branch = self.add_base_vertex(read[i - 1]);
                            self.link(branch, fork.unwrap());
                            path[i - 1] = Some(branch);
                            fork = Some(branch);
                            i -= 1;
                        }
                    }
                }
                MoveType::Match => {
                    path[i - 1] = Some(u);
                    if let Some(f) = fork.take() {
                        self.link(u, f);
                    }
                    self.vertex_mut(u).reads += 1;
                    i -= 1;
                }
                MoveType::Delete => {
                    if fork.is_none() {
                        fork = v;
                    }
                }
                MoveType::Mismatch | MoveType::Extra => {
                    let branch = self.add_base_vertex(read[i - 1]);
                    if fork.is_none() {
                        fork = v;
                    }
                    self.link(branch, fork.expect("mismatch move requires a traceback predecessor"));
                    path[i - 1] = Some(branch);
                    fork = Some(branch);
                    i -= 1;
                }
            }

            v = Some(u);
            u = prev;
        }

        let start_span = v.expect("traceback visits at least the exit vertex");
        if start_span != exit {
            self.tag_span(start_span, end_span);
        }

        // a branch that reaches all the way back joins the graph at enter
        if let Some(f) = fork.take() {
            self.link(enter, f);
        }

        path.into_iter()
            .map(|p| p.expect("every read base must land on a vertex"))
            .collect()
    }
}
