
/*!
Sequence-to-graph dynamic programming.

For one new read, every vertex gets an alignment column of `read length + 1`
rows. Row `i` of vertex `v` holds the best score of any alignment of the read
prefix `s[..i]` that ends on `v`, together with the move and the predecessor
vertex that produced it. Columns are filled in topological order and handed to
the traceback threader, then discarded.
*/

use log::trace;
use rustc_hash::FxHashMap as HashMap;

use crate::graph::{PoaGraph, VertexIndex};
use crate::poa_config::{AlignMode, PoaConfig};

/// How a cell of the alignment table was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveType {
    /// Free start of the alignment (soft-clipped read prefix)
    Start,
    /// Free end of the alignment at the exit sentinel
    End,
    /// Read base equals the graph base
    Match,
    /// Read base differs from the graph base
    Mismatch,
    /// Graph vertex skipped without consuming a read base
    Delete,
    /// Read base consumed without advancing in the graph
    Extra
}

impl MoveType {
    /// Tie-break rank; lower wins at equal score.
    fn rank(self) -> u8 {
        match self {
            MoveType::Match => 0,
            MoveType::Mismatch => 1,
            MoveType::Delete => 2,
            MoveType::Extra => 3,
            MoveType::Start => 4,
            MoveType::End => 5
        }
    }
}

/// One vertex's column of the alignment table.
#[derive(Clone, Debug)]
pub struct AlignmentColumn {
    /// Best score per read position
    pub score: Vec<f32>,
    /// Move that produced the best score per read position
    pub reaching_move: Vec<MoveType>,
    /// Graph predecessor whose column produced the best score; the vertex
    /// itself for intra-column moves
    pub previous_vertex: Vec<VertexIndex>
}

impl AlignmentColumn {
    fn with_rows(rows: usize) -> AlignmentColumn {
        AlignmentColumn {
            score: vec![f32::MIN; rows],
            reaching_move: vec![MoveType::Start; rows],
            previous_vertex: vec![VertexIndex::end(); rows]
        }
    }

    fn set(&mut self, row: usize, best: CellBest) {
        self.score[row] = best.score;
        self.reaching_move[row] = best.reaching_move;
        self.previous_vertex[row] = best.previous_vertex;
    }
}

/// The full table for one read, keyed by vertex. Owned for the duration of one
/// read's insertion and released after threading.
pub type AlignmentColumnMap = HashMap<VertexIndex, AlignmentColumn>;

/// Running best candidate for one cell, with the deterministic tie-break
/// (score, then move rank, then candidate order) folded in.
#[derive(Clone, Copy, Debug)]
struct CellBest {
    score: f32,
    rank: u8,
    reaching_move: MoveType,
    previous_vertex: VertexIndex
}

impl CellBest {
    fn unreached() -> CellBest {
        CellBest {
            score: f32::MIN,
            rank: u8::MAX,
            reaching_move: MoveType::Start,
            previous_vertex: VertexIndex::end()
        }
    }

    fn consider(&mut self, score: f32, reaching_move: MoveType, previous_vertex: VertexIndex) {
        // earlier candidates win ties at equal score and rank
        if score > self.score || (score == self.score && reaching_move.rank() < self.rank) {
            self.score = score;
            self.rank = reaching_move.rank();
            self.reaching_move = reaching_move;
            self.previous_vertex = previous_vertex;
        }
    }
}

/// Fills one alignment column per vertex, in topological order.
/// The optimal alignment score ends up in the exit column's last row.
/// # Arguments
/// * `graph` - the graph the read is aligned against
/// * `read` - the new read
/// * `config` - scoring parameters and alignment mode
pub fn align_read(graph: &PoaGraph, read: &[u8], config: &PoaConfig) -> AlignmentColumnMap {
    let rows = read.len() + 1;
    let enter = graph.enter_vertex();
    let exit = graph.exit_vertex();
    let order = graph.topo_order();

    let mut columns: AlignmentColumnMap = HashMap::default();
    columns.insert(enter, enter_column(rows, enter, config));

    for &v in order.iter().filter(|&&v| v != enter && v != exit) {
        let col = base_column(graph, read, config, &columns, v);
        trace!("column for vertex {}: final score {:.2}", v.index(), col.score[rows - 1]);
        columns.insert(v, col);
    }

    let exit_col = exit_column(graph, read, config, &columns, &order);
    trace!("exit column: final score {:.2}", exit_col.score[rows - 1]);
    columns.insert(exit, exit_col);
    columns
}

/// Row 0 of the table. Global alignment pays for every unconsumed read base;
/// the clipped modes start anywhere for free.
fn enter_column(rows: usize, enter: VertexIndex, config: &PoaConfig) -> AlignmentColumn {
    let mut col = AlignmentColumn::with_rows(rows);
    match config.align_mode {
        AlignMode::Global => {
            col.score[0] = 0.0;
            col.reaching_move[0] = MoveType::Start;
            col.previous_vertex[0] = enter;
            for i in 1..rows {
                col.score[i] = (i as f32) * (config.insert_score as f32);
                col.reaching_move[i] = MoveType::Extra;
                col.previous_vertex[i] = enter;
            }
        }
        AlignMode::Semiglobal | AlignMode::Local => {
            for i in 0..rows {
                col.score[i] = 0.0;
                col.reaching_move[i] = MoveType::Start;
                col.previous_vertex[i] = enter;
            }
        }
    }
    col
}

/// The recurrence for one internal vertex.
fn base_column(
    graph: &PoaGraph,
    read: &[u8],
    config: &PoaConfig,
    columns: &AlignmentColumnMap,
    v: VertexIndex
) -> AlignmentColumn {
    let rows = read.len() + 1;
    let base = graph.base(v);
    let enter = graph.enter_vertex();
    let preds = graph.in_vertices(v);
    let mut col = AlignmentColumn::with_rows(rows);

    for i in 0..rows {
        let mut best = CellBest::unreached();

        if i >= 1 {
            let (diag_score, diag_move) = if read[i - 1] == base {
                (config.match_score as f32, MoveType::Match)
            } else {
                (config.mismatch_score as f32, MoveType::Mismatch)
            };
            for &u in preds.iter() {
                best.consider(columns[&u].score[i - 1] + diag_score, diag_move, u);
            }
        }

        for &u in preds.iter() {
            best.consider(columns[&u].score[i] + config.delete_score as f32, MoveType::Delete, u);
        }

        if i >= 1 {
            best.consider(col.score[i - 1] + config.insert_score as f32, MoveType::Extra, v);
        }

        // free read-prefix clip: anywhere in local mode, only before the first
        // consumed base otherwise
        let free_start = match config.align_mode {
            AlignMode::Local => true,
            AlignMode::Semiglobal => i == 0,
            AlignMode::Global => false
        };
        if free_start {
            best.consider(0.0, MoveType::Start, enter);
        }

        col.set(i, best);
    }
    col
}

/// The exit sentinel has no base; each row takes the best incoming score
/// unchanged. In the clipped modes the last row is instead an `End` move from
/// the best-scoring vertex anywhere in the graph, modeling a free suffix clip.
fn exit_column(
    graph: &PoaGraph,
    read: &[u8],
    config: &PoaConfig,
    columns: &AlignmentColumnMap,
    order: &[VertexIndex]
) -> AlignmentColumn {
    let rows = read.len() + 1;
    let exit = graph.exit_vertex();
    let preds = graph.in_vertices(exit);
    let mut col = AlignmentColumn::with_rows(rows);

    for i in 0..rows {
        let mut best = CellBest::unreached();
        for &u in preds.iter() {
            best.consider(columns[&u].score[i], MoveType::Delete, u);
        }
        col.set(i, best);
    }

    if config.align_mode != AlignMode::Global {
        let mut best = CellBest::unreached();
        for &v in order.iter().filter(|&&v| !graph.is_sentinel(v)) {
            let vertex_best = match config.align_mode {
                // the read may also end early; the row is recovered during traceback
                AlignMode::Local => columns[&v].score.iter().cloned().fold(f32::MIN, f32::max),
                _ => columns[&v].score[rows - 1]
            };
            best.consider(vertex_best, MoveType::End, v);
        }
        col.set(rows - 1, best);
    }
    col
}
