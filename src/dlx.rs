//! Knuth's dancing links: a toroidal sparse matrix over an index arena plus
//! the backtracking exact-cover search that mutates it.
//!
//! Every row and column of the matrix is a circular doubly-linked list in
//! both directions. Selecting a row "covers" its columns (unlinks them and
//! every competing row); backtracking "uncovers" them in exact reverse
//! order, which restores the arena to the bit-identical pre-cover state.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Arena index of the root header. The matrix is solved exactly when the
/// root's right link points back at itself.
const ROOT: usize = 0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

/// One cell of the toroidal matrix.
///
/// Headers (including the root) use `column` as a self-reference and `value`
/// as the count of live nodes below them; matrix nodes point `column` at
/// their owning header and keep their row id in `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    link: [usize; 4],
    column: usize,
    value: usize,
}

/// Observation seam for the search: called right before a row is tentatively
/// selected and right after it is deselected on backtracking.
///
/// A pacer may block for as long as it likes (that is the suspension point
/// for step-by-step drivers), but it cannot influence column choice, row
/// order or any other part of the search.
pub trait Pacer<L> {
    fn select(&mut self, label: &L);
    fn unselect(&mut self, label: &L);
}

struct NoPacing;

impl<L> Pacer<L> for NoPacing {
    fn select(&mut self, _label: &L) {}
    fn unselect(&mut self, _label: &L) {}
}

/// The live exact-cover matrix. All headers and nodes are allocated up front
/// by [`Matrix::build`]; the search only relinks them.
pub struct Matrix<L> {
    nodes: Vec<Node>,
    labels: Vec<L>,
}

impl<L> Matrix<L> {
    /// Builds the matrix from `(label, constraints)` pairs.
    ///
    /// Column headers are created lazily, keyed by constraint value, and
    /// spliced into the root ring in order of first use. Nodes of one row
    /// are linked left-to-right in the order the constraints were listed.
    /// A row with no constraints allocates only its label and stays dead.
    pub fn build<C, I, J>(problem: I) -> Self
    where
        C: Eq + Hash,
        I: IntoIterator<Item = (L, J)>,
        J: IntoIterator<Item = C>,
    {
        let mut matrix = Self {
            nodes: Vec::new(),
            labels: Vec::new(),
        };
        let root = matrix.alloc_header();
        debug_assert_eq!(root, ROOT);

        let mut headers: FxHashMap<C, usize> = FxHashMap::default();
        for (label, constraints) in problem {
            let row = matrix.labels.len();
            matrix.labels.push(label);

            let mut first = None;
            for constraint in constraints {
                let header = *headers.entry(constraint).or_insert_with(|| {
                    let header = matrix.alloc_header();
                    matrix.insert_left_of(ROOT, header);
                    header
                });

                let node = matrix.alloc_node(header, row);
                matrix.insert_above(header, node);
                matrix.nodes[header].value += 1;

                match first {
                    Some(anchor) => matrix.insert_left_of(anchor, node),
                    None => first = Some(node),
                }
            }
        }
        matrix
    }

    /// No columns left to cover means every constraint is satisfied.
    pub fn is_solved(&self) -> bool {
        self.link(ROOT, Direction::Right) == ROOT
    }

    fn link(&self, node: usize, direction: Direction) -> usize {
        self.nodes[node].link[direction as usize]
    }

    /// Lazy traversal of the cycle through `start` in `direction`: yields
    /// `start` once, then every other node until the cycle closes.
    fn cycle(&self, start: usize, direction: Direction) -> CycleIter<'_, L> {
        CycleIter {
            matrix: self,
            start,
            cursor: Some(start),
            direction,
        }
    }

    fn alloc_header(&mut self) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            link: [index; 4],
            column: index,
            value: 0,
        });
        index
    }

    fn alloc_node(&mut self, column: usize, row: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            link: [index; 4],
            column,
            value: row,
        });
        index
    }

    fn insert_above(&mut self, anchor: usize, node: usize) {
        let above = self.link(anchor, Direction::Up);
        self.nodes[node].link[Direction::Down as usize] = anchor;
        self.nodes[node].link[Direction::Up as usize] = above;
        self.nodes[above].link[Direction::Down as usize] = node;
        self.nodes[anchor].link[Direction::Up as usize] = node;
    }

    fn insert_left_of(&mut self, anchor: usize, node: usize) {
        let before = self.link(anchor, Direction::Left);
        self.nodes[node].link[Direction::Right as usize] = anchor;
        self.nodes[node].link[Direction::Left as usize] = before;
        self.nodes[before].link[Direction::Right as usize] = node;
        self.nodes[anchor].link[Direction::Left as usize] = node;
    }

    /// Detaches `node` from its column and decrements the column size. The
    /// node's own links stay intact so [`relink_vertical`](Self::relink_vertical)
    /// can put it back.
    fn unlink_vertical(&mut self, node: usize) {
        let up = self.link(node, Direction::Up);
        let down = self.link(node, Direction::Down);
        self.nodes[up].link[Direction::Down as usize] = down;
        self.nodes[down].link[Direction::Up as usize] = up;
        let column = self.nodes[node].column;
        self.nodes[column].value -= 1;
    }

    fn relink_vertical(&mut self, node: usize) {
        let up = self.link(node, Direction::Up);
        let down = self.link(node, Direction::Down);
        self.nodes[up].link[Direction::Down as usize] = node;
        self.nodes[down].link[Direction::Up as usize] = node;
        let column = self.nodes[node].column;
        self.nodes[column].value += 1;
    }

    /// Removes `header` from the root ring; its vertical links are left
    /// untouched, uncover depends on them.
    fn unlink_horizontal(&mut self, header: usize) {
        let left = self.link(header, Direction::Left);
        let right = self.link(header, Direction::Right);
        self.nodes[left].link[Direction::Right as usize] = right;
        self.nodes[right].link[Direction::Left as usize] = left;
    }

    fn relink_horizontal(&mut self, header: usize) {
        let left = self.link(header, Direction::Left);
        let right = self.link(header, Direction::Right);
        self.nodes[left].link[Direction::Right as usize] = header;
        self.nodes[right].link[Direction::Left as usize] = header;
    }

    /// Covers the row of `selected`: per node, the owning column leaves the
    /// root ring and every other row through that column is hidden.
    fn cover(&mut self, selected: usize) {
        let mut node = selected;
        loop {
            let header = self.nodes[node].column;
            self.unlink_horizontal(header);

            let mut col_node = self.link(node, Direction::Down);
            while col_node != node {
                if col_node != header {
                    let mut row_node = self.link(col_node, Direction::Right);
                    while row_node != col_node {
                        self.unlink_vertical(row_node);
                        row_node = self.link(row_node, Direction::Right);
                    }
                }
                col_node = self.link(col_node, Direction::Down);
            }

            node = self.link(node, Direction::Right);
            if node == selected {
                break;
            }
        }
    }

    /// Exact inverse of [`cover`](Self::cover). Walks the row leftward from
    /// `selected.left` and each column upward, so every link is restored in
    /// the reverse of the order it was removed. Running the cover loop a
    /// second time instead would corrupt partially-relinked cycles.
    fn uncover(&mut self, selected: usize) {
        let start = self.link(selected, Direction::Left);
        let mut node = start;
        loop {
            let header = self.nodes[node].column;
            self.relink_horizontal(header);

            let mut col_node = self.link(node, Direction::Up);
            while col_node != node {
                if col_node != header {
                    let mut row_node = self.link(col_node, Direction::Left);
                    while row_node != col_node {
                        self.relink_vertical(row_node);
                        row_node = self.link(row_node, Direction::Left);
                    }
                }
                col_node = self.link(col_node, Direction::Up);
            }

            node = self.link(node, Direction::Left);
            if node == start {
                break;
            }
        }
    }

    /// First header with the fewest live rows, scanning the root ring
    /// left-to-right. Strict `<` keeps the first minimum, which makes both
    /// the branching order and the reported solution deterministic.
    fn min_size_column(&self) -> usize {
        let mut headers = self.cycle(ROOT, Direction::Right).skip(1);
        let mut best = headers.next().expect("no columns remain");
        for header in headers {
            if self.nodes[header].value < self.nodes[best].value {
                best = header;
            }
        }
        best
    }

    #[cfg(any(test, feature = "paranoid"))]
    fn verify_column_sizes(&self) {
        for header in self.cycle(ROOT, Direction::Right).skip(1) {
            let live = self.cycle(header, Direction::Down).skip(1).count();
            assert_eq!(
                self.nodes[header].value, live,
                "column size drifted from its live node count"
            );
        }
    }
}

impl<L: Clone> Matrix<L> {
    /// Runs the search to completion and returns the labels of the selected
    /// rows, or `None` when no exact cover exists. "No solution" is the only
    /// negative outcome; the engine has no fault states.
    pub fn solve(&mut self) -> Option<Vec<L>> {
        self.solve_paced(&mut NoPacing)
    }

    /// Like [`solve`](Self::solve), but reports every tentative selection
    /// and deselection to `pacer`. On failure the matrix is restored to its
    /// pristine state; on success it is left covered under the solution.
    pub fn solve_paced<P: Pacer<L>>(&mut self, pacer: &mut P) -> Option<Vec<L>> {
        let mut selection = Vec::new();
        if self.search(&mut selection, pacer) {
            let labels = selection
                .into_iter()
                .map(|row| self.labels[row].clone())
                .collect();
            Some(labels)
        } else {
            None
        }
    }

    /// Depth-first search with chronological backtracking. Success is
    /// propagated up the call stack explicitly and stops at the first
    /// solution; a column that has run out of rows simply yields an empty
    /// loop, which is how infeasible branches are pruned.
    fn search<P: Pacer<L>>(&mut self, selection: &mut Vec<usize>, pacer: &mut P) -> bool {
        if self.is_solved() {
            return true;
        }

        let header = self.min_size_column();
        let mut node = self.link(header, Direction::Down);
        while node != header {
            let row = self.nodes[node].value;
            selection.push(row);
            pacer.select(&self.labels[row]);
            self.cover(node);

            if self.search(selection, pacer) {
                return true;
            }

            self.uncover(node);
            #[cfg(feature = "paranoid")]
            self.verify_column_sizes();
            pacer.unselect(&self.labels[row]);
            selection.pop();

            node = self.link(node, Direction::Down);
        }
        false
    }
}

struct CycleIter<'m, L> {
    matrix: &'m Matrix<L>,
    start: usize,
    cursor: Option<usize>,
    direction: Direction,
}

impl<L> Iterator for CycleIter<'_, L> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        let next = self.matrix.link(current, self.direction);
        self.cursor = (next != self.start).then_some(next);
        Some(current)
    }
}
