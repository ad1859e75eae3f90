//! Sudoku as an exact cover problem.
//!
//! Every candidate `(row, col, num)` placement becomes one matrix row with
//! four constraints: the cell is filled, and the row, column and box each
//! contain `num`. Filled cells keep only their given digit as a candidate,
//! so a solved board falls out of the search as the set of selected
//! placements.

use crate::board::{Board, BoardNotSolvableError, SudokuNum};
use crate::dlx::{Matrix, Pacer};

/// Row label: the placement a selected matrix row stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub num: SudokuNum,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum Constraint {
    Cell { row: usize, col: usize },
    Row { row: usize, num: SudokuNum },
    Col { col: usize, num: SudokuNum },
    Box { index: usize, num: SudokuNum },
}

pub struct Solver {
    pub board: Board,
}

impl Solver {
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    /// Solves the board, writes the solution into it and returns a copy.
    ///
    /// # Errors
    ///
    /// Returns [`BoardNotSolvableError`] when the givens admit no solution;
    /// the board is left untouched in that case.
    pub fn solve(&mut self) -> Result<Board, BoardNotSolvableError> {
        let mut matrix = Matrix::build(Self::candidates(&self.board));
        let placements = matrix.solve().ok_or(BoardNotSolvableError)?;
        self.apply(&placements);
        Ok(self.board.clone())
    }

    /// Like [`solve`](Self::solve), reporting every tentative placement and
    /// retraction to `pacer` as the search runs.
    ///
    /// # Errors
    ///
    /// Returns [`BoardNotSolvableError`] when the givens admit no solution.
    pub fn solve_paced<P>(&mut self, pacer: &mut P) -> Result<Board, BoardNotSolvableError>
    where
        P: Pacer<Placement>,
    {
        let mut matrix = Matrix::build(Self::candidates(&self.board));
        let placements = matrix.solve_paced(pacer).ok_or(BoardNotSolvableError)?;
        self.apply(&placements);
        Ok(self.board.clone())
    }

    fn apply(&mut self, placements: &[Placement]) {
        for placement in placements {
            self.board
                .set(placement.row, placement.col, Some(placement.num));
        }
    }

    fn candidates(board: &Board) -> Vec<(Placement, [Constraint; 4])> {
        let size = board.size();
        let mut rows = Vec::with_capacity(size * size * size);

        for (row, col) in board.positions() {
            let given = board.get(row, col);
            for digit in 1..=size {
                let num = SudokuNum::from_repr(digit).expect("digit out of range");
                // a filled cell keeps only its own digit as a candidate
                if given.is_some_and(|g| g != num) {
                    continue;
                }

                let index = board.box_index(row, col);
                rows.push((
                    Placement { row, col, num },
                    [
                        Constraint::Cell { row, col },
                        Constraint::Row { row, num },
                        Constraint::Col { col, num },
                        Constraint::Box { index, num },
                    ],
                ));
            }
        }
        rows
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::parse_board;

    #[test]
    fn solves_an_empty_4x4_board() {
        let mut solver = Solver::new(Board::empty(4));
        let solved = solver.solve().expect("empty boards are always solvable");
        assert!(solved.is_solved());
    }

    #[test]
    fn conflicting_givens_are_not_solvable() {
        let board = parse_board(vec![
            vec!['1', '1', '.', '.'],
            vec!['.', '.', '.', '.'],
            vec!['.', '.', '.', '.'],
            vec!['.', '.', '.', '.'],
        ]);
        let mut solver = Solver::new(board.clone());
        assert!(solver.solve().is_err());
        // the failed solve must not scribble on the board
        assert_eq!(solver.board, board);
    }

    #[test]
    fn prefilled_solution_comes_back_unchanged() {
        let board = parse_board(vec![
            vec!['1', '2', '3', '4'],
            vec!['3', '4', '1', '2'],
            vec!['2', '1', '4', '3'],
            vec!['4', '3', '2', '1'],
        ]);
        assert!(board.is_solved());

        let mut solver = Solver::new(board.clone());
        let solved = solver.solve().expect("a solved board stays solvable");
        assert_eq!(solved, board);
    }

    #[test]
    fn solve_board_1() {
        let board = parse_board(vec![
            vec!['5', '3', '.', '.', '7', '.', '.', '.', '.'],
            vec!['6', '.', '.', '1', '9', '5', '.', '.', '.'],
            vec!['.', '9', '8', '.', '.', '.', '.', '6', '.'],
            vec!['8', '.', '.', '.', '6', '.', '.', '.', '3'],
            vec!['4', '.', '.', '8', '.', '3', '.', '.', '1'],
            vec!['7', '.', '.', '.', '2', '.', '.', '.', '6'],
            vec!['.', '6', '.', '.', '.', '.', '2', '8', '.'],
            vec!['.', '.', '.', '4', '1', '9', '.', '.', '5'],
            vec!['.', '.', '.', '.', '8', '.', '.', '7', '9'],
        ]);

        let board_solution = parse_board(vec![
            vec!['5', '3', '4', '6', '7', '8', '9', '1', '2'],
            vec!['6', '7', '2', '1', '9', '5', '3', '4', '8'],
            vec!['1', '9', '8', '3', '4', '2', '5', '6', '7'],
            vec!['8', '5', '9', '7', '6', '1', '4', '2', '3'],
            vec!['4', '2', '6', '8', '5', '3', '7', '9', '1'],
            vec!['7', '1', '3', '9', '2', '4', '8', '5', '6'],
            vec!['9', '6', '1', '5', '3', '7', '2', '8', '4'],
            vec!['2', '8', '7', '4', '1', '9', '6', '3', '5'],
            vec!['3', '4', '5', '2', '8', '6', '1', '7', '9'],
        ]);
        assert!(board_solution.is_solved());

        let mut solver = Solver::new(board);
        let res = solver.solve();
        assert!(matches!(res, Ok(b) if b.is_solved() && b == board_solution));
    }

    /// Commits each tentative placement into its own grid and retracts it on
    /// backtracking, the way a step-by-step front end would.
    struct GridPacer {
        board: Board,
    }

    impl Pacer<Placement> for GridPacer {
        fn select(&mut self, label: &Placement) {
            self.board.set(label.row, label.col, Some(label.num));
        }

        fn unselect(&mut self, label: &Placement) {
            self.board.set(label.row, label.col, None);
        }
    }

    #[test]
    fn paced_solve_replays_into_an_external_grid() {
        let mut solver = Solver::new(Board::empty(4));
        let mut pacer = GridPacer {
            board: Board::empty(4),
        };

        let solved = solver
            .solve_paced(&mut pacer)
            .expect("empty boards are always solvable");

        // net effect of all select/unselect pairs is exactly the solution
        assert_eq!(pacer.board, solved);
        assert!(pacer.board.is_solved());
    }
}
