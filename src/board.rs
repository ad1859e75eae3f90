use cli_table::{Style, Table};
use std::fmt;
use strum::{EnumCount, FromRepr};

/// A sudoku digit. Boards with a smaller side length use a prefix of these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumCount, FromRepr)]
#[repr(usize)]
pub enum SudokuNum {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
}

impl fmt::Display for SudokuNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as usize)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Number(SudokuNum),
    Free,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Free => write!(f, "."),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct BoardNotSolvableError;

impl fmt::Display for BoardNotSolvableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to solve board")
    }
}

/// A `size × size` grid with `√size × √size` boxes, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    #[must_use]
    pub fn empty(size: usize) -> Self {
        let _ = box_size_of(size);
        Self {
            size,
            cells: vec![Cell::Free; size * size],
        }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn box_size(&self) -> usize {
        box_size_of(self.size)
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<SudokuNum> {
        match self.cells[row * self.size + col] {
            Cell::Number(n) => Some(n),
            Cell::Free => None,
        }
    }

    pub fn set(&mut self, row: usize, col: usize, num: Option<SudokuNum>) {
        self.cells[row * self.size + col] = match num {
            Some(n) => Cell::Number(n),
            None => Cell::Free,
        };
    }

    #[must_use]
    pub fn box_index(&self, row: usize, col: usize) -> usize {
        let b = self.box_size();
        (row / b) * b + col / b
    }

    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }

    pub fn row_positions(&self, row: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..self.size).map(move |col| (row, col))
    }

    pub fn col_positions(&self, col: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..self.size).map(move |row| (row, col))
    }

    pub fn box_positions(&self, index: usize) -> impl Iterator<Item = (usize, usize)> {
        let b = self.box_size();
        let base_row = (index / b) * b;
        let base_col = (index % b) * b;
        (0..b).flat_map(move |r| (0..b).map(move |c| (base_row + r, base_col + c)))
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(<[Cell]>::to_vec).collect()
    }

    /// Full validity check: no free cells, and every row, column and box
    /// contains each of `1..=size` exactly once.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        if self.cells.iter().any(|cell| matches!(cell, Cell::Free)) {
            return false;
        }

        (0..self.size).all(|index| {
            self.group_is_complete(self.row_positions(index))
                && self.group_is_complete(self.col_positions(index))
                && self.group_is_complete(self.box_positions(index))
        })
    }

    fn group_is_complete<I>(&self, positions: I) -> bool
    where
        I: Iterator<Item = (usize, usize)>,
    {
        let mut required_nums: Vec<usize> = (1..=self.size).collect();
        for (row, col) in positions {
            if let Some(num) = self.get(row, col) {
                if let Some(found) = required_nums.iter().position(|&n| n == num as usize) {
                    required_nums.remove(found);
                }
            }
        }
        required_nums.is_empty()
    }
}

fn box_size_of(size: usize) -> usize {
    debug_assert!(size <= SudokuNum::COUNT);
    match size {
        1 => 1,
        4 => 2,
        9 => 3,
        _ => panic!("board side length must be 1, 4 or 9"),
    }
}

fn parse_cell(ch: char, size: usize) -> Cell {
    match ch {
        '.' | '0' => Cell::Free,
        '1'..='9' => {
            let digit = ch.to_digit(10).expect("digit already matched") as usize;
            assert!(digit <= size, "digit {digit} does not fit a {size}x{size} board");
            Cell::Number(SudokuNum::from_repr(digit).expect("digit out of range"))
        }
        _ => panic!("invalid char"),
    }
}

#[must_use]
pub fn parse_board(board: Vec<Vec<char>>) -> Board {
    let size = board.len();
    let mut new_board = Board::empty(size);

    for (row_index, row) in board.into_iter().enumerate() {
        assert_eq!(row.len(), size, "board rows must all have {size} cells");
        for (col_index, char_cell) in row.into_iter().enumerate() {
            if let Cell::Number(num) = parse_cell(char_cell, size) {
                new_board.set(row_index, col_index, Some(num));
            }
        }
    }
    new_board
}

#[must_use]
pub fn parse_board_from_line(line: &str) -> Board {
    let size = match line.len() {
        81 => 9,
        16 => 4,
        1 => 1,
        len => panic!("a line of {len} chars is not a square board"),
    };

    let mut new_board = Board::empty(size);
    for (index, char_cell) in line.chars().enumerate() {
        if let Cell::Number(num) = parse_cell(char_cell, size) {
            new_board.set(index / size, index % size, Some(num));
        }
    }
    new_board
}

pub fn print_board(board: &Board) {
    let table = board.rows().table().bold(true).display().unwrap();

    println!("\n{table}\n");
}
