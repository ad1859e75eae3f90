#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]

use weft::board::{parse_board, parse_board_from_line, print_board, Board, BoardNotSolvableError};
use weft::solver::Solver;

fn parse_boards_list(raw: &str) -> Vec<Board> {
    raw.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_board_from_line)
        .collect()
}

fn solve_and_print(board: Board) -> Result<(), BoardNotSolvableError> {
    let now = std::time::Instant::now();
    let mut solver = Solver::new(board);
    let solved = solver.solve()?;
    println!("solved in {:?}", now.elapsed());
    print_board(&solved);
    Ok(())
}

fn main() -> Result<(), BoardNotSolvableError> {
    if let Some(path) = std::env::args().nth(1) {
        let raw = std::fs::read_to_string(&path).expect("failed to read boards file");
        let boards = parse_boards_list(&raw);

        let now = std::time::Instant::now();
        for (index, board) in boards.into_iter().enumerate() {
            println!("board :: {index}");
            solve_and_print(board)?;
        }
        println!("took :: {:?}", now.elapsed());
        return Ok(());
    }

    let codegolf = parse_board(vec![
        vec!['.', '.', '.', '7', '.', '.', '.', '.', '.'],
        vec!['1', '.', '.', '.', '.', '.', '.', '.', '.'],
        vec!['.', '.', '.', '4', '3', '.', '2', '.', '.'],
        vec!['.', '.', '.', '.', '.', '.', '.', '.', '6'],
        vec!['.', '.', '.', '5', '.', '9', '.', '.', '.'],
        vec!['.', '.', '.', '.', '.', '.', '4', '1', '8'],
        vec!['.', '.', '.', '.', '8', '1', '.', '.', '.'],
        vec!['.', '.', '2', '.', '.', '.', '.', '5', '.'],
        vec!['.', '4', '.', '.', '.', '.', '3', '.', '.'],
    ]);
    solve_and_print(codegolf)
}
