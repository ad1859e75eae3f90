#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod dlx;
pub mod solver;
