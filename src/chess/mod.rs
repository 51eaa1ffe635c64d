//! Implementation of the chess rules: board representation, piece movement,
//! check, checkmate and stalemate detection.

pub mod board;
pub mod core;
pub mod piece;
pub mod rules;
