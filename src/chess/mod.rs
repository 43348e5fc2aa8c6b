//! Implementation of the 10×10 chess variant: board geometry, pieces and their
//! movement, legality, game-terminal states and move notation.

pub mod bitboard;
pub mod board;
pub mod core;
pub mod game;
pub mod notation;
pub mod piece;
pub mod position;
