//! Error types for the rules engine, move notation and configuration.

use thiserror::Error;

use crate::{Player, Pos, Size};

/// Reasons a move (or a log transform) is rejected by the board.
///
/// The board always surfaces these to its caller. Only the agent treats
/// them as an ordinary "skip this candidate" signal while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("it is not {0}'s turn")]
    WrongTurn(Player),

    #[error("location {0} is outside the 3x3 board")]
    OutOfBounds(Pos),

    #[error("this piece is covered and cannot move")]
    PieceCovered,

    #[error("the game is over")]
    GameOver,

    #[error("{0} is occupied by a piece of the same or larger size")]
    CellBlocked(Pos),

    #[error("this move reveals three in a row")]
    IllegalReveal,

    #[error("no piece {owner}-{size}-{index}")]
    UnknownPiece { owner: Player, size: Size, index: u8 },

    #[error("reflection code must be 0, 1, 2, or 3 (got {0})")]
    InvalidSymmetryCode(u8),

    #[error("cannot undo {requested} moves with only {available} recorded")]
    InvalidUndoDepth { requested: usize, available: usize },
}

/// Malformed move text (`"{owner}-{size}-{index}-{row}-{col}"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("move {0:?} must have 5 '-'-separated fields")]
    FieldCount(String),

    #[error("move must start with player 'X' or 'O', got {0:?}")]
    Owner(String),

    #[error("piece size must be 1, 2, or 3, got {0:?}")]
    Size(String),

    #[error("expected a small non-negative integer, got {0:?}")]
    Number(String),
}

/// Failure to load an [`AgentConfig`](crate::AgentConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse agent config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_turns must be at least 1")]
    ZeroTurns,
}

/// Either a parse failure or an illegal move, for APIs that take move text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Illegal(#[from] IllegalMove),
}
