//! Gobblers: stacking tic-tac-toe rules engine and heuristic agent.
//!
//! # Pieces
//!
//! ```text
//! Each player owns 6 pieces: 2 each of Small (1), Medium (2), Large (3).
//! A piece is identified by (owner, size, index) with index 0 or 1.
//!
//! Arena slot (0-11), roster order:
//!   X: S0=0  S1=1  M0=2  M1=3  L0=4  L1=5
//!   O: S0=6  S1=7  M0=8  M1=9  L0=10 L1=11
//! ```
//!
//! # Cells
//!
//! ```text
//!   (0,0) (0,1) (0,2)
//!   (1,0) (1,1) (1,2)
//!   (2,0) (2,1) (2,2)
//! ```
//!
//! Each cell holds a stack of piece slots. Only the top piece is visible and
//! counts toward a line; a piece may only be pushed onto a strictly smaller
//! top. The board state is a pure function of its move log: undo and
//! reflection rewrite the log and replay it from an empty board.
//!
//! # Move Notation
//!
//! ```text
//! {owner}-{size}-{index}-{row}-{col}     e.g. "X-1-0-0-0"
//! ```

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod lines;
pub mod notation;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use agent::Agent;
pub use board::{Board, Stack, Trial};
pub use config::AgentConfig;
pub use error::{ConfigError, IllegalMove, NotationError, ReplayError};
pub use lines::Line;
pub use notation::{MoveRecord, Symmetry};

/// Player identifier. `X` always moves first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Both players in roster order.
    pub const ALL: [Player; 2] = [Player::X, Player::O];

    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// The single-letter label used in notation and rendering.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Player {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Player::X),
            "O" => Ok(Player::O),
            other => Err(NotationError::Owner(other.to_string())),
        }
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl Size {
    /// Check if this size can gobble (cover) another size.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        (self as u8) > (other as u8)
    }

    /// Convert from the notation number (1, 2, 3) to Size.
    #[inline]
    pub fn from_number(n: u8) -> Option<Size> {
        match n {
            1 => Some(Size::Small),
            2 => Some(Size::Medium),
            3 => Some(Size::Large),
            _ => None,
        }
    }

    /// Get all sizes as an iterator.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// A cell coordinate. Values outside 0-2 are representable so that
/// external input can be rejected with [`IllegalMove::OutOfBounds`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Pos {
        Pos { row, col }
    }

    /// Check if this is a cell of the 3x3 board.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.row < 3 && self.col < 3
    }

    /// Row-major index (0-8). Only meaningful for valid positions.
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * 3 + self.col as usize
    }

    /// Iterate over all 9 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9u8).map(|i| Pos::new(i / 3, i % 3))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl From<(u8, u8)> for Pos {
    fn from((row, col): (u8, u8)) -> Self {
        Pos::new(row, col)
    }
}

/// Immutable identity of one of the 12 pieces.
///
/// Only built through [`PieceId::new`] or from an arena slot, so the index is
/// always 0 or 1.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct PieceId {
    owner: Player,
    size: Size,
    index: u8,
}

impl PieceId {
    /// Number of pieces on a board.
    pub const COUNT: usize = 12;

    /// Validate and build a piece identity.
    pub fn new(owner: Player, size: Size, index: u8) -> Result<PieceId, IllegalMove> {
        if index > 1 {
            return Err(IllegalMove::UnknownPiece { owner, size, index });
        }
        Ok(PieceId { owner, size, index })
    }

    /// Arena slot (0-11), see the crate docs for the layout.
    #[inline]
    pub fn slot(self) -> usize {
        let owner = match self.owner {
            Player::X => 0,
            Player::O => 1,
        };
        owner * 6 + (self.size as usize - 1) * 2 + self.index as usize
    }

    /// Inverse of [`slot`](Self::slot).
    #[inline]
    pub fn from_slot(slot: usize) -> PieceId {
        debug_assert!(slot < Self::COUNT);
        let owner = if slot < 6 { Player::X } else { Player::O };
        let within = slot % 6;
        let size = match within / 2 {
            0 => Size::Small,
            1 => Size::Medium,
            _ => Size::Large,
        };
        PieceId { owner, size, index: (within % 2) as u8 }
    }

    #[inline]
    pub fn owner(self) -> Player {
        self.owner
    }

    #[inline]
    pub fn size(self) -> Size {
        self.size
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.index
    }

    /// All 12 identities in roster order.
    pub fn roster() -> impl Iterator<Item = PieceId> {
        (0..Self::COUNT).map(PieceId::from_slot)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.owner, self.size, self.index)
    }
}

/// A piece with its placement state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    id: PieceId,
    location: Option<Pos>,
    covered: bool,
}

impl Piece {
    /// A piece in reserve.
    pub fn new(id: PieceId) -> Piece {
        Piece { id, location: None, covered: false }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn owner(&self) -> Player {
        self.id.owner
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.id.size
    }

    #[inline]
    pub fn index(&self) -> u8 {
        self.id.index
    }

    /// Current cell, or `None` while in reserve.
    #[inline]
    pub fn location(&self) -> Option<Pos> {
        self.location
    }

    /// True while a larger piece sits above this one.
    #[inline]
    pub fn covered(&self) -> bool {
        self.covered
    }

    #[inline]
    pub fn in_reserve(&self) -> bool {
        self.location.is_none()
    }

    /// Check if this piece can gobble another piece.
    #[inline]
    pub fn can_gobble(&self, other: &Piece) -> bool {
        self.size().can_gobble(other.size())
    }

    pub(crate) fn set_location(&mut self, location: Option<Pos>) {
        self.location = location;
    }

    pub(crate) fn set_covered(&mut self, covered: bool) {
        self.covered = covered;
    }

    /// The 9-character field drawn for this piece, read as three 3-character
    /// rows.
    ///
    /// ```text
    /// Small:  "    X    "    Medium: "    XX XX"    Large: "XXXXXXXXX"
    /// ```
    pub fn glyph(&self) -> String {
        let c = self.owner().as_char();
        match self.size() {
            Size::Small => format!("    {c}    "),
            Size::Medium => format!("    {c}{c} {c}{c}"),
            Size::Large => std::iter::repeat_n(c, 9).collect(),
        }
    }
}
