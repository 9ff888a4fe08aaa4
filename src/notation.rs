//! Move records, their text encoding, and the board symmetries applied to
//! recorded destinations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{IllegalMove, NotationError, PieceId, Player, Pos, Size};

/// The minimal information needed to replay a move: which piece, and where
/// it went.
///
/// Encoded as `"{owner}-{size}-{index}-{row}-{col}"`, e.g. `"X-1-0-0-0"`.
/// Parsing checks syntax only; whether the piece exists and the
/// destination is on the board is decided by the board when the record is
/// played.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveRecord {
    pub owner: Player,
    pub size: Size,
    pub index: u8,
    pub to: Pos,
}

impl MoveRecord {
    pub fn new(piece: PieceId, to: Pos) -> MoveRecord {
        MoveRecord { owner: piece.owner(), size: piece.size(), index: piece.index(), to }
    }

    /// Resolve the piece identity, rejecting indices outside 0-1.
    pub fn piece(&self) -> Result<PieceId, IllegalMove> {
        PieceId::new(self.owner, self.size, self.index)
    }

    /// The same move with its destination mapped through `symmetry`.
    pub fn reflect(self, symmetry: Symmetry) -> MoveRecord {
        MoveRecord { to: symmetry.apply(self.to), ..self }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}-{}",
            self.owner, self.size, self.index, self.to.row, self.to.col
        )
    }
}

fn parse_number(field: &str) -> Result<u8, NotationError> {
    field
        .parse::<u8>()
        .map_err(|_| NotationError::Number(field.to_string()))
}

impl FromStr for MoveRecord {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('-').collect();
        let &[owner, size, index, row, col] = fields.as_slice() else {
            return Err(NotationError::FieldCount(s.to_string()));
        };

        let owner = owner.parse::<Player>()?;
        let size = parse_number(size)
            .ok()
            .and_then(Size::from_number)
            .ok_or_else(|| NotationError::Size(size.to_string()))?;

        Ok(MoveRecord {
            owner,
            size,
            index: parse_number(index)?,
            to: Pos::new(parse_number(row)?, parse_number(col)?),
        })
    }
}

impl TryFrom<String> for MoveRecord {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MoveRecord> for String {
    fn from(record: MoveRecord) -> Self {
        record.to_string()
    }
}

/// One of the four reflections of the square, selected by code 0-3.
///
/// Every variant is its own inverse.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Symmetry {
    /// Mirror top-bottom: row -> 2 - row.
    FlipRows = 0,
    /// Mirror across the main diagonal: (row, col) -> (col, row).
    Transpose = 1,
    /// Mirror left-right: col -> 2 - col.
    FlipCols = 2,
    /// Mirror across the anti-diagonal: (row, col) -> (2 - col, 2 - row).
    AntiTranspose = 3,
}

impl Symmetry {
    pub const ALL: [Symmetry; 4] = [
        Symmetry::FlipRows,
        Symmetry::Transpose,
        Symmetry::FlipCols,
        Symmetry::AntiTranspose,
    ];

    /// Map a board position through this symmetry. Off-board positions are
    /// returned unchanged so the board can still reject them as out of bounds.
    pub fn apply(self, pos: Pos) -> Pos {
        if !pos.is_valid() {
            return pos;
        }
        let Pos { row, col } = pos;
        match self {
            Symmetry::FlipRows => Pos::new(2 - row, col),
            Symmetry::Transpose => Pos::new(col, row),
            Symmetry::FlipCols => Pos::new(row, 2 - col),
            Symmetry::AntiTranspose => Pos::new(2 - col, 2 - row),
        }
    }
}

impl TryFrom<u8> for Symmetry {
    type Error = IllegalMove;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Symmetry::ALL
            .get(code as usize)
            .copied()
            .ok_or(IllegalMove::InvalidSymmetryCode(code))
    }
}
