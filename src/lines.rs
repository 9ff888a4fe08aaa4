//! The 8 scoring lines and what is visible on them.

use crate::board::Stack;
use crate::{Player, Pos};

/// Owner of the top piece of each cell, indexed by [`Pos::index`].
pub type VisibleGrid = [Option<Player>; 9];

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const LINES: [[Pos; 3]; 8] = [
    [Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)], // Row 0
    [Pos::new(1, 0), Pos::new(1, 1), Pos::new(1, 2)], // Row 1
    [Pos::new(2, 0), Pos::new(2, 1), Pos::new(2, 2)], // Row 2
    [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)], // Col 0
    [Pos::new(0, 1), Pos::new(1, 1), Pos::new(2, 1)], // Col 1
    [Pos::new(0, 2), Pos::new(1, 2), Pos::new(2, 2)], // Col 2
    [Pos::new(0, 0), Pos::new(1, 1), Pos::new(2, 2)], // Main diagonal
    [Pos::new(0, 2), Pos::new(1, 1), Pos::new(2, 0)], // Anti-diagonal
];

/// One scoring line as seen on the current board.
#[derive(Clone, Copy, Debug)]
pub struct Line<'a> {
    /// The three cells, in line order.
    pub cells: [Pos; 3],
    /// Owner of the visible piece on each cell.
    pub visible: [Option<Player>; 3],
    /// Full stack on each cell.
    pub stacks: [&'a Stack; 3],
}

impl<'a> Line<'a> {
    pub(crate) fn new(cells: [Pos; 3], grid: &'a [Stack; 9]) -> Line<'a> {
        let stacks = cells.map(move |pos| &grid[pos.index()]);
        Line {
            cells,
            visible: stacks.map(|stack| stack.top().map(|id| id.owner())),
            stacks,
        }
    }

    /// Number of cells whose visible piece belongs to `player`.
    pub fn count(&self, player: Player) -> usize {
        self.visible.iter().filter(|&&owner| owner == Some(player)).count()
    }

    /// The player owning all three visible pieces, if any.
    pub fn owner(&self) -> Option<Player> {
        line_owner(self.visible)
    }

    /// Check if `pos` is one of this line's cells.
    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }
}

fn line_owner(visible: [Option<Player>; 3]) -> Option<Player> {
    match visible {
        [Some(a), Some(b), Some(c)] if a == b && b == c => Some(a),
        _ => None,
    }
}

/// Owner of the first line whose three visible pieces match, if any.
pub fn completed_line(grid: &VisibleGrid) -> Option<Player> {
    LINES
        .iter()
        .find_map(|cells| line_owner(cells.map(|pos| grid[pos.index()])))
}
