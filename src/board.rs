//! The rules engine: piece arena, cell stacks, move validation and the
//! move log that defines the board state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lines::{self, Line, VisibleGrid};
use crate::{
    IllegalMove, MoveRecord, Piece, PieceId, Player, Pos, ReplayError, Size, Symmetry,
};

// ============================================================================
// CELL STACKS
// ============================================================================

/// The pieces on one cell, as arena slots ordered bottom to top.
///
/// Sizes strictly increase towards the top, so a stack never holds more
/// than 3 pieces.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stack {
    slots: [u8; 3],
    len: u8,
}

impl Stack {
    /// Maximum stack height (one piece per size).
    pub const MAX: usize = 3;

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The visible piece.
    #[inline]
    pub fn top(&self) -> Option<PieceId> {
        self.as_slots().last().map(|&s| PieceId::from_slot(s as usize))
    }

    /// The piece directly beneath the top, i.e. what lifting the top reveals.
    #[inline]
    pub fn under_top(&self) -> Option<PieceId> {
        let slots = self.as_slots();
        slots
            .len()
            .checked_sub(2)
            .map(|i| PieceId::from_slot(slots[i] as usize))
    }

    /// Pieces from the top down.
    pub fn iter(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.as_slots()
            .iter()
            .rev()
            .map(|&s| PieceId::from_slot(s as usize))
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.as_slots().contains(&(id.slot() as u8))
    }

    #[inline]
    fn as_slots(&self) -> &[u8] {
        &self.slots[..self.len as usize]
    }

    /// Push a piece on top. Does NOT validate - caller must ensure the top
    /// is smaller.
    fn push(&mut self, id: PieceId) {
        debug_assert!(self.len() < Self::MAX);
        self.slots[self.len as usize] = id.slot() as u8;
        self.len += 1;
    }

    /// Remove a piece wherever it sits. Returns false if it was not here.
    fn remove(&mut self, id: PieceId) -> bool {
        let slot = id.slot() as u8;
        let Some(at) = self.as_slots().iter().position(|&s| s == slot) else {
            return false;
        };
        let len = self.len as usize;
        self.slots.copy_within(at + 1..len, at);
        self.slots[len - 1] = 0;
        self.len -= 1;
        true
    }
}

impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.as_slots() == other.as_slots()
    }
}

impl Eq for Stack {}

// ============================================================================
// TRIALS
// ============================================================================

/// A speculative sequence of moves that will be kept or discarded as a
/// unit. Obtained from [`Board::begin_trial`].
#[must_use = "a trial must be committed or rolled back"]
#[derive(Debug)]
pub struct Trial {
    start: usize,
}

impl Trial {
    /// Number of moves played since the trial began.
    pub fn moves_made(&self, board: &Board) -> usize {
        board.moves.len().saturating_sub(self.start)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Full game state: 12 pieces, 9 cell stacks, turn, winner and move log.
///
/// Every state is reachable by replaying [`moves`](Self::moves) from an
/// empty board; `undo`, `replay` and `reflect` work by doing exactly that.
/// Serializes as its move log.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<MoveRecord>", into = "Vec<MoveRecord>")]
pub struct Board {
    pieces: [Piece; PieceId::COUNT],
    grid: [Stack; 9],
    turn: Player,
    winner: Option<Player>,
    moves: Vec<MoveRecord>,
}

impl Board {
    /// Player to move on an empty board.
    pub const FIRST_PLAYER: Player = Player::X;

    /// Create an empty board: all pieces in reserve, X to move.
    pub fn new() -> Board {
        Board {
            pieces: std::array::from_fn(|slot| Piece::new(PieceId::from_slot(slot))),
            grid: [Stack::default(); 9],
            turn: Self::FIRST_PLAYER,
            winner: None,
            moves: Vec::new(),
        }
    }

    /// Build a board by replaying `records` from the empty state.
    pub fn from_moves(records: &[MoveRecord]) -> Result<Board, IllegalMove> {
        let mut board = Board::new();
        for &record in records {
            board.play_record(record)?;
        }
        Ok(board)
    }

    // ========== Queries ==========

    /// The player to move.
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// True once some line is visibly owned by one player.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// The move log, oldest first.
    #[inline]
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// The move log in text notation.
    pub fn notation(&self) -> Vec<String> {
        self.moves.iter().map(MoveRecord::to_string).collect()
    }

    /// All 12 pieces in roster order.
    #[inline]
    pub fn pieces(&self) -> &[Piece; PieceId::COUNT] {
        &self.pieces
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.slot()]
    }

    /// Look up a piece by its identity fields.
    pub fn find(&self, owner: Player, size: Size, index: u8) -> Result<&Piece, IllegalMove> {
        PieceId::new(owner, size, index).map(|id| self.piece(id))
    }

    /// The six pieces owned by `player`.
    pub fn player_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.owner() == player)
    }

    /// Pieces of `player` that have never been placed.
    pub fn reserve(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.player_pieces(player).filter(|p| p.in_reserve())
    }

    /// The stack on a cell. `pos` must be valid.
    #[inline]
    pub fn stack(&self, pos: Pos) -> &Stack {
        &self.grid[pos.index()]
    }

    /// The visible piece on a cell. `pos` must be valid.
    pub fn top(&self, pos: Pos) -> Option<&Piece> {
        self.stack(pos).top().map(|id| self.piece(id))
    }

    /// Owner of the visible piece on every cell.
    pub fn visible_grid(&self) -> VisibleGrid {
        self.grid.map(|stack| stack.top().map(|id| id.owner()))
    }

    /// The 8 scoring lines, recomputed on every call.
    pub fn iter_lines(&self) -> impl Iterator<Item = Line<'_>> + '_ {
        lines::LINES
            .iter()
            .map(move |&cells| Line::new(cells, &self.grid))
    }

    /// Every move the player to move may make, pieces in roster order and
    /// cells row-major. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<MoveRecord> {
        self.player_pieces(self.turn)
            .flat_map(|piece| Pos::all().map(move |to| (piece.id(), to)))
            .filter(|&(id, to)| self.validate_move(id, to).is_ok())
            .map(|(id, to)| MoveRecord::new(id, to))
            .collect()
    }

    // ========== Validation ==========

    /// Check whether `piece` may move to `to` without changing anything.
    ///
    /// Checks, in order: piece identity, turn, bounds, covered, game over, destination top
    /// size, and finally that lifting the piece does not by itself expose a
    /// completed line for either player.
    pub fn validate_move(&self, piece: PieceId, to: Pos) -> Result<(), IllegalMove> {
        let piece = PieceId::new(piece.owner(), piece.size(), piece.index())?;
        if piece.owner() != self.turn {
            return Err(IllegalMove::WrongTurn(piece.owner()));
        }
        if !to.is_valid() {
            return Err(IllegalMove::OutOfBounds(to));
        }
        let current = self.piece(piece);
        if current.covered() {
            return Err(IllegalMove::PieceCovered);
        }
        if self.is_terminal() {
            return Err(IllegalMove::GameOver);
        }
        if let Some(top) = self.stack(to).top() {
            if !piece.size().can_gobble(top.size()) {
                return Err(IllegalMove::CellBlocked(to));
            }
        }

        // Reveal rule: the lifted piece is a top, so the cell shows whatever
        // was beneath it.
        if let Some(from) = current.location() {
            let mut grid = self.visible_grid();
            grid[from.index()] = self.stack(from).under_top().map(|id| id.owner());
            if lines::completed_line(&grid).is_some() {
                return Err(IllegalMove::IllegalReveal);
            }
        }
        Ok(())
    }

    // ========== Play ==========

    /// Play a move given the piece's identity fields.
    pub fn play(
        &mut self,
        owner: Player,
        size: Size,
        index: u8,
        to: impl Into<Pos>,
    ) -> Result<(), IllegalMove> {
        let id = self.find(owner, size, index)?.id();
        self.play_piece(id, to.into())
    }

    /// Play a recorded move.
    pub fn play_record(&mut self, record: MoveRecord) -> Result<(), IllegalMove> {
        self.play_piece(record.piece()?, record.to)
    }

    /// Validate and apply a move. On error the board is unchanged.
    pub fn play_piece(&mut self, id: PieceId, to: Pos) -> Result<(), IllegalMove> {
        self.validate_move(id, to)?;

        if let Some(top) = self.stack(to).top() {
            self.pieces[top.slot()].set_covered(true);
        }
        if let Some(from) = self.piece(id).location() {
            let stack = &mut self.grid[from.index()];
            stack.remove(id);
            if let Some(revealed) = stack.top() {
                self.pieces[revealed.slot()].set_covered(false);
            }
        }
        self.grid[to.index()].push(id);
        let piece = &mut self.pieces[id.slot()];
        piece.set_location(Some(to));
        piece.set_covered(false);

        let record = MoveRecord::new(id, to);
        self.moves.push(record);
        self.turn = self.turn.opponent();
        debug!(%record, "move played");

        self.winner = lines::completed_line(&self.visible_grid());
        if let Some(winner) = self.winner {
            debug!(%winner, moves = self.moves.len(), "game over");
        }
        Ok(())
    }

    // ========== Log Transforms ==========

    /// Drop the last `n` moves and rebuild the board from the rest.
    pub fn undo(&mut self, n: usize) -> Result<(), IllegalMove> {
        let available = self.moves.len();
        if n > available {
            return Err(IllegalMove::InvalidUndoDepth { requested: n, available });
        }
        debug!(n, "undo");
        let kept = &self.moves[..available - n];
        *self = Board::from_moves(kept)?;
        Ok(())
    }

    /// Reset and replay `records`. If any record is illegal the board is left
    /// unchanged and the first failure is returned.
    pub fn replay(&mut self, records: &[MoveRecord]) -> Result<(), IllegalMove> {
        *self = Board::from_moves(records)?;
        debug!(moves = records.len(), "replayed");
        Ok(())
    }

    /// Parse move text and replay it.
    pub fn replay_notation<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<(), ReplayError> {
        let records = moves
            .iter()
            .map(|m| m.as_ref().parse::<MoveRecord>())
            .collect::<Result<Vec<_>, _>>()?;
        self.replay(&records)?;
        Ok(())
    }

    /// Apply symmetry `code` (0-3) to every recorded destination and rebuild.
    pub fn reflect(&mut self, code: u8) -> Result<(), IllegalMove> {
        self.reflect_with(Symmetry::try_from(code)?)
    }

    /// Apply `symmetry` to every recorded destination and rebuild.
    pub fn reflect_with(&mut self, symmetry: Symmetry) -> Result<(), IllegalMove> {
        let reflected: Vec<MoveRecord> =
            self.moves.iter().map(|record| record.reflect(symmetry)).collect();
        debug!(?symmetry, "reflect");
        self.replay(&reflected)
    }

    // ========== Trials ==========

    /// Start a speculative sequence of moves.
    pub fn begin_trial(&self) -> Trial {
        Trial { start: self.moves.len() }
    }

    /// Keep every move made since the trial began.
    pub fn commit(&self, trial: Trial) {
        debug!(moves = trial.moves_made(self), "trial committed");
    }

    /// Undo every move made since the trial began.
    pub fn rollback(&mut self, trial: Trial) -> Result<(), IllegalMove> {
        let n = trial.moves_made(self);
        self.undo(n)
    }

    // ========== Rendering ==========

    /// Draw the board: each cell is three 3-character rows showing its
    /// visible piece, cells separated by `|`, rows of cells by `---+---+---`.
    ///
    /// ```text
    ///    |XXX|
    ///  OO|XXX| O
    ///  OO|XXX|
    /// ---+---+---
    /// ```
    pub fn render(&self) -> String {
        const EMPTY: &str = "         ";
        let glyphs: Vec<String> = Pos::all()
            .map(|pos| match self.top(pos) {
                Some(piece) => piece.glyph(),
                None => EMPTY.to_string(),
            })
            .collect();

        let mut output = String::new();
        for (r, row) in glyphs.chunks(3).enumerate() {
            for i in 0..3 {
                let slice = 3 * i..3 * (i + 1);
                output.push_str(&format!(
                    "{}|{}|{}\n",
                    &row[0][slice.clone()],
                    &row[1][slice.clone()],
                    &row[2][slice]
                ));
            }
            if r < 2 {
                output.push_str("---+---+---\n");
            }
        }
        output
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<Vec<MoveRecord>> for Board {
    type Error = IllegalMove;

    fn try_from(records: Vec<MoveRecord>) -> Result<Self, Self::Error> {
        Board::from_moves(&records)
    }
}

impl From<Board> for Vec<MoveRecord> {
    fn from(board: Board) -> Self {
        board.moves
    }
}
