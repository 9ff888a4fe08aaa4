//! Greedy three-tier move selection: win if possible, otherwise block the
//! opponent's two-in-a-row safely, otherwise bring a new piece into play.
//!
//! The agent only uses the board's public interface. Illegal candidates are
//! expected while searching and are skipped, never propagated.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace, warn};

use crate::{AgentConfig, Board, PieceId, Player, Pos};

/// Heuristic player bound to a board.
///
/// Holds no search state between calls; every call re-reads the board. The
/// RNG only decides the order in which candidates are tried.
pub struct Agent<'a, R: Rng = ChaCha20Rng> {
    board: &'a mut Board,
    rng: R,
    max_turns: usize,
}

impl<'a> Agent<'a, ChaCha20Rng> {
    /// Agent with an entropy-seeded RNG.
    pub fn new(board: &'a mut Board) -> Self {
        Self::with_rng(board, ChaCha20Rng::from_rng(&mut rand::rng()))
    }

    /// Agent whose candidate order is reproducible.
    pub fn with_seed(board: &'a mut Board, seed: u64) -> Self {
        Self::with_rng(board, ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_config(board: &'a mut Board, config: &AgentConfig) -> Self {
        let mut agent = match config.seed {
            Some(seed) => Self::with_seed(board, seed),
            None => Self::new(board),
        };
        agent.max_turns = config.max_turns;
        agent
    }
}

impl<'a, R: Rng> Agent<'a, R> {
    pub fn with_rng(board: &'a mut Board, rng: R) -> Self {
        Agent {
            board,
            rng,
            max_turns: AgentConfig::default().max_turns,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.board
    }

    /// Direct access for callers that interleave their own moves.
    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        self.board
    }

    /// Play one move: win, else defend, else place a reserve piece, else any
    /// legal move. Returns false if nothing could be played.
    pub fn play(&mut self) -> bool {
        if self.board.is_terminal() {
            return false;
        }
        self.check_winning_move() || self.defend() || self.prefer_new() || self.random_play()
    }

    /// Call [`play`](Self::play) until the game ends, nothing can be played,
    /// or the turn cap is reached. Returns the number of moves made.
    pub fn play_out(&mut self) -> usize {
        let mut made = 0;
        for _ in 0..self.max_turns {
            if self.board.is_terminal() || !self.play() {
                break;
            }
            made += 1;
        }
        debug!(made, winner = ?self.board.winner(), "play out finished");
        made
    }

    /// Play the first legal move among the current player's pieces and all
    /// cells, both in shuffled order.
    pub fn random_play(&mut self) -> bool {
        if self.board.is_terminal() {
            return false;
        }
        let player = self.board.turn();
        let pieces: Vec<PieceId> = self.board.player_pieces(player).map(|p| p.id()).collect();
        self.play_first_shuffled(pieces)
    }

    /// Like [`random_play`](Self::random_play) but only with pieces that
    /// are still in reserve.
    pub fn prefer_new(&mut self) -> bool {
        if self.board.is_terminal() {
            return false;
        }
        let player = self.board.turn();
        let pieces: Vec<PieceId> = self.board.reserve(player).map(|p| p.id()).collect();
        self.play_first_shuffled(pieces)
    }

    /// Complete a line the current player already shows two pieces on.
    ///
    /// Pieces already sitting on that line are not moved. Plays the first
    /// legal completion and returns true, or returns false having changed
    /// nothing.
    pub fn check_winning_move(&mut self) -> bool {
        if self.board.is_terminal() {
            return false;
        }
        let player = self.board.turn();

        for (cells, visible) in self.lines_with_two(player) {
            for (cell, owner) in cells.into_iter().zip(visible) {
                if owner == Some(player) {
                    continue;
                }
                for piece in self.candidates(player, &cells) {
                    if self.try_play(piece, cell) {
                        debug!(%player, %piece, %cell, "winning move");
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Block a line the opponent shows two pieces on.
    ///
    /// Each candidate is played speculatively and kept only if the opponent
    /// then has no immediate win; otherwise both the block and the
    /// opponent's reply are rolled back. The line's remaining cell is tried
    /// first, then covering the opponent's own pieces on it.
    pub fn defend(&mut self) -> bool {
        if self.board.is_terminal() {
            return false;
        }
        let player = self.board.turn();
        let opponent = player.opponent();

        for (cells, visible) in self.lines_with_two(opponent) {
            let (open, held): (Vec<_>, Vec<_>) = cells
                .into_iter()
                .zip(visible)
                .partition(|&(_, owner)| owner != Some(opponent));

            for (cell, _) in open.into_iter().chain(held) {
                for piece in self.candidates(player, &cells) {
                    let trial = self.board.begin_trial();
                    if !self.try_play(piece, cell) {
                        continue;
                    }
                    if self.check_winning_move() {
                        trace!(%piece, %cell, "block leaves a winning reply");
                        if let Err(err) = self.board.rollback(trial) {
                            warn!(%err, "failed to roll back speculative block");
                            return false;
                        }
                        continue;
                    }
                    self.board.commit(trial);
                    debug!(%player, %piece, %cell, "defended");
                    return true;
                }
            }
        }
        false
    }

    /// Lines on which `player` owns exactly two visible pieces, as
    /// (cells, visible owners) snapshots.
    fn lines_with_two(&self, player: Player) -> Vec<([Pos; 3], [Option<Player>; 3])> {
        self.board
            .iter_lines()
            .filter(|line| line.count(player) == 2)
            .map(|line| (line.cells, line.visible))
            .collect()
    }

    /// `player`'s pieces in roster order, minus those already on `cells`.
    fn candidates(&self, player: Player, cells: &[Pos; 3]) -> Vec<PieceId> {
        self.board
            .player_pieces(player)
            .filter(|p| !p.location().is_some_and(|loc| cells.contains(&loc)))
            .map(|p| p.id())
            .collect()
    }

    fn play_first_shuffled(&mut self, mut pieces: Vec<PieceId>) -> bool {
        let mut cells: Vec<Pos> = Pos::all().collect();
        pieces.shuffle(&mut self.rng);
        cells.shuffle(&mut self.rng);

        for piece in pieces {
            for &cell in &cells {
                if self.try_play(piece, cell) {
                    return true;
                }
            }
        }
        false
    }

    fn try_play(&mut self, piece: PieceId, cell: Pos) -> bool {
        match self.board.play_piece(piece, cell) {
            Ok(()) => true,
            Err(reason) => {
                trace!(%piece, %cell, %reason, "candidate rejected");
                false
            }
        }
    }
}
