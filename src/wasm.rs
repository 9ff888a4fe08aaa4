//! WASM bindings for gobblers
//!
//! Provides a JavaScript-friendly API over [`Board`] and [`Agent`].
//! Errors surface as thrown strings.

use wasm_bindgen::prelude::*;

use crate::{Agent, Board, MoveRecord, Player, Pos, Size};

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-friendly wrapper around Board
#[wasm_bindgen]
pub struct WasmBoard {
    inner: Board,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create a new empty board
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmBoard {
        WasmBoard { inner: Board::new() }
    }

    /// Rebuild a board from move strings such as `"X-1-0-0-0"`.
    #[wasm_bindgen(js_name = fromMoves)]
    pub fn from_moves(moves: Vec<String>) -> Result<WasmBoard, JsValue> {
        let mut inner = Board::new();
        inner.replay_notation(moves.as_slice()).map_err(js_err)?;
        Ok(WasmBoard { inner })
    }

    /// Play a piece, e.g. `play("X", 3, 0, 1, 1)`.
    pub fn play(&mut self, owner: &str, size: u8, index: u8, row: u8, col: u8) -> Result<(), JsValue> {
        let owner: Player = owner.parse().map_err(js_err)?;
        let size = Size::from_number(size).ok_or_else(|| js_err(format!("unknown size {size}")))?;
        self.inner
            .play(owner, size, index, Pos::new(row, col))
            .map_err(js_err)
    }

    /// Remove the last `n` moves.
    pub fn undo(&mut self, n: usize) -> Result<(), JsValue> {
        self.inner.undo(n).map_err(js_err)
    }

    /// Mirror the board; `code` is 0-3.
    pub fn reflect(&mut self, code: u8) -> Result<(), JsValue> {
        self.inner.reflect(code).map_err(js_err)
    }

    /// Reset and replay a move list. On error the board is unchanged.
    pub fn replay(&mut self, moves: Vec<String>) -> Result<(), JsValue> {
        self.inner.replay_notation(moves.as_slice()).map_err(js_err)
    }

    /// Move log as an array of strings
    pub fn moves(&self) -> Result<JsValue, JsValue> {
        let log: Vec<MoveRecord> = self.inner.moves().to_vec();
        serde_wasm_bindgen::to_value(&log).map_err(js_err)
    }

    /// Text rendering of the visible pieces
    pub fn render(&self) -> String {
        self.inner.render()
    }

    /// "X", "O", or undefined while the game is running
    pub fn winner(&self) -> Option<String> {
        self.inner.winner().map(|player| player.to_string())
    }

    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> String {
        self.inner.turn().to_string()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_terminal()
    }

    /// Pieces on a cell, bottom to top, as `"X-3-0"` identifiers.
    #[wasm_bindgen(js_name = cellStack)]
    pub fn cell_stack(&self, row: u8, col: u8) -> Result<Vec<String>, JsValue> {
        let pos = Pos::new(row, col);
        if !pos.is_valid() {
            return Err(js_err(format!("position {pos} is off the board")));
        }
        let mut stack: Vec<String> = self.inner.stack(pos).iter().map(|id| id.to_string()).collect();
        stack.reverse();
        Ok(stack)
    }

    /// Let the agent make one move for the side to play. Returns false if
    /// it found nothing to play.
    #[wasm_bindgen(js_name = agentPlay)]
    pub fn agent_play(&mut self, seed: Option<u64>) -> bool {
        let mut agent = match seed {
            Some(seed) => Agent::with_seed(&mut self.inner, seed),
            None => Agent::new(&mut self.inner),
        };
        agent.play()
    }

    /// Clone the board
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_board(&self) -> WasmBoard {
        WasmBoard { inner: self.inner.clone() }
    }
}

impl Default for WasmBoard {
    fn default() -> Self {
        Self::new()
    }
}
