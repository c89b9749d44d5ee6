//! Adapter over the `chess` crate. The position code carried in messages is
//! a FEN string; legality lives entirely in the engine, this module only
//! translates between tokens, FEN and board queries.

use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, Piece};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid position code: {0}")]
    InvalidPosition(String),
    #[error("move {0:?} rejected in both notations")]
    IllegalMove(String),
}

#[derive(Debug)]
pub struct ChessState {
    board: Board,
    last_move: Option<ChessMove>,
}

impl ChessState {
    /// The standard starting position.
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            last_move: None,
        }
    }

    pub fn from_position_code(code: &str) -> Result<Self, EngineError> {
        let board =
            Board::from_str(code).map_err(|e| EngineError::InvalidPosition(e.to_string()))?;
        Ok(Self {
            board,
            last_move: None,
        })
    }

    pub fn position_code(&self) -> String {
        self.board.to_string()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_move(&self) -> Option<ChessMove> {
        self.last_move
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Tries the token as piece-and-square notation first, then as a
    /// coordinate move.
    pub fn apply_move(&mut self, token: &str) -> Result<(), EngineError> {
        if let Ok(mv) = ChessMove::from_san(&self.board, token) {
            self.push(mv);
            return Ok(());
        }
        match ChessMove::from_str(token) {
            Ok(mv) if self.board.legal(mv) => {
                self.push(mv);
                Ok(())
            }
            _ => Err(EngineError::IllegalMove(token.to_owned())),
        }
    }

    fn push(&mut self, mv: ChessMove) {
        self.board = self.board.make_move_new(mv);
        self.last_move = Some(mv);
    }

    pub fn is_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    pub fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    pub fn is_game_over(&self) -> bool {
        self.board.status() != BoardStatus::Ongoing || self.insufficient_material()
    }

    pub fn is_draw(&self) -> bool {
        self.is_game_over() && !self.is_checkmate() && !self.is_stalemate()
    }

    // A bare FEN carries no repetition or move-count history, so material is
    // the only non-mate draw condition decidable here: K vs K, KB vs K and
    // KN vs K.
    fn insufficient_material(&self) -> bool {
        match self.board.combined().popcnt() {
            2 => true,
            3 => {
                let minors = self.board.pieces(Piece::Bishop).popcnt()
                    + self.board.pieces(Piece::Knight).popcnt();
                minors == 1
            }
            _ => false,
        }
    }
}

impl Default for ChessState {
    fn default() -> Self {
        Self::new()
    }
}
