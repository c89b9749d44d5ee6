//! The message codec. Every bot-authored status is both a human-readable
//! update and the only persisted record of the game, so the three state
//! fields must survive a round trip through the public reply chain:
//!
//! ```text
//! Check!
//! To move: @carol
//! Last: Nf3 by @bob
//! Board: "rnbqkbnr/..."
//! ```
//!
//! Lines may appear in any order; the optional check line is decorative and
//! carries no decoded field.

use thiserror::Error;

pub type PlayerHandle = String;

/// `last_move_text` sentinel for a game that has no moves yet.
pub const NEW_GAME_MOVE: &str = "New";

/// Decode failures mean the bot's own prior message was malformed. They are
/// never reported to users.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("no board line parsed")]
    MissingBoard,
    #[error("no last-move author parsed")]
    MissingLastMoveAuthor,
    #[error("no next-move author parsed")]
    MissingNextMoveAuthor,
}

/// The complete game state carried by one bot message. Immutable once
/// created; a move produces a fresh snapshot, never a patched one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub position_code: String,
    pub last_move_text: String,
    pub last_move_player: PlayerHandle,
    pub next_move_player: PlayerHandle,
}

impl GameSnapshot {
    pub fn new(
        position_code: String,
        last_move_text: String,
        last_move_player: PlayerHandle,
        next_move_player: PlayerHandle,
    ) -> Self {
        debug_assert_ne!(last_move_player, next_move_player);
        Self {
            position_code,
            last_move_text,
            last_move_player,
            next_move_player,
        }
    }

    /// Scans the text line by line with one recognizer per field; first match
    /// of each kind wins.
    pub fn decode(text: &str) -> Result<Self, DecodeFailure> {
        let mut board = None;
        let mut last_move = None;
        let mut next_player = None;

        for line in text.lines() {
            if board.is_none() {
                if let Some(code) = board_line(line) {
                    board = Some(code);
                    continue;
                }
            }
            if last_move.is_none() {
                if let Some(parsed) = last_move_line(line) {
                    last_move = Some(parsed);
                    continue;
                }
            }
            if next_player.is_none() {
                next_player = to_move_line(line);
            }
        }

        let position_code = board.ok_or(DecodeFailure::MissingBoard)?;
        let (last_move_text, last_move_player) =
            last_move.ok_or(DecodeFailure::MissingLastMoveAuthor)?;
        let next_move_player = next_player.ok_or(DecodeFailure::MissingNextMoveAuthor)?;

        Ok(Self {
            position_code,
            last_move_text,
            last_move_player,
            next_move_player,
        })
    }

    pub fn encode(&self, is_check: bool) -> String {
        let check_text = if is_check { "Check!\n" } else { "" };
        format!(
            "{}To move: @{}\nLast: {} by @{}\nBoard: \"{}\"\n",
            check_text,
            self.next_move_player,
            self.last_move_text,
            self.last_move_player,
            self.position_code,
        )
    }
}

fn board_line(line: &str) -> Option<String> {
    let rest = line.strip_prefix("Board: \"")?;
    let end = rest.rfind('"')?;
    Some(rest[..end].to_owned())
}

fn last_move_line(line: &str) -> Option<(String, PlayerHandle)> {
    let rest = line.strip_prefix("Last: ")?;
    let (move_text, handle) = rest.rsplit_once(" by @")?;
    Some((move_text.to_owned(), handle.to_owned()))
}

fn to_move_line(line: &str) -> Option<PlayerHandle> {
    line.strip_prefix("To move: @").map(str::to_owned)
}
