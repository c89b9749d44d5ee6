//! Free-text parsing of incoming replies: the move token, the new-game
//! trigger phrase, and opponent resolution from the mention set.

use std::collections::HashSet;

use thiserror::Error;

use crate::snapshot::PlayerHandle;

/// Replies start with one or more @mentions by platform convention; the
/// first token after them is the move. Later tokens (annotations,
/// commentary) are ignored.
pub fn extract_move_token(raw_text: &str) -> String {
    raw_text
        .split(' ')
        .find(|word| !word.starts_with('@'))
        .map(|word| word.trim().to_owned())
        .unwrap_or_default()
}

/// True iff the text asks for a new game. A leading quote marks the phrase
/// as quoted from someone else's earlier request, not a request itself.
pub fn is_new_game_request(raw_text: &str) -> bool {
    raw_text.contains("new game")
        && !raw_text.contains("\"new game")
        && !raw_text.contains("'new game")
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("can not determine username of other player ({remaining} remaining users)")]
pub struct AmbiguousOpponent {
    pub remaining: usize,
}

/// Set difference: mentions minus the requester minus the bot identity must
/// leave exactly one handle, the opponent.
pub fn resolve_opponent(
    mentions: &HashSet<PlayerHandle>,
    requester: &str,
    bot_handle: &str,
) -> Result<PlayerHandle, AmbiguousOpponent> {
    let remaining: Vec<&PlayerHandle> = mentions
        .iter()
        .filter(|handle| handle.as_str() != requester && handle.as_str() != bot_handle)
        .collect();
    match remaining.as_slice() {
        [opponent] => Ok((*opponent).clone()),
        _ => Err(AmbiguousOpponent {
            remaining: remaining.len(),
        }),
    }
}
