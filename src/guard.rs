use crate::error::BotError;
use crate::snapshot::GameSnapshot;

/// Confirms a reply may act on the decoded parent snapshot: the parent must
/// be one of the bot's own messages and the reply must come from the player
/// to move. Either failing is silent, so third-party chatter in a game
/// thread never provokes a public response.
pub fn authorize_turn(
    previous: &GameSnapshot,
    parent_author: &str,
    reply_author: &str,
    bot_handle: &str,
) -> Result<(), BotError> {
    if parent_author != bot_handle {
        return Err(BotError::Silent(format!(
            "parent message was not authored by {}",
            bot_handle
        )));
    }
    if previous.next_move_player != reply_author {
        return Err(BotError::Silent(format!(
            "reply is from {} but {} is to move",
            reply_author, previous.next_move_player
        )));
    }
    Ok(())
}
