//! The state machine that turns (parent message, reply) into the next game
//! status or a classified error.

use chess::Color;
use chrono::Utc;
use log::{info, warn};

use crate::config::BotConfig;
use crate::engine::ChessState;
use crate::error::{BotError, PlatformError};
use crate::guard::authorize_turn;
use crate::outcome::{classify, ClassifiedOutcome};
use crate::platform::{IncomingReply, Message, Platform};
use crate::render::render;
use crate::reply::{extract_move_token, is_new_game_request, resolve_opponent};
use crate::snapshot::{GameSnapshot, NEW_GAME_MOVE};

// User-visible texts are load-bearing: prior game threads were written with
// exactly these words.
const MOVE_TOO_LONG: &str =
    "Your tweet did not contain a legal move.\nTo try again, just reply again to my previous tweet.";
const MID_CONVERSATION_NEW_GAME: &str =
    "I do not start new games in the middle of a twitter conversation. Try a fresh tweet.";
const AMBIGUOUS_OPPONENT: &str =
    "To start a game with someone, please @ mention that person, and only that person, in your tweet.";
const GAME_ALREADY_OVER: &str = "Game is already over.";

fn illegal_move_text(token: &str) -> String {
    format!(
        "Your move \"{}\" was not a legal move.\nTo try again, just reply again to my previous tweet.",
        token
    )
}

/// A successfully advanced game: the snapshot to publish, its outcome, and
/// the position to render.
#[derive(Debug)]
pub struct GameUpdate {
    pub snapshot: GameSnapshot,
    pub outcome: ClassifiedOutcome,
    pub state: ChessState,
}

impl GameUpdate {
    fn new(snapshot: GameSnapshot, state: ChessState) -> Self {
        let outcome = classify(&state, &snapshot);
        Self {
            snapshot,
            outcome,
            state,
        }
    }

    pub fn status_text(&self) -> String {
        self.outcome.status_text(&self.snapshot)
    }

    /// Ongoing games face the side to move; a finished game faces the side
    /// that delivered the final move.
    pub fn orientation(&self) -> Color {
        if self.outcome.is_terminal() {
            !self.state.side_to_move()
        } else {
            self.state.side_to_move()
        }
    }
}

pub struct ChessBot<P> {
    config: BotConfig,
    platform: P,
}

impl<P: Platform> ChessBot<P> {
    pub fn new(config: BotConfig, platform: P) -> Self {
        Self { config, platform }
    }

    /// Processes one reply to completion. Public errors are answered in the
    /// thread, silent ones only logged; a platform failure while posting
    /// propagates to the caller.
    pub async fn handle_reply(&self, reply: IncomingReply) -> Result<(), PlatformError> {
        info!("Received reply from {}: {}", reply.author, reply.text);
        let parent = self.platform.fetch_parent(&reply).await;
        match self.advance(parent.as_ref(), &reply) {
            Ok(update) => self.post_update(&reply, update).await,
            Err(BotError::Public(text)) => self.post_error(&reply, &text).await,
            Err(BotError::Silent(reason)) => {
                warn!("Dropping reply from {}: {}", reply.author, reason);
                Ok(())
            }
        }
    }

    /// The pure core: no fetching, no posting, no clock.
    pub fn advance(
        &self,
        parent: Option<&Message>,
        reply: &IncomingReply,
    ) -> Result<GameUpdate, BotError> {
        if is_new_game_request(&reply.text) {
            if parent.is_some() {
                return Err(BotError::Public(MID_CONVERSATION_NEW_GAME.to_owned()));
            }
            return self.start_game(reply);
        }
        match parent {
            Some(parent) => self.apply_reply(parent, reply),
            None => Err(BotError::Silent(
                "neither a new game request nor a reply to a previous tweet".to_owned(),
            )),
        }
    }

    fn start_game(&self, reply: &IncomingReply) -> Result<GameUpdate, BotError> {
        let opponent = resolve_opponent(&reply.mentions, &reply.author, &self.config.bot_handle)
            .map_err(|e| {
                info!("{}", e);
                BotError::Public(AMBIGUOUS_OPPONENT.to_owned())
            })?;
        let state = ChessState::new();
        let snapshot = GameSnapshot::new(
            state.position_code(),
            NEW_GAME_MOVE.to_owned(),
            reply.author.clone(),
            opponent,
        );
        Ok(GameUpdate::new(snapshot, state))
    }

    fn apply_reply(&self, parent: &Message, reply: &IncomingReply) -> Result<GameUpdate, BotError> {
        let previous =
            GameSnapshot::decode(&parent.text).map_err(|e| BotError::Silent(e.to_string()))?;
        authorize_turn(
            &previous,
            &parent.author,
            &reply.author,
            &self.config.bot_handle,
        )?;

        let mut state = ChessState::from_position_code(&previous.position_code)
            .map_err(|e| BotError::Silent(e.to_string()))?;
        if state.is_game_over() {
            return Err(BotError::Public(GAME_ALREADY_OVER.to_owned()));
        }

        let token = extract_move_token(&reply.text);
        // oversized tokens are definitely not moves; the engine never sees
        // them. The bound counts characters, not bytes.
        if token.chars().count() > self.config.max_move_length {
            return Err(BotError::Public(MOVE_TOO_LONG.to_owned()));
        }
        info!("Attempting move {}", token);
        state
            .apply_move(&token)
            .map_err(|_| BotError::Public(illegal_move_text(&token)))?;

        let snapshot = GameSnapshot::new(
            state.position_code(),
            token,
            reply.author.clone(),
            previous.last_move_player,
        );
        Ok(GameUpdate::new(snapshot, state))
    }

    async fn post_update(
        &self,
        reply: &IncomingReply,
        update: GameUpdate,
    ) -> Result<(), PlatformError> {
        let status = update.status_text();
        info!("Posting status {:?} in reply to {}", status, reply.id);
        let image = render(&update.state, update.orientation(), self.config.image_size);
        self.platform
            .post_with_image(&status, image, &reply.id)
            .await
    }

    async fn post_error(&self, reply: &IncomingReply, text: &str) -> Result<(), PlatformError> {
        let status = format!(
            "@{} {}\nError time: {}",
            reply.author,
            text,
            Utc::now().timestamp()
        );
        self.platform.post_text(&status, &reply.id).await
    }
}
