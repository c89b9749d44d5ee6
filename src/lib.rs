pub mod bot;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod outcome;
pub mod platform;
pub mod render;
pub mod reply;
pub mod snapshot;
pub mod twitter;

pub use bot::{ChessBot, GameUpdate};
pub use config::{BotConfig, Credentials};
pub use engine::ChessState;
pub use error::{BotError, PlatformError};
pub use outcome::ClassifiedOutcome;
pub use platform::{IncomingReply, Message, Platform};
pub use snapshot::{GameSnapshot, PlayerHandle};
pub use twitter::TwitterClient;
