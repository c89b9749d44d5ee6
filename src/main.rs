use std::env;
use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use log::{info, warn};

use chessbot::{BotConfig, ChessBot, Credentials, TwitterClient};

const RECONNECT_DELAY: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    info!("Starting");

    let bot_handle = env::var("BOT_HANDLE").unwrap_or_else(|_| "chessbot2020".to_owned());
    let creds_path = env::var("CREDS_PATH").unwrap_or_else(|_| "creds".to_owned());
    let creds = Credentials::load(Path::new(&creds_path))?;
    let proxy = env::var("PROXY").ok();

    let client = TwitterClient::new(&creds, proxy.as_deref())?;
    let config = BotConfig::new(&bot_handle);
    let track = format!("@{}", config.bot_handle);
    let bot = ChessBot::new(config, TwitterClient::new(&creds, proxy.as_deref())?);

    loop {
        match client.mention_stream(&track).await {
            Ok(stream) => {
                info!("Created stream, tracking {}", track);
                futures::pin_mut!(stream);
                while let Some(event) = stream.next().await {
                    match event {
                        Ok(reply) => {
                            if let Err(e) = bot.handle_reply(reply).await {
                                warn!("Platform error while handling a reply: {}", e);
                            }
                        }
                        Err(e) => {
                            warn!("Stream error: {}", e);
                            break;
                        }
                    }
                }
                warn!("Stream ended, reconnecting");
            }
            Err(e) => warn!("Could not open stream: {}", e),
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}
