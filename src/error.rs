use thiserror::Error;

/// How a failed processing step is reported.
///
/// `Public` errors are answered with a reply addressed to the requester;
/// `Silent` errors are logged and dropped without any public response, so an
/// unrelated third party can never provoke the bot into tweeting.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("{0}")]
    Public(String),
    #[error("{0}")]
    Silent(String),
}

/// Transport-level failures talking to the platform. These propagate to the
/// outer stream loop; the core never retries them.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("unexpected response status: {0}")]
    Status(reqwest::StatusCode),
}
