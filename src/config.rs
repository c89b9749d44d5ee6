use std::fs;
use std::io;
use std::path::Path;

/// Runtime configuration for the state machine. The bot identity and image
/// size are passed in here rather than living as compile-time globals.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub bot_handle: String,
    pub image_size: u32,
    pub max_move_length: usize,
}

impl BotConfig {
    pub fn new(bot_handle: impl Into<String>) -> Self {
        Self {
            bot_handle: bot_handle.into(),
            image_size: 600,
            max_move_length: 20,
        }
    }
}

/// API credentials. The `creds` file keeps its four-line layout (consumer
/// key and secret, access token and secret); requests carry the access
/// token as a bearer, so only line three is retained. Request signing with
/// the other three values is not modeled.
#[derive(Clone)]
pub struct Credentials {
    pub access_token: String,
}

impl Credentials {
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        match lines.as_slice() {
            [_key, _secret, access_token, _token_secret, ..] => Ok(Self {
                access_token: (*access_token).to_owned(),
            }),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "creds file needs four lines",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_carries_defaults() {
        let config = BotConfig::new("chessbot2020");
        assert_eq!(config.bot_handle, "chessbot2020");
        assert_eq!(config.image_size, 600);
        assert_eq!(config.max_move_length, 20);
    }

    #[test]
    fn creds_require_four_lines() {
        let dir = std::env::temp_dir().join("chessbot-creds-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("creds");
        fs::write(&path, "key\nsecret\ntoken\n").unwrap();
        assert!(Credentials::load(&path).is_err());
        fs::write(&path, "key\nsecret\ntoken\ntoken-secret\n").unwrap();
        let creds = Credentials::load(&path).unwrap();
        assert_eq!(creds.access_token, "token");
    }
}
