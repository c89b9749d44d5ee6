//! Concrete platform client: status lookup, posting with media, and the
//! line-delimited JSON filter stream that yields mentions of the bot.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::warn;
use reqwest::multipart;
use serde::Deserialize;

use crate::config::Credentials;
use crate::error::PlatformError;
use crate::platform::{IncomingReply, Message, Platform};

const API_BASE: &str = "https://api.twitter.com/1.1";
const UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
const STREAM_URL: &str = "https://stream.twitter.com/1.1/statuses/filter.json";

#[derive(Debug, Deserialize)]
struct Status {
    id_str: String,
    #[serde(alias = "full_text")]
    text: String,
    user: StatusAuthor,
    #[serde(default)]
    in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    entities: Entities,
}

#[derive(Debug, Deserialize)]
struct StatusAuthor {
    screen_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Entities {
    #[serde(default)]
    user_mentions: Vec<Mention>,
}

#[derive(Debug, Deserialize)]
struct Mention {
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct MediaUpload {
    media_id_string: String,
}

impl From<Status> for IncomingReply {
    fn from(status: Status) -> Self {
        IncomingReply {
            id: status.id_str,
            author: status.user.screen_name,
            text: status.text,
            mentions: status
                .entities
                .user_mentions
                .into_iter()
                .map(|m| m.screen_name)
                .collect(),
            in_reply_to: status.in_reply_to_status_id_str,
        }
    }
}

impl Status {
    fn into_message(self) -> Message {
        Message {
            id: self.id_str,
            author: self.user.screen_name,
            text: self.text,
        }
    }
}

pub struct TwitterClient {
    http: reqwest::Client,
    token: String,
}

impl TwitterClient {
    pub fn new(creds: &Credentials, proxy: Option<&str>) -> Result<Self, PlatformError> {
        let mut builder = reqwest::Client::builder();
        if let Some(addr) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(addr)?);
        }
        Ok(Self {
            http: builder.build()?,
            token: creds.access_token.clone(),
        })
    }

    /// Opens the live filter stream tracking mentions of `track`.
    pub async fn mention_stream(
        &self,
        track: &str,
    ) -> Result<impl Stream<Item = Result<IncomingReply, PlatformError>>, PlatformError> {
        let response = self
            .http
            .post(STREAM_URL)
            .bearer_auth(&self.token)
            .form(&[("track", track)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PlatformError::Status(response.status()));
        }
        Ok(ndjson_replies(response.bytes_stream()))
    }

    async fn show_status(&self, id: &str) -> Result<Status, PlatformError> {
        let response = self
            .http
            .get(format!("{}/statuses/show.json", API_BASE))
            .query(&[("id", id), ("tweet_mode", "extended")])
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PlatformError::Status(response.status()));
        }
        Ok(response.json::<Status>().await?)
    }

    async fn update_status(
        &self,
        text: &str,
        in_reply_to: &str,
        media_id: Option<&str>,
    ) -> Result<(), PlatformError> {
        let mut form = vec![("status", text), ("in_reply_to_status_id", in_reply_to)];
        if let Some(media_id) = media_id {
            form.push(("media_ids", media_id));
        }
        let response = self
            .http
            .post(format!("{}/statuses/update.json", API_BASE))
            .bearer_auth(&self.token)
            .form(&form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PlatformError::Status(response.status()));
        }
        Ok(())
    }

    async fn upload_media(&self, image: Vec<u8>) -> Result<String, PlatformError> {
        // TODO: rasterize the board to PNG before upload if the media
        // endpoint rejects vector formats.
        let part = multipart::Part::bytes(image)
            .file_name("board.svg")
            .mime_str("image/svg+xml")?;
        let response = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(&self.token)
            .multipart(multipart::Form::new().part("media", part))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PlatformError::Status(response.status()));
        }
        Ok(response.json::<MediaUpload>().await?.media_id_string)
    }
}

#[async_trait::async_trait]
impl Platform for TwitterClient {
    async fn fetch_parent(&self, reply: &IncomingReply) -> Option<Message> {
        let id = reply.in_reply_to.as_deref()?;
        match self.show_status(id).await {
            Ok(status) => Some(status.into_message()),
            Err(e) => {
                warn!("Could not fetch parent {}: {}", id, e);
                None
            }
        }
    }

    async fn post_text(&self, text: &str, in_reply_to: &str) -> Result<(), PlatformError> {
        self.update_status(text, in_reply_to, None).await
    }

    async fn post_with_image(
        &self,
        text: &str,
        image: Vec<u8>,
        in_reply_to: &str,
    ) -> Result<(), PlatformError> {
        let media_id = self.upload_media(image).await?;
        self.update_status(text, in_reply_to, Some(&media_id)).await
    }
}

/// Splits a chunked byte stream into lines and parses each non-empty line
/// as a status. Blank lines are the platform's keep-alives.
fn ndjson_replies<S>(source: S) -> impl Stream<Item = Result<IncomingReply, PlatformError>>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    futures::stream::unfold(
        (Box::pin(source), Vec::new()),
        |(mut source, mut buffer)| async move {
            loop {
                if let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line);
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let parsed = serde_json::from_str::<Status>(trimmed)
                        .map(IncomingReply::from)
                        .map_err(PlatformError::from);
                    return Some((parsed, (source, buffer)));
                }
                match source.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => return Some((Err(PlatformError::Http(e)), (source, buffer))),
                    None if buffer.iter().all(u8::is_ascii_whitespace) => return None,
                    // flush a trailing line that arrived without a newline
                    None => buffer.push(b'\n'),
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, reqwest::Error>> {
        futures::stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    const STATUS_JSON: &str = r#"{"id_str":"42","text":"@chessbot2020 e4","user":{"screen_name":"bob"},"in_reply_to_status_id_str":"41","entities":{"user_mentions":[{"screen_name":"chessbot2020"}]}}"#;

    #[tokio::test]
    async fn parses_replies_split_across_chunks() {
        let (head, tail) = STATUS_JSON.split_at(20);
        let stream = ndjson_replies(chunks(&[head, tail, "\n"]));
        let replies: Vec<_> = stream.collect().await;
        assert_eq!(replies.len(), 1);
        let reply = replies[0].as_ref().unwrap();
        assert_eq!(reply.id, "42");
        assert_eq!(reply.author, "bob");
        assert_eq!(reply.in_reply_to.as_deref(), Some("41"));
        assert!(reply.mentions.contains("chessbot2020"));
    }

    #[tokio::test]
    async fn skips_keep_alive_lines() {
        let body = format!("\r\n\r\n{}\n\r\n", STATUS_JSON);
        let stream = ndjson_replies(chunks(&[body.as_str()]));
        let replies: Vec<_> = stream.collect().await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].is_ok());
    }

    #[tokio::test]
    async fn flushes_a_trailing_unterminated_line() {
        let stream = ndjson_replies(chunks(&[STATUS_JSON]));
        let replies: Vec<_> = stream.collect().await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].is_ok());
    }

    #[tokio::test]
    async fn malformed_lines_surface_as_errors() {
        let body = format!("not json\n{}\n", STATUS_JSON);
        let stream = ndjson_replies(chunks(&[body.as_str()]));
        let replies: Vec<_> = stream.collect().await;
        assert_eq!(replies.len(), 2);
        assert!(matches!(replies[0], Err(PlatformError::Payload(_))));
        assert!(replies[1].is_ok());
    }

    #[test]
    fn extended_statuses_use_full_text() {
        let json = r#"{"id_str":"7","full_text":"the whole text","user":{"screen_name":"alice"}}"#;
        let status: Status = serde_json::from_str(json).unwrap();
        assert_eq!(status.into_message().text, "the whole text");
    }
}
