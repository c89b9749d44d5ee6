//! Platform-facing data model and the posting/fetching seam. The concrete
//! client lives in `twitter`; tests drive the state machine through an
//! in-memory implementation of this trait.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::snapshot::PlayerHandle;

/// A message already published on the platform.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub author: PlayerHandle,
    pub text: String,
}

/// One inbound mention of the bot. Consumed once per processing cycle and
/// never stored.
#[derive(Clone, Debug)]
pub struct IncomingReply {
    pub id: String,
    pub author: PlayerHandle,
    pub text: String,
    pub mentions: HashSet<PlayerHandle>,
    pub in_reply_to: Option<String>,
}

#[async_trait]
pub trait Platform {
    /// The message this reply answers, if any. Fetch failures are treated
    /// as absence; the platform is re-queried fresh for every reply.
    async fn fetch_parent(&self, reply: &IncomingReply) -> Option<Message>;

    async fn post_text(&self, text: &str, in_reply_to: &str) -> Result<(), PlatformError>;

    /// Posts a status with an attached board image. The image buffer is
    /// moved in and released whether or not the post succeeds.
    async fn post_with_image(
        &self,
        text: &str,
        image: Vec<u8>,
        in_reply_to: &str,
    ) -> Result<(), PlatformError>;
}
