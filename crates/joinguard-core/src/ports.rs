use async_trait::async_trait;

use crate::{
    domain::{ChatId, Update, UpdateId, UserId},
    Result,
};

/// Hexagonal port for the two bot-API operations the gatekeeper needs.
///
/// Telegram is the first implementation; tests drive the poller with a
/// scripted fake behind the same trait.
#[async_trait]
pub trait JoinRequestApi: Send + Sync {
    /// Long-poll for updates with id >= `offset`, filtered to join requests,
    /// returned in ascending id order. Blocks up to the adapter's configured
    /// long-poll timeout when nothing is pending.
    async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<Update>>;

    /// Approve one pending join request. Both ids are forwarded verbatim;
    /// validity is delegated to the remote API.
    async fn approve_join_request(&self, chat_id: ChatId, user_id: UserId) -> Result<()>;
}
