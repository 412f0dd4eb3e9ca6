//! Telegram adapter (teloxide).
//!
//! This crate implements the `joinguard-core` JoinRequestApi port over the
//! Telegram Bot API: long-poll getUpdates filtered to chat join requests,
//! and approveChatJoinRequest.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    payloads::GetUpdatesSetters,
    requests::Requester,
    types::{AllowedUpdate, UpdateKind},
    Bot, RequestError,
};

use joinguard_core::{
    domain::{ChatId, JoinRequest, Update, UpdateId, UserId},
    errors::Error,
    ports::JoinRequestApi,
    Result,
};

#[derive(Clone)]
pub struct TelegramJoinRequestApi {
    bot: Bot,
    long_poll_timeout: Duration,
}

impl TelegramJoinRequestApi {
    pub fn new(bot: Bot, long_poll_timeout: Duration) -> Self {
        Self {
            bot,
            long_poll_timeout,
        }
    }

    pub fn from_token(token: &str, long_poll_timeout: Duration) -> Self {
        Self::new(Bot::new(token), long_poll_timeout)
    }

    /// Best-effort bot identity for startup logging.
    pub async fn bot_username(&self) -> Result<String> {
        let me = self.bot.get_me().await.map_err(map_err)?;
        Ok(me.username().to_string())
    }
}

fn map_err(e: RequestError) -> Error {
    match e {
        // Telegram answered with `ok: false`; keep its description.
        RequestError::Api(api) => Error::Api(api.to_string()),
        other => Error::Transport(other.to_string()),
    }
}

fn convert_update(update: teloxide::types::Update) -> Update {
    let join_request = match update.kind {
        UpdateKind::ChatJoinRequest(req) => Some(JoinRequest {
            chat_id: ChatId(req.chat.id.0),
            user_id: UserId(req.from.id.0 as i64),
            username: req.from.username,
        }),
        _ => None,
    };

    Update {
        id: UpdateId(update.id),
        join_request,
    }
}

#[async_trait]
impl JoinRequestApi for TelegramJoinRequestApi {
    async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<Update>> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset.0)
            .timeout(self.long_poll_timeout.as_secs() as u32)
            .allowed_updates([AllowedUpdate::ChatJoinRequest])
            .await
            .map_err(map_err)?;

        Ok(updates.into_iter().map(convert_update).collect())
    }

    async fn approve_join_request(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
        self.bot
            .approve_chat_join_request(
                teloxide::types::ChatId(chat_id.0),
                teloxide::types::UserId(user_id.0 as u64),
            )
            .await
            .map_err(map_err)?;
        Ok(())
    }
}
