/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram update id (numeric, increasing across a bot's update stream).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpdateId(pub i32);

impl UpdateId {
    /// The exclusive-lower-bound offset for the fetch following this id.
    pub fn next(self) -> UpdateId {
        UpdateId(self.0 + 1)
    }
}

/// A pending request by a user to join a chat/channel, awaiting approval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinRequest {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
}

impl JoinRequest {
    /// Label for log lines: the username when Telegram has one, otherwise the
    /// numeric user id.
    pub fn requester_label(&self) -> String {
        match &self.username {
            Some(u) => format!("@{u}"),
            None => format!("user id {}", self.user_id.0),
        }
    }
}

/// One long-poll update. Only join requests are of interest; anything else
/// the API hands back still advances the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub id: UpdateId,
    pub join_request: Option<JoinRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requester_label_falls_back_to_user_id() {
        let named = JoinRequest {
            chat_id: ChatId(-100),
            user_id: UserId(7),
            username: Some("alice".to_string()),
        };
        assert_eq!(named.requester_label(), "@alice");

        let anonymous = JoinRequest {
            chat_id: ChatId(-100),
            user_id: UserId(7),
            username: None,
        };
        assert_eq!(anonymous.requester_label(), "user id 7");
    }
}
