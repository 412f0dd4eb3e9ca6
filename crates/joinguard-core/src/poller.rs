//! Long-poll loop that fetches pending join requests and approves them.
//!
//! Cursor semantics: the poller tracks the highest update id it has seen and
//! asks the API for strictly newer updates on the next pass. A failed fetch
//! leaves the cursor untouched, so the same batch is re-requested on the next
//! iteration. Approval failures are logged and skipped; they never stop the
//! rest of the batch or the loop.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{domain::UpdateId, ports::JoinRequestApi};

pub struct JoinRequestPoller {
    api: Arc<dyn JoinRequestApi>,
    poll_interval: Duration,
    cursor: UpdateId,
}

impl JoinRequestPoller {
    pub fn new(api: Arc<dyn JoinRequestApi>, poll_interval: Duration) -> Self {
        Self::with_cursor(api, poll_interval, UpdateId(0))
    }

    /// Start from a known cursor. Mostly useful in tests.
    pub fn with_cursor(
        api: Arc<dyn JoinRequestApi>,
        poll_interval: Duration,
        cursor: UpdateId,
    ) -> Self {
        Self {
            api,
            poll_interval,
            cursor,
        }
    }

    /// Highest update id processed so far (0 = nothing yet).
    pub fn cursor(&self) -> UpdateId {
        self.cursor
    }

    /// One fetch-and-approve pass.
    ///
    /// Returns the number of approvals issued; 0 for an empty batch or a
    /// failed fetch. Port errors are logged here rather than propagated so
    /// one bad pass never takes the loop down.
    pub async fn poll_once(&mut self) -> usize {
        let updates = match self.api.fetch_updates(self.cursor.next()).await {
            Ok(v) => v,
            Err(e) => {
                eprintln!("[POLL] fetch failed: {e}");
                return 0;
            }
        };

        let mut approved = 0usize;
        for update in updates {
            self.cursor = self.cursor.max(update.id);

            let Some(req) = update.join_request else {
                continue;
            };

            println!(
                "[POLL] join request from {} in chat {}",
                req.requester_label(),
                req.chat_id.0
            );
            match self.api.approve_join_request(req.chat_id, req.user_id).await {
                Ok(()) => {
                    println!("[POLL] approved {}", req.requester_label());
                    approved += 1;
                }
                Err(e) => {
                    // No retry: the request stays pending on the Telegram side
                    // until the API re-surfaces it.
                    eprintln!("[POLL] approval failed for user {}: {e}", req.user_id.0);
                }
            }
        }

        approved
    }

    /// Poll until `cancel` fires. The fixed delay between passes bounds the
    /// request rate against Telegram; it does not back off on error.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            self.poll_once().await;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(self.poll_interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, JoinRequest, Update, UserId},
        Error, Result,
    };
    use std::{
        collections::VecDeque,
        sync::Mutex,
    };

    #[derive(Default)]
    struct FakeApi {
        batches: Mutex<VecDeque<Result<Vec<Update>>>>,
        offsets: Mutex<Vec<UpdateId>>,
        approvals: Mutex<Vec<(ChatId, UserId)>>,
        fail_approvals_for: Vec<UserId>,
        cancel_when_exhausted: Option<CancellationToken>,
    }

    impl FakeApi {
        fn scripted(batches: Vec<Result<Vec<Update>>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                ..Self::default()
            }
        }

        fn offsets(&self) -> Vec<UpdateId> {
            self.offsets.lock().unwrap().clone()
        }

        fn approvals(&self) -> Vec<(ChatId, UserId)> {
            self.approvals.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl JoinRequestApi for FakeApi {
        async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<Update>> {
            self.offsets.lock().unwrap().push(offset);
            match self.batches.lock().unwrap().pop_front() {
                Some(batch) => batch,
                None => {
                    if let Some(cancel) = &self.cancel_when_exhausted {
                        cancel.cancel();
                    }
                    Ok(Vec::new())
                }
            }
        }

        async fn approve_join_request(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
            if self.fail_approvals_for.contains(&user_id) {
                return Err(Error::Api("USER_ALREADY_PARTICIPANT".to_string()));
            }
            self.approvals.lock().unwrap().push((chat_id, user_id));
            Ok(())
        }
    }

    fn upd(id: i32, join_request: Option<(i64, i64)>) -> Update {
        Update {
            id: UpdateId(id),
            join_request: join_request.map(|(chat, user)| JoinRequest {
                chat_id: ChatId(chat),
                user_id: UserId(user),
                username: None,
            }),
        }
    }

    #[tokio::test]
    async fn batch_advances_cursor_and_approves_in_order() {
        let api = Arc::new(FakeApi::scripted(vec![Ok(vec![
            upd(5, Some((99, 10))),
            upd(6, None),
            upd(7, Some((99, 11))),
        ])]));
        let mut poller =
            JoinRequestPoller::new(api.clone(), Duration::from_millis(1));

        let approved = poller.poll_once().await;

        assert_eq!(approved, 2);
        assert_eq!(poller.cursor(), UpdateId(7));
        assert_eq!(api.offsets(), vec![UpdateId(1)]);
        assert_eq!(
            api.approvals(),
            vec![(ChatId(99), UserId(10)), (ChatId(99), UserId(11))]
        );
    }

    #[tokio::test]
    async fn empty_batch_leaves_cursor_unchanged() {
        let api = Arc::new(FakeApi::scripted(vec![Ok(vec![])]));
        let mut poller = JoinRequestPoller::with_cursor(
            api.clone(),
            Duration::from_millis(1),
            UpdateId(41),
        );

        let approved = poller.poll_once().await;

        assert_eq!(approved, 0);
        assert_eq!(poller.cursor(), UpdateId(41));
        assert_eq!(api.offsets(), vec![UpdateId(42)]);
        assert!(api.approvals().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_cursor_and_reuses_offset() {
        let api = Arc::new(FakeApi::scripted(vec![
            Err(Error::Transport("connection reset".to_string())),
            Ok(vec![upd(3, Some((50, 20)))]),
        ]));
        let mut poller =
            JoinRequestPoller::new(api.clone(), Duration::from_millis(1));

        poller.poll_once().await;
        assert_eq!(poller.cursor(), UpdateId(0));

        poller.poll_once().await;
        assert_eq!(poller.cursor(), UpdateId(3));

        // Both passes requested the same offset.
        assert_eq!(api.offsets(), vec![UpdateId(1), UpdateId(1)]);
    }

    #[tokio::test]
    async fn failed_approval_does_not_stop_the_batch() {
        let api = Arc::new(FakeApi {
            batches: Mutex::new(
                vec![Ok(vec![upd(5, Some((99, 10))), upd(6, Some((99, 11)))])].into(),
            ),
            fail_approvals_for: vec![UserId(10)],
            ..FakeApi::default()
        });
        let mut poller =
            JoinRequestPoller::new(api.clone(), Duration::from_millis(1));

        let approved = poller.poll_once().await;

        assert_eq!(approved, 1);
        assert_eq!(api.approvals(), vec![(ChatId(99), UserId(11))]);
        // Cursor advancement is independent of approval success.
        assert_eq!(poller.cursor(), UpdateId(6));
    }

    #[tokio::test]
    async fn updates_without_payload_issue_no_approvals() {
        let api = Arc::new(FakeApi::scripted(vec![Ok(vec![
            upd(1, None),
            upd(2, None),
        ])]));
        let mut poller =
            JoinRequestPoller::new(api.clone(), Duration::from_millis(1));

        let approved = poller.poll_once().await;

        assert_eq!(approved, 0);
        assert!(api.approvals().is_empty());
        assert_eq!(poller.cursor(), UpdateId(2));
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let cancel = CancellationToken::new();
        let api = Arc::new(FakeApi {
            batches: Mutex::new(vec![Ok(vec![upd(9, Some((99, 12)))])].into()),
            cancel_when_exhausted: Some(cancel.clone()),
            ..FakeApi::default()
        });
        let poller = JoinRequestPoller::new(api.clone(), Duration::ZERO);

        tokio::time::timeout(Duration::from_secs(5), poller.run(cancel))
            .await
            .expect("run did not stop after cancellation");

        assert_eq!(api.approvals(), vec![(ChatId(99), UserId(12))]);
    }
}
