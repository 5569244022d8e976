//! Long polling loop and update dispatch.
//!
//! [`TelegramSync::sync`]:
//! 1. Skips the updates already pending at startup
//! 2. Long polls `getUpdates` and hands every relevant update to the callback, one at a time
//! 3. On polling failure, logs, waits the retry delay and polls again, forever

use std::{future::Future, time::Duration};

use log::{debug, error, info};
use mockall::automock;
use teloxide::types::Update;
use tokio::time::sleep;

use crate::telegram::IncomingEvent;

/// Source of Telegram updates.
#[automock]
pub trait UpdateSource {
    /// Long polls `getUpdates` from `offset`, waiting at most `timeout` seconds.
    async fn get_updates(&self, offset: i32, timeout: u32) -> Result<Vec<Update>, anyhow::Error>;
}

/// Drives the inbound side of the bot.
pub struct TelegramSync<S: UpdateSource> {
    source: S,
    /// Long polling timeout in seconds
    polling_timeout: u32,
    /// Pause after a polling failure
    retry_delay: Duration,
}

impl<S: UpdateSource> TelegramSync<S> {
    /// Creates a new TelegramSync instance.
    ///
    /// This does not start polling; call [`TelegramSync::sync`] to begin.
    pub fn new(source: S, polling_timeout: u32, retry_delay: Duration) -> Self {
        TelegramSync {
            source,
            polling_timeout,
            retry_delay,
        }
    }

    /// Polls Telegram forever, awaiting `on_event` for each incoming event.
    ///
    /// Events are processed sequentially in the order Telegram delivers them.
    pub async fn sync<F, Fut>(&self, on_event: F)
    where
        F: Fn(IncomingEvent) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut offset = self.skip_pending().await;
        info!("polling telegram updates from offset {}", offset);

        loop {
            offset = self.poll_once(offset, &on_event).await;
        }
    }

    /// Runs one `getUpdates` round and returns the offset of the next one.
    ///
    /// A failed round sleeps the retry delay and keeps the offset.
    async fn poll_once<F, Fut>(&self, offset: i32, on_event: &F) -> i32
    where
        F: Fn(IncomingEvent) -> Fut,
        Fut: Future<Output = ()>,
    {
        let updates = match self.source.get_updates(offset, self.polling_timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                error!(
                    "polling crashed, retrying in {}s: {}",
                    self.retry_delay.as_secs(),
                    e
                );
                sleep(self.retry_delay).await;
                return offset;
            }
        };

        let mut offset = offset;
        for update in updates {
            offset = next_offset(offset, update.id.as_offset());
            debug!("received update {:?}", update.id);

            if let Some(event) = IncomingEvent::from_update(update) {
                on_event(event).await;
            }
        }

        offset
    }

    /// Returns the offset right after the last pending update.
    ///
    /// `getUpdates` with offset `-1` returns only the most recent update.
    /// The request is retried until it succeeds, so a transient failure at
    /// startup never replays the backlog.
    async fn skip_pending(&self) -> i32 {
        loop {
            match self.source.get_updates(-1, 0).await {
                Ok(updates) => {
                    return match updates.last() {
                        Some(last) => {
                            info!("skipping pending updates up to {:?}", last.id);
                            last.id.as_offset()
                        }
                        None => 0,
                    };
                }
                Err(e) => {
                    error!(
                        "unable to skip pending updates, retrying in {}s: {}",
                        self.retry_delay.as_secs(),
                        e
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }
    }
}

/// Offsets only move forward, whatever order updates arrive in.
fn next_offset(current: i32, candidate: i32) -> i32 {
    current.max(candidate)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Instant,
    };

    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;

    const RETRY_DELAY: Duration = Duration::from_millis(20);

    fn create_update(update_id: i32, text: &str) -> Update {
        serde_json::from_str(&json!({
            "update_id": update_id,
            "message": {
                "message_id": update_id,
                "date": 1700000000,
                "chat": {"id": 42, "type": "private", "first_name": "Alice"},
                "from": {"id": 7, "is_bot": false, "first_name": "Alice"},
                "text": text
            }
        })
        .to_string())
        .unwrap()
    }

    fn create_edited_update(update_id: i32) -> Update {
        serde_json::from_str(&json!({
            "update_id": update_id,
            "edited_message": {
                "message_id": 1,
                "date": 1700000000,
                "edit_date": 1700000100,
                "chat": {"id": 42, "type": "private", "first_name": "Alice"},
                "from": {"id": 7, "is_bot": false, "first_name": "Alice"},
                "text": "/lag 1234567"
            }
        })
        .to_string())
        .unwrap()
    }

    /// Callback recording the text of every message event.
    fn recorder(
        texts: Arc<Mutex<Vec<String>>>,
    ) -> impl Fn(IncomingEvent) -> std::future::Ready<()> {
        move |event| {
            if let IncomingEvent::Message(message) = event {
                texts.lock().unwrap().push(message.text);
            }
            std::future::ready(())
        }
    }

    #[test]
    fn test_next_offset_moves_forward() {
        assert_eq!(next_offset(0, 11), 11);
        assert_eq!(next_offset(11, 12), 12);
    }

    #[test]
    fn test_next_offset_never_goes_back() {
        assert_eq!(next_offset(20, 12), 20);
    }

    #[tokio::test]
    async fn test_skip_pending_returns_offset_after_last_update() {
        let mut source = MockUpdateSource::new();
        source
            .expect_get_updates()
            .with(eq(-1), eq(0))
            .times(1)
            .returning(|_, _| Ok(vec![create_update(41, "/start")]));

        let sync = TelegramSync::new(source, 20, RETRY_DELAY);
        assert_eq!(sync.skip_pending().await, 42);
    }

    #[tokio::test]
    async fn test_skip_pending_without_updates_starts_at_zero() {
        let mut source = MockUpdateSource::new();
        source
            .expect_get_updates()
            .with(eq(-1), eq(0))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let sync = TelegramSync::new(source, 20, RETRY_DELAY);
        assert_eq!(sync.skip_pending().await, 0);
    }

    #[tokio::test]
    async fn test_skip_pending_retries_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut source = MockUpdateSource::new();
        source
            .expect_get_updates()
            .with(eq(-1), eq(0))
            .times(2)
            .returning(move |_, _| match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Err(anyhow::anyhow!("connection reset")),
                _ => Ok(vec![create_update(41, "/start")]),
            });

        let sync = TelegramSync::new(source, 20, RETRY_DELAY);
        let start = Instant::now();

        assert_eq!(sync.skip_pending().await, 42);
        assert!(start.elapsed() >= RETRY_DELAY);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_poll_failure_waits_and_keeps_offset() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut source = MockUpdateSource::new();
        source
            .expect_get_updates()
            .with(eq(42), eq(20))
            .times(2)
            .returning(move |_, _| match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Err(anyhow::anyhow!("bad gateway")),
                _ => Ok(vec![create_update(42, "/5g 1"), create_update(43, "/6g 2")]),
            });

        let sync = TelegramSync::new(source, 20, RETRY_DELAY);
        let texts = Arc::new(Mutex::new(Vec::new()));
        let on_event = recorder(Arc::clone(&texts));

        let start = Instant::now();
        let offset = sync.poll_once(42, &on_event).await;
        assert_eq!(offset, 42);
        assert!(start.elapsed() >= RETRY_DELAY);
        assert!(texts.lock().unwrap().is_empty());

        let offset = sync.poll_once(offset, &on_event).await;
        assert_eq!(offset, 44);
        assert_eq!(*texts.lock().unwrap(), vec!["/5g 1", "/6g 2"]);
    }

    #[tokio::test]
    async fn test_ignored_updates_still_move_offset() {
        let mut source = MockUpdateSource::new();
        source
            .expect_get_updates()
            .with(eq(10), eq(20))
            .times(1)
            .returning(|_, _| Ok(vec![create_edited_update(10), create_edited_update(11)]));

        let sync = TelegramSync::new(source, 20, RETRY_DELAY);
        let texts = Arc::new(Mutex::new(Vec::new()));

        assert_eq!(sync.poll_once(10, &recorder(Arc::clone(&texts))).await, 12);
        assert!(texts.lock().unwrap().is_empty());
    }
}
