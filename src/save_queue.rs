//! An explicit write queue coalescing bursts of edits into single saves
//!
//! Every mutation enqueues a snapshot of the document; the queue waits for the burst to
//! settle (the debounce delay) and then performs one save with the latest snapshot.
//! A newer snapshot supersedes an unfired one, so drag-painting twenty days produces one
//! write, not twenty. Unlike a fire-and-forget debounce, the queue is observable:
//! [`SaveQueue::flush`] forces the pending write and reports its outcome.

use std::error::Error;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout_at, Instant};

use crate::config;
use crate::document::YearDocument;
use crate::store::YearStore;

enum Intent {
    Save(YearDocument),
    Flush(oneshot::Sender<Result<(), String>>),
}

/// Handle to the single save worker of a store. Cloning is cheap; all clones feed the
/// same queue.
#[derive(Clone)]
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<Intent>,
}

impl SaveQueue {
    /// Spawn the worker task with the configured debounce delay.
    /// Must be called from within a Tokio runtime.
    pub fn spawn(store: YearStore) -> Self {
        let delay = *config::SAVE_DEBOUNCE.lock().unwrap();
        Self::spawn_with_delay(store, delay)
    }

    /// Spawn the worker task with a custom debounce delay
    pub fn spawn_with_delay(store: YearStore, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(store, rx, delay));
        Self { tx }
    }

    /// Enqueue this state of the document, (re)starting the debounce window.
    /// Only the newest enqueued state will actually be written.
    pub fn save(&self, doc: &YearDocument) {
        let _ = self.tx.send(Intent::Save(doc.clone()));
    }

    /// Write the pending snapshot now (if any) and report the outcome.
    /// When nothing is pending this is a no-op that returns `Ok`.
    pub async fn flush(&self) -> Result<(), Box<dyn Error>> {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Intent::Flush(ack)).is_err() {
            return Err("The save worker is gone".into());
        }
        match done.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err("The save worker dropped the flush request".into()),
        }
    }
}

async fn run_worker(store: YearStore, mut rx: mpsc::UnboundedReceiver<Intent>, delay: Duration) {
    let mut pending: Option<YearDocument> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let received = match deadline {
            Some(at) => match timeout_at(at, rx.recv()).await {
                Ok(intent) => intent,
                Err(_) => {
                    // the burst has settled
                    if let Some(doc) = pending.take() {
                        if let Err(err) = store.save(&doc).await {
                            log::error!("Deferred save failed: {}", err);
                        }
                    }
                    deadline = None;
                    continue;
                }
            },
            None => rx.recv().await,
        };

        match received {
            Some(Intent::Save(doc)) => {
                pending = Some(doc);
                deadline = Some(Instant::now() + delay);
            }
            Some(Intent::Flush(ack)) => {
                deadline = None;
                let outcome = match pending.take() {
                    Some(doc) => store.save(&doc).await.map_err(|err| err.to_string()),
                    None => Ok(()),
                };
                let _ = ack.send(outcome);
            }
            None => {
                // every handle is dropped; write whatever is still pending
                if let Some(doc) = pending.take() {
                    if let Err(err) = store.save(&doc).await {
                        log::error!("Final save failed: {}", err);
                    }
                }
                return;
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use crate::day::DayKey;
    use crate::vault::{MemoryVault, memory::MockBehaviour};

    fn setup(delay: Duration) -> (Arc<MemoryVault>, YearStore, SaveQueue) {
        let vault = Arc::new(MemoryVault::new());
        let store = YearStore::new(vault.clone(), Path::new(".config/year-planner"));
        let queue = SaveQueue::spawn_with_delay(store.clone(), delay);
        (vault, store, queue)
    }

    #[tokio::test]
    async fn a_burst_coalesces_into_one_write() {
        // a long delay, so the timer can never fire during the test
        let (vault, store, queue) = setup(Duration::from_secs(3600));

        let mut doc = YearDocument::new(2024);
        for day in 1..=20 {
            doc.set_day_color(DayKey::new(2024, 1, day).unwrap(), Some("#FFB3BA".into()));
            queue.save(&doc);
        }
        queue.flush().await.unwrap();

        // one JSON write plus one mirror write
        assert_eq!(vault.write_count(), 2);
        assert_eq!(store.load(2024).await, doc);
    }

    #[tokio::test]
    async fn the_timer_fires_on_its_own() {
        let (_vault, store, queue) = setup(Duration::from_millis(20));

        let mut doc = YearDocument::new(2024);
        doc.set_day_note(DayKey::new(2024, 2, 1).unwrap(), Some("note".into()));
        queue.save(&doc);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.load(2024).await, doc);
    }

    #[tokio::test]
    async fn flush_without_pending_is_a_no_op() {
        let (vault, _store, queue) = setup(Duration::from_secs(3600));
        queue.flush().await.unwrap();
        assert_eq!(vault.write_count(), 0);
    }

    #[tokio::test]
    async fn flush_surfaces_write_failures() {
        let (vault, _store, queue) = setup(Duration::from_secs(3600));
        vault.set_behaviour(MockBehaviour::fail_now(1));

        queue.save(&YearDocument::new(2024));
        assert!(queue.flush().await.is_err());
    }
}
