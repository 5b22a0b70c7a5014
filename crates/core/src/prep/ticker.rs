//! Periodic at-risk review tied to a view's lifetime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::store::PrepItemStore;

/// Runs [`PrepItemStore::review_at_risk`] every interval until cancelled.
///
/// The first review runs immediately. Dropping the ticker aborts the task.
pub struct ReviewTicker {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ReviewTicker {
    pub fn start(store: Arc<PrepItemStore>, interval: Duration) -> Self {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            debug!(interval_ms = interval.as_millis() as u64, "Review ticker started");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut cancel_rx => {
                        debug!("Review ticker received cancel signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        store.review_at_risk().await;
                    }
                }
            }
            info!("Review ticker stopped");
        });

        Self {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stop the ticker and wait for the task to finish.
    pub async fn cancel(mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ReviewTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
