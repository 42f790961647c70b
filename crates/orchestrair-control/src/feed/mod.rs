//! Latest-frame subscription over a tracking source
//!
//! A driver task pulls frames from a [`TrackingSource`] and publishes them on
//! a `watch` channel. Consumers that fall behind only ever see the newest
//! frame. Lost connections are retried according to a [`ReconnectPolicy`]
//! and every status change is published alongside the frames.

mod channel;
mod http_poll;

pub use channel::ChannelSource;
pub use http_poll::HttpPollSource;

use crate::error::Result;
use async_trait::async_trait;
use orchestrair_core::HandFrame;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Something that delivers hand frames
#[async_trait]
pub trait TrackingSource: Send + 'static {
    /// Short description for logs
    fn describe(&self) -> String;

    /// (Re)establish the connection
    async fn connect(&mut self) -> Result<()>;

    /// Wait for the next frame. `Ok(None)` ends the feed for good.
    async fn next_frame(&mut self) -> Result<Option<HandFrame>>;
}

/// Connection state of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Connecting or reconnecting
    Connecting,
    /// Frames are flowing
    Connected,
    /// Connection lost; a retry is pending
    Disconnected {
        /// Why the connection was lost
        reason: String,
    },
    /// The source ended or retries are exhausted. No more frames will arrive.
    Closed,
}

impl FeedStatus {
    /// True while frames are flowing
    pub fn is_connected(&self) -> bool {
        matches!(self, FeedStatus::Connected)
    }
}

/// What a subscriber observes
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Number of frames received so far; skipped values mean coalesced frames
    pub sequence: u64,
    /// Current connection state
    pub status: FeedStatus,
    /// Latest frame, `None` until the first frame and after a disconnect
    pub frame: Option<Arc<HandFrame>>,
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            sequence: 0,
            status: FeedStatus::Connecting,
            frame: None,
        }
    }
}

/// Retry timing after a lost or failed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for the doubling delay
    pub max_backoff: Duration,
    /// Give up after this many consecutive failures; `None` retries forever
    pub max_retries: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            max_retries: None,
        }
    }
}

impl ReconnectPolicy {
    /// Never retry
    pub fn no_retry() -> Self {
        Self {
            max_retries: Some(0),
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based), `None` to give up
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if self.max_retries.is_some_and(|max| attempt >= max) {
            return None;
        }
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        Some(
            self.initial_backoff
                .saturating_mul(factor)
                .min(self.max_backoff),
        )
    }
}

/// Handle to a running feed. Dropping it stops the driver task and releases
/// the source.
#[derive(Debug)]
pub struct FeedSubscription {
    rx: watch::Receiver<FeedSnapshot>,
    task: JoinHandle<()>,
}

impl FeedSubscription {
    /// Wait for the next change and return the newest snapshot.
    ///
    /// Returns `None` once the feed is closed and the final snapshot was seen.
    pub async fn next(&mut self) -> Option<FeedSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Newest snapshot without waiting
    pub fn latest(&self) -> FeedSnapshot {
        self.rx.borrow().clone()
    }

    /// Current connection state
    pub fn status(&self) -> FeedStatus {
        self.rx.borrow().status.clone()
    }

    /// Stop the feed
    pub fn close(self) {}
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start driving `source` on the current tokio runtime
pub fn subscribe<S: TrackingSource>(source: S, policy: ReconnectPolicy) -> FeedSubscription {
    let (tx, rx) = watch::channel(FeedSnapshot::default());
    let task = tokio::spawn(drive(source, policy, tx));
    FeedSubscription { rx, task }
}

fn publish_status(tx: &watch::Sender<FeedSnapshot>, status: FeedStatus) {
    tx.send_modify(|snapshot| {
        if !status.is_connected() {
            snapshot.frame = None;
        }
        snapshot.status = status;
    });
}

async fn drive<S: TrackingSource>(
    mut source: S,
    policy: ReconnectPolicy,
    tx: watch::Sender<FeedSnapshot>,
) {
    let name = source.describe();
    let mut failures: u32 = 0;
    let mut sequence: u64 = 0;

    loop {
        if failures > 0 {
            publish_status(&tx, FeedStatus::Connecting);
        }

        let reason = match source.connect().await {
            Ok(()) => {
                info!("Tracking feed connected: {}", name);
                failures = 0;
                publish_status(&tx, FeedStatus::Connected);

                loop {
                    match source.next_frame().await {
                        Ok(Some(frame)) => {
                            sequence += 1;
                            let frame = Arc::new(frame);
                            tx.send_modify(|snapshot| {
                                snapshot.sequence = sequence;
                                snapshot.frame = Some(frame);
                            });
                        }
                        Ok(None) => {
                            info!("Tracking feed ended: {}", name);
                            publish_status(&tx, FeedStatus::Closed);
                            return;
                        }
                        Err(e) => break e.to_string(),
                    }
                }
            }
            Err(e) => e.to_string(),
        };

        if tx.is_closed() {
            debug!("No subscribers left for {}", name);
            return;
        }

        warn!("Tracking feed {} lost: {}", name, reason);
        publish_status(&tx, FeedStatus::Disconnected { reason });

        let Some(delay) = policy.delay_for(failures) else {
            warn!("Giving up on tracking feed {} after {} retries", name, failures);
            publish_status(&tx, FeedStatus::Closed);
            return;
        };
        failures += 1;
        debug!("Reconnecting to {} in {:?}", name, delay);
        tokio::time::sleep(delay).await;
    }
}
