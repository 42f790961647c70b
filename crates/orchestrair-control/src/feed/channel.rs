use super::TrackingSource;
use crate::error::Result;
use async_trait::async_trait;
use orchestrair_core::HandFrame;
use tokio::sync::mpsc;

/// In-process source fed through a bounded channel.
///
/// The feed closes once every sender is dropped.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<HandFrame>,
}

impl ChannelSource {
    /// Create a source and the sender that feeds it
    pub fn new(capacity: usize) -> (mpsc::Sender<HandFrame>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }

    /// Wrap an existing receiver
    pub fn from_receiver(rx: mpsc::Receiver<HandFrame>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl TrackingSource for ChannelSource {
    fn describe(&self) -> String {
        "in-process channel".to_string()
    }

    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<HandFrame>> {
        Ok(self.rx.recv().await)
    }
}
