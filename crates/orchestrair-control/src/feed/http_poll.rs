use super::TrackingSource;
use crate::backend::BackendClient;
use crate::error::Result;
use async_trait::async_trait;
use orchestrair_core::HandFrame;
use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Polls `GET /hand-data` at a fixed interval
#[derive(Debug)]
pub struct HttpPollSource {
    client: BackendClient,
    interval: Duration,
    ticker: Option<Interval>,
    pending: Option<HandFrame>,
}

impl HttpPollSource {
    /// Poll `client` every `interval`
    pub fn new(client: BackendClient, interval: Duration) -> Self {
        Self {
            client,
            interval: interval.max(Duration::from_millis(1)),
            ticker: None,
            pending: None,
        }
    }
}

#[async_trait]
impl TrackingSource for HttpPollSource {
    fn describe(&self) -> String {
        self.client.hand_data_url().to_string()
    }

    async fn connect(&mut self) -> Result<()> {
        // The first successful poll counts as the connection
        let frame = self.client.hand_data().await?;
        self.pending = Some(frame);

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        self.ticker = Some(ticker);
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<HandFrame>> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(frame));
        }
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.tick().await;
        }
        self.client.hand_data().await.map(Some)
    }
}
