use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Elapsed,
    Cancelled,
}

/// Interruptible sleep driving the monitor loop
#[async_trait]
pub trait Ticker: Send {
    async fn sleep(&mut self, duration: Duration) -> Tick;
}

/// Tokio-backed ticker, interrupted by cancelling its token
pub struct TokioTicker {
    cancel_token: CancellationToken,
}

impl TokioTicker {
    pub fn new(cancel_token: CancellationToken) -> Self {
        Self { cancel_token }
    }
}

#[async_trait]
impl Ticker for TokioTicker {
    async fn sleep(&mut self, duration: Duration) -> Tick {
        if self.cancel_token.is_cancelled() {
            return Tick::Cancelled;
        }

        tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => {
                debug!("Ticker cancelled");
                Tick::Cancelled
            }
            _ = tokio::time::sleep(duration) => Tick::Elapsed,
        }
    }
}
