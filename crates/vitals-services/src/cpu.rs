use std::time::Duration;
use tracing::{debug, instrument};
use vitals_core::{CpuSnapshot, Result, VitalsError};

use crate::probe::SystemProbe;
use crate::ticker::{Tick, Ticker};

/// Measures global CPU load over a fixed sampling window
pub struct CpuReporter {
    window: Duration,
}

impl CpuReporter {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Waits one sampling window on `ticker`; returns
    /// `VitalsError::Cancelled` if the wait is interrupted.
    #[instrument(skip_all, fields(window_ms = self.window.as_millis()))]
    pub async fn sample(
        &self,
        probe: &mut dyn SystemProbe,
        ticker: &mut dyn Ticker,
    ) -> Result<CpuSnapshot> {
        let window = self.window.max(probe.min_cpu_window());
        if window != self.window {
            debug!(
                requested_ms = self.window.as_millis(),
                effective_ms = window.as_millis(),
                "CPU window raised to probe minimum"
            );
        }

        probe.begin_cpu_sample()?;
        if ticker.sleep(window).await == Tick::Cancelled {
            return Err(VitalsError::Cancelled);
        }
        let raw = probe.finish_cpu_sample()?;

        debug!(raw, "CPU sampled");
        Ok(CpuSnapshot::new(raw))
    }
}

impl Default for CpuReporter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
