//! In-memory probes and tickers for unit tests

use async_trait::async_trait;
use std::time::Duration;
use vitals_core::{MemorySnapshot, Result, SensorReading, VitalsError};

use crate::probe::SystemProbe;
use crate::ticker::{Tick, Ticker};

pub struct FakeProbe {
    pub cpu_percent: f32,
    pub cpu_error: Option<String>,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub sensors: Option<Vec<SensorReading>>,
    pub min_window: Duration,
    pub samples_begun: usize,
    pub samples_finished: usize,
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self {
            cpu_percent: 12.5,
            cpu_error: None,
            total_bytes: 16 * 1024 * 1024 * 1024,
            available_bytes: 8 * 1024 * 1024 * 1024,
            sensors: Some(vec![SensorReading::new("coretemp", "Package id 0", 52.0)]),
            min_window: Duration::ZERO,
            samples_begun: 0,
            samples_finished: 0,
        }
    }
}

impl SystemProbe for FakeProbe {
    fn platform(&self) -> String {
        "TestOS".to_string()
    }

    fn min_cpu_window(&self) -> Duration {
        self.min_window
    }

    fn begin_cpu_sample(&mut self) -> Result<()> {
        self.samples_begun += 1;
        Ok(())
    }

    fn finish_cpu_sample(&mut self) -> Result<f32> {
        self.samples_finished += 1;
        match &self.cpu_error {
            Some(message) => Err(VitalsError::Probe(message.clone())),
            None => Ok(self.cpu_percent),
        }
    }

    fn memory(&mut self) -> Result<MemorySnapshot> {
        MemorySnapshot::from_bytes(self.total_bytes, self.available_bytes)
    }

    fn temperatures(&mut self) -> Result<Option<Vec<SensorReading>>> {
        Ok(self.sensors.clone())
    }
}

/// Returns `Elapsed` for the first `allowed` sleeps, then `Cancelled`
pub struct ScriptedTicker {
    pub allowed: usize,
    pub requested: Vec<Duration>,
}

impl ScriptedTicker {
    pub fn new(allowed: usize) -> Self {
        Self {
            allowed,
            requested: Vec::new(),
        }
    }
}

#[async_trait]
impl Ticker for ScriptedTicker {
    async fn sleep(&mut self, duration: Duration) -> Tick {
        self.requested.push(duration);
        match self.requested.len() <= self.allowed {
            true => Tick::Elapsed,
            false => Tick::Cancelled,
        }
    }
}
