use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, VitalsError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Sleep between ticks
    pub tick_interval_ms: u64,
    /// CPU load sampling window
    pub cpu_sample_ms: u64,
    /// Stop after this many ticks; `None` runs until interrupted
    #[serde(default)]
    pub max_ticks: Option<u64>,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub gpu: GpuConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            cpu_sample_ms: 1_000,
            max_ticks: None,
            output: OutputFormat::Text,
            gpu: GpuConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpu_sample_ms == 0 {
            return Err(VitalsError::Config(
                "CPU sampling window must be greater than 0 ms".to_string(),
            ));
        }
        if self.max_ticks == Some(0) {
            return Err(VitalsError::Config("tick count must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuConfig {
    pub enabled: bool,
    /// NVML device index; only a single device is monitored
    pub device_index: u32,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device_index: 0,
        }
    }
}
