//! System-level types for hardware monitoring

use std::fmt;

use serde::Serialize;

use crate::error::{Result, VitalsError};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Label used when a sensor reports no label of its own
pub const DEFAULT_SENSOR_LABEL: &str = "CPU";

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Global CPU utilization over one sampling window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuSnapshot {
    pub usage_percent: f32,
}

impl CpuSnapshot {
    /// Clamps the raw probe value into 0..=100; NaN reads as idle.
    pub fn new(raw_percent: f32) -> Self {
        let usage_percent = match raw_percent.is_nan() {
            true => 0.0,
            false => raw_percent.clamp(0.0, 100.0),
        };
        Self { usage_percent }
    }
}

impl fmt::Display for CpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPU Usage: {:.1}%", self.usage_percent)
    }
}

/// Virtual memory usage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub used_percent: f64,
    pub total_bytes: u64,
}

impl MemorySnapshot {
    /// Used memory is `total - available`, percent rounded to one decimal.
    pub fn from_bytes(total_bytes: u64, available_bytes: u64) -> Result<Self> {
        if total_bytes == 0 {
            return Err(VitalsError::InvalidReading(
                "total memory reported as 0 bytes".to_string(),
            ));
        }

        let used = total_bytes - available_bytes.min(total_bytes);
        let used_percent = round_to(used as f64 / total_bytes as f64 * 100.0, 1);

        Ok(Self {
            used_percent,
            total_bytes,
        })
    }

    /// Total capacity in GiB, rounded to 2 decimals
    pub fn total_gb(&self) -> f64 {
        round_to(self.total_bytes as f64 / BYTES_PER_GIB, 2)
    }
}

impl fmt::Display for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RAM Usage: {:.1}% of {:?} GB",
            self.used_percent,
            self.total_gb()
        )
    }
}

/// One temperature sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub sensor: String,
    pub label: String,
    pub celsius: f32,
}

impl SensorReading {
    pub fn new(sensor: impl Into<String>, label: impl Into<String>, celsius: f32) -> Self {
        let label = label.into();
        let label = match label.trim().is_empty() {
            true => DEFAULT_SENSOR_LABEL.to_string(),
            false => label.trim().to_string(),
        };

        Self {
            sensor: sensor.into(),
            label,
            celsius,
        }
    }

    /// Splits a platform component label such as `"k10temp Tctl"` into
    /// sensor (`k10temp`) and label (`Tctl`).
    pub fn from_component_label(component_label: &str, celsius: f32) -> Self {
        let trimmed = component_label.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((sensor, label)) => Self::new(sensor, label, celsius),
            None => Self::new(trimmed, "", celsius),
        }
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {:?}°C", self.sensor, self.label, self.celsius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "readings", rename_all = "snake_case")]
pub enum TemperatureReport {
    /// The platform has no sensor API
    Unsupported,
    /// The sensor API exists but returned nothing
    NotAvailable,
    /// Never empty
    Readings(Vec<SensorReading>),
}

impl TemperatureReport {
    /// `None` means the platform cannot report temperatures at all.
    pub fn from_readings(readings: Option<Vec<SensorReading>>) -> Self {
        match readings {
            None => Self::Unsupported,
            Some(readings) if readings.is_empty() => Self::NotAvailable,
            Some(readings) => Self::Readings(readings),
        }
    }
}

impl fmt::Display for TemperatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "Temperature: Unsupported on this OS"),
            Self::NotAvailable => write!(f, "Temperature: Not available"),
            Self::Readings(readings) => {
                for (i, reading) in readings.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", reading)?;
                }
                Ok(())
            }
        }
    }
}

/// Telemetry for a single GPU device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpuSnapshot {
    pub temperature_c: u32,
    pub utilization_percent: u32,
    pub memory_used_bytes: u64,
}

impl GpuSnapshot {
    pub fn memory_used_mb(&self) -> u64 {
        (self.memory_used_bytes as f64 / BYTES_PER_MIB).round() as u64
    }
}

impl fmt::Display for GpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GPU Temp: {}°C", self.temperature_c)?;
        writeln!(f, "GPU Usage: {}%", self.utilization_percent)?;
        write!(f, "GPU Memory Used: {} MB", self.memory_used_mb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum GpuReport {
    NotAvailable,
    Snapshot(GpuSnapshot),
    Error(String),
}

impl fmt::Display for GpuReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "GPU Info: Not available"),
            Self::Snapshot(snapshot) => write!(f, "{}", snapshot),
            Self::Error(message) => write!(f, "GPU Info Error: {}", message),
        }
    }
}
