//! Per-tick report assembly and text rendering

use std::fmt::Display;

use serde::Serialize;

use crate::system::{CpuSnapshot, GpuReport, MemorySnapshot, TemperatureReport};

pub const DIVIDER_WIDTH: usize = 40;

pub fn divider() -> String {
    "=".repeat(DIVIDER_WIDTH)
}

/// Header printed once before the first tick
pub fn banner(platform: &str) -> String {
    format!("System Monitor - Platform: {}\n{}", platform, divider())
}

/// Outcome of one reporter within a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Failed(String),
}

impl<T: Display> Section<T> {
    pub fn render(&self, name: &str) -> String {
        match self {
            Self::Ready(value) => value.to_string(),
            Self::Failed(message) => format!("{} Error: {}", name, message),
        }
    }
}

impl<T, E: Display> From<std::result::Result<T, E>> for Section<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Everything gathered during one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsReport {
    pub timestamp_ms: u64,
    pub cpu: Section<CpuSnapshot>,
    pub memory: Section<MemorySnapshot>,
    pub temperature: Section<TemperatureReport>,
    pub gpu: GpuReport,
}

impl VitalsReport {
    /// CPU, RAM, temperature and GPU blocks followed by the divider, no
    /// trailing newline.
    pub fn render_text(&self) -> String {
        [
            self.cpu.render("CPU"),
            self.memory.render("RAM"),
            self.temperature.render("Temperature"),
            self.gpu.to_string(),
            divider(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VitalsError;
    use crate::system::SensorReading;

    fn sample_report() -> VitalsReport {
        VitalsReport {
            timestamp_ms: 1_700_000_000_000,
            cpu: Section::Ready(CpuSnapshot::new(7.0)),
            memory: MemorySnapshot::from_bytes(8 * 1024 * 1024 * 1024, 6 * 1024 * 1024 * 1024)
                .into(),
            temperature: Section::Ready(TemperatureReport::Readings(vec![SensorReading::new(
                "coretemp", "Core 0", 44.0,
            )])),
            gpu: GpuReport::NotAvailable,
        }
    }

    #[test]
    fn test_banner() {
        assert_eq!(
            banner("Linux"),
            "System Monitor - Platform: Linux\n========================================"
        );
    }

    #[test]
    fn test_render_text_order() {
        let text = sample_report().render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CPU Usage: 7.0%",
                "RAM Usage: 25.0% of 8.0 GB",
                "coretemp - Core 0: 44.0°C",
                "GPU Info: Not available",
                "========================================",
            ]
        );
    }

    #[test]
    fn test_failed_section_renders_inline() {
        let mut report = sample_report();
        report.cpu = Err::<CpuSnapshot, _>(VitalsError::Probe("no /proc/stat".to_string())).into();
        let text = report.render_text();
        assert!(text.starts_with("CPU Error: Probe error: no /proc/stat\n"));
    }

    #[test]
    fn test_json_line_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["cpu"]["ready"]["usage_percent"], 7.0);
        assert_eq!(json["memory"]["ready"]["used_percent"], 25.0);
        assert_eq!(json["temperature"]["ready"]["status"], "readings");
        assert_eq!(json["gpu"]["status"], "not_available");
    }
}
