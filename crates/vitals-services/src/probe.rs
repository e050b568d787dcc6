use sysinfo::{Components, System, IS_SUPPORTED_SYSTEM, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::{debug, instrument};
use vitals_core::{MemorySnapshot, Result, SensorReading};

use std::time::Duration;

/// Source of raw CPU, memory and sensor readings
pub trait SystemProbe {
    /// Human-readable OS family, e.g. `Linux`
    fn platform(&self) -> String;

    /// Shortest sampling window the probe can measure
    fn min_cpu_window(&self) -> Duration {
        Duration::ZERO
    }

    /// Marks the start of a CPU sampling window
    fn begin_cpu_sample(&mut self) -> Result<()>;

    /// Global CPU load since `begin_cpu_sample`, in percent
    fn finish_cpu_sample(&mut self) -> Result<f32>;

    fn memory(&mut self) -> Result<MemorySnapshot>;

    /// `Ok(None)` when the platform has no sensor API
    fn temperatures(&mut self) -> Result<Option<Vec<SensorReading>>>;
}

/// `SystemProbe` backed by the `sysinfo` crate
pub struct SysinfoProbe {
    system: System,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for SysinfoProbe {
    fn platform(&self) -> String {
        platform_name(std::env::consts::OS)
    }

    fn min_cpu_window(&self) -> Duration {
        MINIMUM_CPU_UPDATE_INTERVAL
    }

    fn begin_cpu_sample(&mut self) -> Result<()> {
        self.system.refresh_cpu_usage();
        Ok(())
    }

    fn finish_cpu_sample(&mut self) -> Result<f32> {
        self.system.refresh_cpu_usage();
        Ok(self.system.global_cpu_usage())
    }

    #[instrument(skip(self))]
    fn memory(&mut self) -> Result<MemorySnapshot> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let available = self.system.available_memory();
        debug!(total, available, "Memory refreshed");
        MemorySnapshot::from_bytes(total, available)
    }

    #[instrument(skip(self))]
    fn temperatures(&mut self) -> Result<Option<Vec<SensorReading>>> {
        if !IS_SUPPORTED_SYSTEM || !sensors_supported(std::env::consts::OS) {
            debug!("Temperature sensors unsupported on this OS");
            return Ok(None);
        }

        let components = Components::new_with_refreshed_list();
        let readings: Vec<SensorReading> = components
            .list()
            .iter()
            .filter_map(|component| {
                component
                    .temperature()
                    .filter(|celsius| celsius.is_finite())
                    .map(|celsius| SensorReading::from_component_label(component.label(), celsius))
            })
            .collect();

        debug!(
            components = components.list().len(),
            readings = readings.len(),
            "Sensors refreshed"
        );
        Ok(Some(readings))
    }
}

/// OS families whose sensor readings come from hwmon-style kernel sensors.
/// Everywhere else temperatures are reported as unsupported.
pub fn sensors_supported(os: &str) -> bool {
    matches!(os, "linux" | "freebsd")
}

/// Maps `std::env::consts::OS` to the conventional OS family name
pub fn platform_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "openbsd" => "OpenBSD".to_string(),
        "netbsd" => "NetBSD".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Unknown".to_string(),
            }
        }
    }
}
