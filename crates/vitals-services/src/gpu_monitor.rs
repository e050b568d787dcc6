use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::error::NvmlError;
use nvml_wrapper::Nvml;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use vitals_core::{GpuConfig, GpuReport, GpuSnapshot};

#[derive(Error, Debug)]
pub enum GpuMonitorError {
    #[error("NVML initialization failed: {0}")]
    Init(NvmlError),
    #[error("GPU device {index} unavailable: {source}")]
    Device {
        index: u32,
        #[source]
        source: NvmlError,
    },
    #[error(transparent)]
    Query(#[from] NvmlError),
    #[error("{0}")]
    Unavailable(String),
}

/// Telemetry source for a single GPU device
pub trait GpuProbe: Send {
    fn snapshot(&self) -> Result<GpuSnapshot, GpuMonitorError>;

    /// Releases the device library. Called at most once.
    fn shutdown(self: Box<Self>) -> Result<(), GpuMonitorError>;
}

/// NVML-backed probe for the device at `index`
pub struct NvmlProbe {
    nvml: Nvml,
    index: u32,
}

impl NvmlProbe {
    /// Loads NVML and checks that the device exists.
    #[instrument]
    pub fn init(index: u32) -> Result<Self, GpuMonitorError> {
        debug!("Initializing NVML");
        let nvml = Nvml::init().map_err(GpuMonitorError::Init)?;
        let device = nvml
            .device_by_index(index)
            .map_err(|source| GpuMonitorError::Device { index, source })?;

        match device.name() {
            Ok(name) => info!(index, %name, "GPU monitor connected"),
            Err(e) => info!(index, "GPU monitor connected (name unavailable: {})", e),
        }
        drop(device);

        Ok(Self { nvml, index })
    }
}

impl GpuProbe for NvmlProbe {
    fn snapshot(&self) -> Result<GpuSnapshot, GpuMonitorError> {
        let device = self.nvml.device_by_index(self.index)?;
        let temperature_c = device.temperature(TemperatureSensor::Gpu)?;
        let utilization = device.utilization_rates()?;
        let memory = device.memory_info()?;

        Ok(GpuSnapshot {
            temperature_c,
            utilization_percent: utilization.gpu,
            memory_used_bytes: memory.used,
        })
    }

    fn shutdown(self: Box<Self>) -> Result<(), GpuMonitorError> {
        self.nvml.shutdown()?;
        Ok(())
    }
}

/// GPU capability decided once at startup.
///
/// A monitor without a probe reports `GPU Info: Not available` for its whole
/// lifetime.
pub struct GpuMonitor {
    probe: Option<Box<dyn GpuProbe>>,
}

impl GpuMonitor {
    /// Initializes NVML for `config.device_index`; any failure yields a
    /// disabled monitor.
    pub fn init(config: &GpuConfig) -> Self {
        if !config.enabled {
            info!("GPU monitoring disabled by configuration");
            return Self::disabled();
        }
        Self::from_init(NvmlProbe::init(config.device_index))
    }

    pub fn from_init<P: GpuProbe + 'static>(init: Result<P, GpuMonitorError>) -> Self {
        match init {
            Ok(probe) => Self::with_probe(Box::new(probe)),
            Err(e) => {
                warn!("GPU monitoring unavailable: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn with_probe(probe: Box<dyn GpuProbe>) -> Self {
        Self { probe: Some(probe) }
    }

    pub fn disabled() -> Self {
        Self { probe: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.probe.is_some()
    }

    #[instrument(skip(self), fields(enabled = self.is_enabled()))]
    pub fn report(&self) -> GpuReport {
        let Some(probe) = &self.probe else {
            return GpuReport::NotAvailable;
        };

        match probe.snapshot() {
            Ok(snapshot) => {
                debug!(?snapshot, "GPU sampled");
                GpuReport::Snapshot(snapshot)
            }
            Err(e) => {
                warn!("GPU query failed: {}", e);
                GpuReport::Error(e.to_string())
            }
        }
    }

    /// Tears down the device library if it was initialized.
    pub fn shutdown(self) {
        let Some(probe) = self.probe else {
            return;
        };

        match probe.shutdown() {
            Ok(()) => info!("GPU monitor shut down"),
            Err(e) => warn!("GPU shutdown failed: {}", e),
        }
    }
}
