mod cpu;
mod gpu_monitor;
mod memory;
mod monitor;
mod probe;
mod temperature;
mod ticker;

#[cfg(test)]
mod fakes;

pub use cpu::CpuReporter;
pub use gpu_monitor::{GpuMonitor, GpuMonitorError, GpuProbe, NvmlProbe};
pub use memory::report_memory;
pub use monitor::{Monitor, STOPPED_MESSAGE};
pub use probe::{platform_name, sensors_supported, SysinfoProbe, SystemProbe};
pub use temperature::report_temperature;
pub use ticker::{Tick, Ticker, TokioTicker};

// Re-export core types so the CLI only imports from services
pub use vitals_core::{
    CpuSnapshot, GpuConfig, GpuReport, GpuSnapshot, MemorySnapshot, MonitorConfig, OutputFormat,
    SensorReading, TemperatureReport, VitalsError, VitalsReport,
};
