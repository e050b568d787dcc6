pub mod config;
pub mod error;
pub mod report;
pub mod system;

pub use config::{GpuConfig, MonitorConfig, OutputFormat};
pub use error::{Result, VitalsError};
pub use report::{banner, divider, Section, VitalsReport, DIVIDER_WIDTH};
pub use system::{
    CpuSnapshot, GpuReport, GpuSnapshot, MemorySnapshot, SensorReading, TemperatureReport,
};
