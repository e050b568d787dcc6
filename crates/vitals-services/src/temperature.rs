use tracing::{debug, instrument};
use vitals_core::{Result, TemperatureReport};

use crate::probe::SystemProbe;

#[instrument(skip_all)]
pub fn report_temperature(probe: &mut dyn SystemProbe) -> Result<TemperatureReport> {
    let report = TemperatureReport::from_readings(probe.temperatures()?);
    match &report {
        TemperatureReport::Unsupported => debug!("No sensor support on this platform"),
        TemperatureReport::NotAvailable => debug!("Sensor API returned no entries"),
        TemperatureReport::Readings(readings) => debug!(count = readings.len(), "Sensors read"),
    }
    Ok(report)
}
