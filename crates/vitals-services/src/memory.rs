use tracing::{debug, instrument};
use vitals_core::{MemorySnapshot, Result};

use crate::probe::SystemProbe;

#[instrument(skip_all)]
pub fn report_memory(probe: &mut dyn SystemProbe) -> Result<MemorySnapshot> {
    let snapshot = probe.memory()?;
    debug!(
        used_percent = snapshot.used_percent,
        total_gb = snapshot.total_gb(),
        "Memory sampled"
    );
    Ok(snapshot)
}
