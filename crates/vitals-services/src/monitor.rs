use std::fmt::Display;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info, instrument};
use vitals_core::{
    banner, MonitorConfig, OutputFormat, Result, Section, VitalsError, VitalsReport,
};

use crate::cpu::CpuReporter;
use crate::gpu_monitor::GpuMonitor;
use crate::memory::report_memory;
use crate::probe::SystemProbe;
use crate::temperature::report_temperature;
use crate::ticker::{Tick, Ticker};

pub const STOPPED_MESSAGE: &str = "Monitoring stopped.";

/// Periodic vitals reporter.
///
/// Owns the platform probe and the GPU capability for the lifetime of the
/// run; both are fixed at construction.
pub struct Monitor<P: SystemProbe> {
    config: MonitorConfig,
    probe: P,
    gpu: GpuMonitor,
    cpu: CpuReporter,
}

impl<P: SystemProbe> Monitor<P> {
    pub fn new(config: MonitorConfig, probe: P, gpu: GpuMonitor) -> Self {
        let cpu = CpuReporter::new(config.cpu_sample_window());
        Self {
            config,
            probe,
            gpu,
            cpu,
        }
    }

    /// Gathers one report. Only fails with `VitalsError::Cancelled`; probe
    /// failures land in the report as `Section::Failed`.
    pub async fn collect(&mut self, ticker: &mut dyn Ticker) -> Result<VitalsReport> {
        let cpu = match self.cpu.sample(&mut self.probe, ticker).await {
            Err(VitalsError::Cancelled) => return Err(VitalsError::Cancelled),
            result => section("CPU", result),
        };
        let memory = section("RAM", report_memory(&mut self.probe));
        let temperature = section("Temperature", report_temperature(&mut self.probe));
        let gpu = self.gpu.report();

        Ok(VitalsReport {
            timestamp_ms: now_ms(),
            cpu,
            memory,
            temperature,
            gpu,
        })
    }

    /// Writes the banner, then one block per tick until the ticker is
    /// cancelled or `max_ticks` is reached. Returns the number of completed
    /// ticks.
    #[instrument(skip_all, fields(
        interval_ms = self.config.tick_interval_ms,
        max_ticks = ?self.config.max_ticks,
        gpu = self.gpu.is_enabled()
    ))]
    pub async fn run<W: Write>(&mut self, out: &mut W, ticker: &mut dyn Ticker) -> Result<u64> {
        info!("Starting monitor");

        if self.config.output == OutputFormat::Text {
            writeln!(out, "{}", banner(&self.probe.platform()))?;
            out.flush()?;
        }

        let interval = self.config.tick_interval();
        let mut ticks = 0u64;

        loop {
            let report = match self.collect(ticker).await {
                Ok(report) => report,
                Err(VitalsError::Cancelled) => break,
                Err(e) => return Err(e),
            };

            self.write_report(out, &report)?;
            ticks += 1;
            debug!(ticks, "Tick complete");

            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                info!(ticks, "Tick limit reached");
                break;
            }

            if ticker.sleep(interval).await == Tick::Cancelled {
                break;
            }
        }

        info!(ticks, "Monitor stopped");
        Ok(ticks)
    }

    fn write_report<W: Write>(&self, out: &mut W, report: &VitalsReport) -> Result<()> {
        match self.config.output {
            OutputFormat::Text => writeln!(out, "{}", report.render_text())?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Releases the GPU library (if it was initialized) and writes the
    /// closing message.
    pub fn stop<W: Write>(self, out: &mut W) -> Result<()> {
        self.gpu.shutdown();
        writeln!(out, "\n{}", STOPPED_MESSAGE)?;
        out.flush()?;
        Ok(())
    }
}

fn section<T, E: Display>(name: &str, result: std::result::Result<T, E>) -> Section<T> {
    if let Err(e) = &result {
        error!("{} report failed: {}", name, e);
    }
    result.into()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeProbe, ScriptedTicker};
    use crate::ticker::TokioTicker;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use vitals_core::GpuReport;

    fn config(max_ticks: Option<u64>) -> MonitorConfig {
        MonitorConfig {
            max_ticks,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_text_output_layout() {
        let mut monitor = Monitor::new(config(Some(1)), FakeProbe::default(), GpuMonitor::disabled());
        let mut out = Vec::new();
        let mut ticker = ScriptedTicker::new(usize::MAX);

        let ticks = monitor.run(&mut out, &mut ticker).await.unwrap();
        assert_eq!(ticks, 1);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "System Monitor - Platform: TestOS\n\
             ========================================\n\
             CPU Usage: 12.5%\n\
             RAM Usage: 50.0% of 16.0 GB\n\
             coretemp - Package id 0: 52.0°C\n\
             GPU Info: Not available\n\
             ========================================\n"
        );
    }

    #[tokio::test]
    async fn test_sleeps_cpu_window_then_interval() {
        let mut monitor = Monitor::new(config(Some(2)), FakeProbe::default(), GpuMonitor::disabled());
        let mut ticker = ScriptedTicker::new(usize::MAX);

        monitor.run(&mut Vec::new(), &mut ticker).await.unwrap();

        // No trailing sleep after the last tick
        assert_eq!(
            ticker.requested,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(1),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_during_interval_stops_loop() {
        let mut monitor = Monitor::new(config(None), FakeProbe::default(), GpuMonitor::disabled());
        let mut out = Vec::new();
        // cpu window, interval, cpu window, interval(cancelled)
        let mut ticker = ScriptedTicker::new(3);

        let ticks = monitor.run(&mut out, &mut ticker).await.unwrap();

        assert_eq!(ticks, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("CPU Usage:").count(), 2);
    }

    #[tokio::test]
    async fn test_cancel_during_cpu_window_drops_partial_tick() {
        let mut monitor = Monitor::new(config(None), FakeProbe::default(), GpuMonitor::disabled());
        let mut out = Vec::new();
        let mut ticker = ScriptedTicker::new(2);

        let ticks = monitor.run(&mut out, &mut ticker).await.unwrap();

        assert_eq!(ticks, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("RAM Usage:").count(), 1);
    }

    #[tokio::test]
    async fn test_probe_failure_keeps_loop_alive() {
        let probe = FakeProbe {
            cpu_error: Some("permission denied".to_string()),
            ..Default::default()
        };
        let mut monitor = Monitor::new(config(Some(3)), probe, GpuMonitor::disabled());
        let mut out = Vec::new();
        let mut ticker = ScriptedTicker::new(usize::MAX);

        let ticks = monitor.run(&mut out, &mut ticker).await.unwrap();

        assert_eq!(ticks, 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.matches("CPU Error: Probe error: permission denied").count(),
            3
        );
    }

    #[tokio::test]
    async fn test_json_output_has_no_banner() {
        let mut cfg = config(Some(2));
        cfg.output = OutputFormat::Json;
        let mut monitor = Monitor::new(cfg, FakeProbe::default(), GpuMonitor::disabled());
        let mut out = Vec::new();

        monitor
            .run(&mut out, &mut ScriptedTicker::new(usize::MAX))
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["cpu"]["ready"]["usage_percent"], 12.5);
            assert_eq!(value["gpu"]["status"], "not_available");
        }
    }

    #[tokio::test]
    async fn test_collect_gpu_unavailable() {
        let mut monitor = Monitor::new(config(None), FakeProbe::default(), GpuMonitor::disabled());
        let report = monitor.collect(&mut ScriptedTicker::new(1)).await.unwrap();
        assert_eq!(report.gpu, GpuReport::NotAvailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_clock_tick_timing() {
        let mut monitor = Monitor::new(config(Some(3)), FakeProbe::default(), GpuMonitor::disabled());
        let mut ticker = TokioTicker::new(CancellationToken::new());
        let start = tokio::time::Instant::now();

        let ticks = monitor.run(&mut Vec::new(), &mut ticker).await.unwrap();

        // three 1s CPU windows and two 2s intervals
        assert_eq!(ticks, 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(7));
        assert!(elapsed < Duration::from_millis(7_100));
    }

    #[tokio::test]
    async fn test_stop_writes_message() {
        let monitor = Monitor::new(config(None), FakeProbe::default(), GpuMonitor::disabled());
        let mut out = Vec::new();
        monitor.stop(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nMonitoring stopped.\n");
    }
}
