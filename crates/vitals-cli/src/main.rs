use anyhow::Result;
use clap::Parser;
use std::future::Future;
use std::io::{self, Write};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vitals_core::{GpuConfig, MonitorConfig, OutputFormat};
use vitals_services::{GpuMonitor, Monitor, SysinfoProbe, TokioTicker};

#[derive(Parser)]
#[command(name = "vitals")]
#[command(about = "Vitals - periodic CPU, RAM, temperature and GPU report", long_about = None)]
struct Cli {
    /// Seconds to sleep between reports
    #[arg(short, long, default_value = "2")]
    interval: u64,

    /// CPU load sampling window in milliseconds
    #[arg(long, default_value = "1000")]
    cpu_sample: u64,

    /// NVML index of the GPU to report on
    #[arg(long, default_value = "0")]
    gpu_index: u32,

    /// Skip GPU initialization
    #[arg(long)]
    no_gpu: bool,

    /// Stop after this many reports
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

impl Cli {
    fn into_config(self) -> MonitorConfig {
        MonitorConfig {
            tick_interval_ms: self.interval.saturating_mul(1_000),
            cpu_sample_ms: self.cpu_sample,
            max_ticks: self.count,
            output: self.output,
            gpu: GpuConfig {
                enabled: !self.no_gpu,
                device_index: self.gpu_index,
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Cli::parse().into_config();
    config.validate()?;

    let cancel_token = CancellationToken::new();
    install_interrupt_handler(tokio::signal::ctrl_c(), cancel_token.clone()).await;

    let output = config.output;
    let gpu = GpuMonitor::init(&config.gpu);
    let mut monitor = Monitor::new(config, SysinfoProbe::new(), gpu);
    let mut ticker = TokioTicker::new(cancel_token);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = monitor.run(&mut out, &mut ticker).await;

    // JSON mode keeps stdout to one object per line
    match output {
        OutputFormat::Text => monitor.stop(&mut out)?,
        OutputFormat::Json => monitor.stop(&mut io::stderr())?,
    }
    out.flush()?;

    result?;
    Ok(())
}

/// Spawns the listener and yields once so it is polled (and the OS handler
/// registered) before GPU init and the first report.
async fn install_interrupt_handler<F>(signal: F, cancel_token: CancellationToken)
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                tracing::debug!("Interrupt received");
                cancel_token.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
    tokio::task::yield_now().await;
}
