//! GPU vector-add fixture for debugger test harnesses.
//!
//! Runs the allocate → upload → launch → read back → verify → release
//! sequence once per processed device and exits non-zero on the first
//! failing platform call or mismatching result element.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use vecadd_gpu::{DeviceInfo, GpuDevice, VectorAdd};

mod exit;
mod host;

/// Default elements per buffer.
const DEFAULT_COUNT: usize = 64;

#[derive(Parser)]
#[command(name = "vecadd-fixture")]
#[command(about = "GPU vector-add fixture for debugger test harnesses")]
#[command(version)]
struct Cli {
    /// Number of elements per buffer
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Maximum number of devices to exercise
    #[arg(long, value_name = "N", default_value_t = 1)]
    max_devices: usize,

    /// List detected adapters without running the workload
    #[arg(long)]
    list: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let code = match pollster::block_on(run(&cli)) {
        Ok(()) => exit::EXIT_SUCCESS,
        Err(e) => {
            error!("fixture failed: {e}");
            let mut source = e.source();
            while let Some(err) = source {
                error!("  caused by: {err}");
                source = err.source();
            }
            if e.downcast_ref::<host::VerifyError>().is_some() {
                exit::EXIT_VERIFY_FAIL
            } else {
                exit::EXIT_PLATFORM_FAIL
            }
        }
    };
    std::process::exit(code);
}

/// Enumerate adapters and drive the per-device sequence.
///
/// Processes `min(detected, --max-devices)` devices; the default of 1
/// keeps the run to a single device even when more are present. An empty
/// adapter list is not an error: the loop never runs and the fixture exits
/// 0 having printed nothing.
async fn run(cli: &Cli) -> Result<()> {
    let instance = vecadd_gpu::new_instance();
    let adapters = vecadd_gpu::enumerate_adapters(&instance);
    info!(detected = adapters.len(), "enumerated GPU adapters");

    if cli.list {
        for (index, adapter) in adapters.iter().enumerate() {
            println!("{}", DeviceInfo::from_adapter(index, adapter).descriptor_line());
        }
        return Ok(());
    }

    let limit = cli.max_devices.min(adapters.len());
    for (index, adapter) in adapters.iter().enumerate().take(limit) {
        process_device(index, adapter, cli.count).await?;
    }
    Ok(())
}

/// One device's full pass: setup, dispatch, readback, verify.
///
/// All GPU resources for the device are dropped when this returns, so no
/// buffer or queue outlives its device's block.
async fn process_device(index: usize, adapter: &wgpu::Adapter, count: usize) -> Result<()> {
    let gpu = GpuDevice::from_adapter(index, adapter)
        .await
        .with_context(|| format!("device {index}: device request failed"))?;
    println!("{}", gpu.info.descriptor_line());

    let add = VectorAdd::new(&gpu.device)
        .with_context(|| format!("device {index}: pipeline creation failed"))?;

    let (a, b) = host::generate_inputs(count);
    let c = add
        .run(&gpu, &a, &b)
        .await
        .with_context(|| format!("device {index}: vector-add dispatch failed"))?;

    host::verify(&a, &b, &c)
        .with_context(|| format!("device {index}: verification failed"))?;
    debug!(device = index, count, "verification passed");
    Ok(())
}

fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["vecadd-fixture"]);
        assert_eq!(cli.count, 64);
        assert_eq!(cli.max_devices, 1);
        assert!(!cli.list);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::parse_from(["vecadd-fixture", "--count", "300", "--max-devices", "4"]);
        assert_eq!(cli.count, 300);
        assert_eq!(cli.max_devices, 4);
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(exit::EXIT_SUCCESS, exit::EXIT_PLATFORM_FAIL);
        assert_ne!(exit::EXIT_PLATFORM_FAIL, exit::EXIT_VERIFY_FAIL);
    }

    #[test]
    fn verify_error_downcasts_through_context() {
        // Exit-code mapping must survive the per-device context wrapper.
        let err = anyhow::Error::from(host::VerifyError::Mismatch {
            index: 0,
            expected: 0,
            got: 1,
        })
        .context("device 0: verification failed");
        assert!(err.downcast_ref::<host::VerifyError>().is_some());
    }

    #[test]
    fn length_error_downcasts_through_context() {
        let err = anyhow::Error::from(host::VerifyError::Length { expected: 64, got: 0 })
            .context("device 0: verification failed");
        assert!(err.downcast_ref::<host::VerifyError>().is_some());
    }
}
