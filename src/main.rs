use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use btleplug::api::Manager as _;
use btleplug::platform::Manager;
use clap::Parser;
use log::info;

mod config;
mod messages;
mod report;
mod sampler;
mod scanner;

#[derive(Parser, Debug)]
#[command(about = "BLE proximity beacon monitor")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config_contents = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("reading config file {}", cli.config.display()))?;
    let config: config::AppConfig = toml::de::from_str(&config_contents)?;

    let device_id = device_identity(&config)?;
    info!("DeviceID: {}", device_id);

    let scan = config.scan.clone().unwrap_or_default();
    let interval = Duration::from_millis(scan.sample_interval_ms.unwrap_or(2000));
    let window = Duration::from_millis(scan.scan_window_ms.unwrap_or(1000));
    let max_results = scan.max_results.unwrap_or(20);

    let bt_manager = Manager::new().await?;

    // get the first bluetooth adapter
    let adapters = bt_manager.adapters().await?;
    let central = adapters
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no Bluetooth adapter found"))?;

    let scanner = scanner::BleScanner::new(central, window);
    let transport = report::HttpTransport::new(&config.report)?;
    let reporter = report::Reporter::new(transport, device_id);

    let sampler = sampler::Sampler::new(
        scanner,
        reporter,
        config.target.name.clone(),
        interval,
        max_results,
    );
    sampler.run_loop().await
}

/// Config override wins; otherwise the primary interface's MAC address
/// stands in as the stable device identifier.
fn device_identity(config: &config::AppConfig) -> anyhow::Result<String> {
    if let Some(device_id) = &config.device_id {
        return Ok(device_id.clone());
    }
    let mac = mac_address::get_mac_address()?
        .ok_or_else(|| anyhow!("no network interface available for device identity"))?;
    Ok(mac.to_string())
}
