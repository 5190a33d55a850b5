use std::time::{Duration, Instant};

use btleplug::api::{Central as _, CentralEvent, Peripheral as _, ScanFilter};
use btleplug::platform::Adapter;
use futures::StreamExt as _;
use log::{debug, warn};
use tokio::time::timeout;

use crate::messages::Advertisement;

/// One bounded radio scan. Implemented by the real adapter and by test fakes.
pub trait ScanSource {
    async fn scan(&self, max_results: usize) -> Vec<Advertisement>;
}

pub struct BleScanner {
    adapter: Adapter,
    window: Duration,
}

impl BleScanner {
    pub fn new(adapter: Adapter, window: Duration) -> Self {
        BleScanner { adapter, window }
    }

    async fn scan_once(&self, max_results: usize) -> Result<Vec<Advertisement>, btleplug::Error> {
        let mut events = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;

        let deadline = Instant::now() + self.window;
        let mut results = Vec::with_capacity(max_results);

        while results.len() < max_results {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match timeout(remaining, events.next()).await {
                Ok(Some(CentralEvent::DeviceDiscovered(id))) => {
                    // Property lookup can race device departure; skip that record.
                    let properties = match self.adapter.peripheral(&id).await {
                        Ok(peripheral) => peripheral.properties().await.ok().flatten(),
                        Err(err) => {
                            debug!("Peripheral {:?} lookup failed: {:?}", id, err);
                            None
                        }
                    };
                    if let Some(properties) = properties {
                        results.push(Advertisement {
                            name: properties.local_name.unwrap_or_default(),
                            rssi: properties.rssi.unwrap_or(0),
                        });
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    debug!("Adapter event stream closed");
                    break;
                }
                // Scan window elapsed
                Err(_) => break,
            }
        }

        if let Err(err) = self.adapter.stop_scan().await {
            warn!("Error stopping scan: {:?}", err);
        }

        Ok(results)
    }
}

impl ScanSource for BleScanner {
    async fn scan(&self, max_results: usize) -> Vec<Advertisement> {
        match self.scan_once(max_results).await {
            Ok(results) => results,
            Err(err) => {
                // An unavailable radio reads the same as an empty neighborhood.
                warn!("BLE scan failed: {:?}", err);
                Vec::new()
            }
        }
    }
}
