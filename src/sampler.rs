use std::time::{Duration, Instant};

use log::{debug, info};

use crate::messages::Advertisement;
use crate::report::{Reporter, Transport};
use crate::scanner::ScanSource;

/// Cadence at which the run loop re-checks the interval gate.
const TICK_POLL: Duration = Duration::from_millis(50);

/// Returns the earliest record advertising the target name. Duplicates
/// later in scan order lose, whatever their signal strength.
pub fn first_match<'a>(results: &'a [Advertisement], target: &str) -> Option<&'a Advertisement> {
    results.iter().find(|adv| adv.name == target)
}

pub struct Sampler<S, T> {
    scanner: S,
    reporter: Reporter<T>,
    target: String,
    interval: Duration,
    max_results: usize,
    last_fired: Option<Instant>,
}

impl<S: ScanSource, T: Transport> Sampler<S, T> {
    pub fn new(
        scanner: S,
        reporter: Reporter<T>,
        target: String,
        interval: Duration,
        max_results: usize,
    ) -> Self {
        Sampler {
            scanner,
            reporter,
            target,
            interval,
            max_results,
            last_fired: None,
        }
    }

    pub async fn run_loop(mut self) -> anyhow::Result<()> {
        info!(
            "Sampling every {:?} for target {:?}",
            self.interval, self.target
        );
        loop {
            self.tick_at(Instant::now()).await;
            tokio::time::sleep(TICK_POLL).await;
        }
    }

    /// Interval gate. The first call records a baseline and does no work;
    /// after that a tick fires only once a full interval has elapsed.
    /// `last_fired` moves before the sequence runs, so a slow tick cannot
    /// cause an immediate re-fire. Missed intervals are skipped, not
    /// accumulated.
    pub async fn tick_at(&mut self, now: Instant) {
        let Some(last_fired) = self.last_fired else {
            self.last_fired = Some(now);
            return;
        };
        if now.duration_since(last_fired) < self.interval {
            return;
        }
        self.last_fired = Some(now);
        self.sample().await;
    }

    async fn sample(&self) {
        info!("Scanning for BLE devices...");
        let results = self.scanner.scan(self.max_results).await;

        for adv in &results {
            debug!("Found: {} RSSI={}", adv.name, adv.rssi);
        }

        match first_match(&results, &self.target) {
            Some(adv) => {
                info!(
                    "Target {} RSSI={}, sending to server",
                    self.target, adv.rssi
                );
                self.reporter.report(adv.rssi).await;
            }
            None => {
                info!("Target {} not found in this scan", self.target);
            }
        }
    }
}
