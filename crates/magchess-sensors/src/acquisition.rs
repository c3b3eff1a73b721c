//! Periodic sensor acquisition task
//!
//! Samples a [`ReadingSource`] at a fixed cadence and publishes each full
//! snapshot into [`SharedReadings`]. The board tick task runs on its own
//! cadence and only ever reads the newest snapshot, so a slow or irregular
//! source (multiplexer settling) never stalls inference.

use crate::snapshot::{ReadingSource, SharedReadings};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Run until `shutdown` flips to `true` (or its sender is dropped)
///
/// Returns the number of snapshots published.
pub async fn run_acquisition<S: ReadingSource>(
    mut source: S,
    shared: SharedReadings,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut published = 0u64;

    info!("[SENSORS] Acquisition loop started ({:?} period)", period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = source.sample();
                shared.publish(snapshot);
                published += 1;
                if published % 600 == 0 {
                    debug!("[SENSORS] {} snapshots published", published);
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("[SENSORS] Acquisition loop stopped after {} snapshots", published);
    published
}
