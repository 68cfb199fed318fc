//! Refresh clock
//!
//! Ticks on a fixed cadence so live/upcoming/past labels advance without
//! user input. Stops on Ctrl-C.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Call `on_tick` with the current instant immediately and then every
/// `period`, until Ctrl-C or until `on_tick` returns false
pub async fn run_refresh<F>(period: Duration, mut on_tick: F)
where
    F: FnMut(DateTime<Utc>) -> bool,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Utc::now();
                debug!(%now, "Clock tick");
                if !on_tick(now) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping refresh");
                break;
            }
        }
    }
}
