//! Background eviction of abandoned sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::services::sessions::SessionDirectory;

/// Every `every`, evict sessions idle for longer than `idle`.
///
/// Runs until the returned handle is aborted.
pub fn spawn_idle_sweeper(
    sessions: Arc<SessionDirectory>,
    every: Duration,
    idle: Duration,
) -> JoinHandle<()> {
    info!(
        every_secs = every.as_secs(),
        idle_secs = idle.as_secs(),
        "Idle session sweeper started"
    );
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle(idle).await;
            if evicted.is_empty() {
                debug!(active = sessions.active_rooms(), "Sweep found nothing idle");
            } else {
                info!(
                    evicted = evicted.len(),
                    active = sessions.active_rooms(),
                    "Sweep evicted idle sessions"
                );
            }
        }
    })
}
