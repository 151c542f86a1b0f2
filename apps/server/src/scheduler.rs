//! Background sweep of abandoned wizard sessions.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::main_lib::AppState;

/// How often idle sessions are looked for.
const SWEEP_INTERVAL_SECS: u64 = 60;

/// Starts the idle-session sweeper.
///
/// Sessions untouched for `ttl` are dropped along with their draft and any
/// attached photos.
pub fn start_session_sweeper(state: Arc<AppState>, ttl: Duration) {
    tokio::spawn(async move {
        info!(
            "Session sweeper started (idle timeout {}s)",
            ttl.as_secs()
        );
        let mut sweep_interval = interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        loop {
            sweep_interval.tick().await;
            let expired = state.sessions.expire_idle(ttl);
            if expired > 0 {
                info!(
                    "Expired {} idle wizard sessions; {} still open",
                    expired,
                    state.sessions.len()
                );
            } else {
                debug!("No idle wizard sessions to expire");
            }
        }
    });
}
