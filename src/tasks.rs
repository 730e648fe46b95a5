use std::time::Duration;
use tracing::debug;

use crate::http::AppStateRef;

/// Hourly sweep over the rate limiters so buckets for one-off callers do not
/// accumulate for the lifetime of the process.
pub fn start_periodic_tasks(app_state: AppStateRef) {
    const HOUR: u64 = 60 * 60;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HOUR));

        loop {
            interval.tick().await;

            let pruned = app_state.upload_limiter.prune_expired()
                + app_state.read_limiter.prune_expired();

            if pruned != 0 {
                debug!("Pruned {pruned} expired rate limiter buckets");
            }
        }
    });
}
