use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::ArtifactStore;

/// Starts the periodic artifact sweep. Returns `None` when retention is
/// disabled (`ttl` is `None`) and nothing is spawned.
pub fn spawn_sweeper(
    store: Arc<dyn ArtifactStore>,
    ttl: Option<Duration>,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    let ttl = ttl?;
    info!(
        "Artifact retention enabled: ttl={}s, sweep every {}s",
        ttl.as_secs(),
        interval.as_secs()
    );

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match store.sweep(ttl).await {
                Ok(0) => {}
                Ok(removed) => info!("Retention sweep removed {removed} expired artifact(s)"),
                Err(e) => error!("Retention sweep failed: {e}"),
            }
        }
    }))
}
