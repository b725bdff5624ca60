use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::domain::repository::ExpiredCodeCleanup;

/// Periodically sweeps expired codes.
///
/// Sweeps run one after another on the current task and late ticks are
/// delayed rather than bunched, so two sweeps never overlap. A failed sweep
/// is logged and the next tick runs as usual.
pub struct CleanupScheduler<S>
where
    S: ExpiredCodeCleanup,
{
    pub cleaner: S,
    pub interval: Duration,
}

impl<S> CleanupScheduler<S>
where
    S: ExpiredCodeCleanup,
{
    /// Run a single sweep. Returns the number of removed codes, or `None` if it failed.
    pub async fn run_once(&self) -> Option<u64> {
        match self.cleaner.clean_expired().await {
            Ok(0) => {
                debug!("no expired codes to sweep");
                Some(0)
            }
            Ok(removed) => {
                info!(removed, "expired codes swept");
                Some(removed)
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "expired code sweep failed");
                None
            }
        }
    }

    /// Sweep every `interval`, starting immediately, until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(interval_secs = self.interval.as_secs(), "cleanup scheduler started");
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
        info!("cleanup scheduler stopped");
    }
}
