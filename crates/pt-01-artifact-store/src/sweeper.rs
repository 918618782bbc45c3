//! # Eviction Sweeper
//!
//! Periodic background task that deletes artifacts older than the retention
//! window.
//!
//! ## Lifetime Guarantee
//!
//! With retention window `W` and sweep period `P`, an artifact is readable for
//! at least `W` and is gone no later than `W + P` after its write. Staging
//! files left by writes that never completed age out under the same bound.
//!
//! ## Ownership
//!
//! The sweeper is an owned task: `spawn` returns a `SweeperHandle` that stops
//! it. Tests call `sweep_once` directly with a manual clock instead of waiting
//! for the timer.

use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::adapters::infra::SystemTimeSource;
use crate::domain::entities::SweepReport;
use crate::domain::errors::StoreResult;
use crate::domain::retention::{RetentionPolicy, DEFAULT_RETENTION_WINDOW};
use crate::ports::outbound::{ArtifactStore, TimeSource};

/// Default sweep period: one minute.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Sweeper configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Minimum lifetime of every artifact
    pub retention: Duration,
    /// Interval between sweep runs
    pub period: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            retention: DEFAULT_RETENTION_WINDOW,
            period: DEFAULT_SWEEP_PERIOD,
        }
    }
}

/// Cumulative sweeper counters.
#[derive(Debug, Default)]
pub struct SweeperStats {
    pub runs: AtomicU64,
    pub evicted: AtomicU64,
    pub delete_failures: AtomicU64,
    pub list_failures: AtomicU64,
    pub staging_removed: AtomicU64,
}

impl SweeperStats {
    fn record(&self, report: &SweepReport) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.evicted
            .fetch_add(report.evicted.len() as u64, Ordering::Relaxed);
        self.delete_failures
            .fetch_add(report.failed.len() as u64, Ordering::Relaxed);
        self.staging_removed
            .fetch_add(report.staging_removed as u64, Ordering::Relaxed);
    }

    fn record_list_failure(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.list_failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Scans the store and deletes expired artifacts.
pub struct EvictionSweeper {
    store: Arc<dyn ArtifactStore>,
    clock: Arc<dyn TimeSource>,
    policy: RetentionPolicy,
    period: Duration,
    stats: Arc<SweeperStats>,
}

impl EvictionSweeper {
    /// Create a sweeper driven by the system clock.
    pub fn new(store: Arc<dyn ArtifactStore>, config: SweeperConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemTimeSource), config)
    }

    /// Create a sweeper with an injected clock.
    pub fn with_clock(
        store: Arc<dyn ArtifactStore>,
        clock: Arc<dyn TimeSource>,
        config: SweeperConfig,
    ) -> Self {
        Self {
            store,
            clock,
            policy: RetentionPolicy::new(config.retention),
            period: config.period,
            stats: Arc::new(SweeperStats::default()),
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Shared counters, readable while the sweeper runs.
    pub fn stats(&self) -> Arc<SweeperStats> {
        Arc::clone(&self.stats)
    }

    /// Run one sweep.
    ///
    /// Deletions run concurrently; a failed deletion is logged, reported and
    /// left for the next run. Expired staging leftovers are purged after the
    /// artifacts. Only a failure to list the store is returned as an error.
    pub async fn sweep_once(&self) -> StoreResult<SweepReport> {
        let entries = match self.store.list_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                self.stats.record_list_failure();
                return Err(e);
            }
        };
        let now = self.clock.now();

        let expired: Vec<_> = entries
            .iter()
            .filter(|entry| self.policy.is_expired(entry.last_modified, now))
            .map(|entry| entry.id)
            .collect();

        let outcomes = join_all(expired.iter().map(|id| {
            let store = Arc::clone(&self.store);
            let id = *id;
            async move { (id, store.delete(&id).await) }
        }))
        .await;

        let mut report = SweepReport {
            scanned: entries.len(),
            expired: expired.len(),
            ..SweepReport::default()
        };
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.evicted.push(id),
                Err(e) => {
                    warn!(artifact_id = %id, error = %e, "Failed to evict artifact");
                    report.failed.push(id);
                }
            }
        }

        // Abandoned partial writes age out under the same window
        match self.store.purge_stale_staging(self.policy, now).await {
            Ok(removed) => report.staging_removed = removed,
            Err(e) => warn!(error = %e, "Failed to purge staging files"),
        }

        self.stats.record(&report);
        Ok(report)
    }

    /// Start the periodic sweep on the current tokio runtime.
    ///
    /// The first sweep runs one full period after spawn.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stats = self.stats();
        let task = tokio::spawn(self.run(shutdown_rx));
        SweeperHandle {
            shutdown_tx,
            task,
            stats,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            retention_secs = self.policy.window().as_secs(),
            period_secs = self.period.as_secs(),
            "Eviction sweeper started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(report)
                            if report.evicted_count() > 0
                                || !report.failed.is_empty()
                                || report.staging_removed > 0 =>
                        {
                            info!(
                                scanned = report.scanned,
                                evicted = report.evicted_count(),
                                failed = report.failed.len(),
                                staging_removed = report.staging_removed,
                                "Removed old files in temporary downloads folder"
                            );
                        }
                        Ok(report) => {
                            debug!(scanned = report.scanned, "Sweep found nothing to evict");
                        }
                        Err(e) => {
                            error!(error = %e, "Sweep failed to list artifacts");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Eviction sweeper stopped");
    }
}

/// Stop handle for a spawned sweeper.
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    stats: Arc<SweeperStats>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait for the task to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "Eviction sweeper task panicked");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stats(&self) -> Arc<SweeperStats> {
        Arc::clone(&self.stats)
    }
}
