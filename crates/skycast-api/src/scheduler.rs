//! Periodic report job.

use std::sync::Arc;
use std::time::Duration;

use skycast_store::{StoreResult, UserRepository};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::report::ReportDispatcher;

/// Result of one pass over the stored users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub users: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Sends every stored user a report once per period.
pub struct Scheduler {
    users: UserRepository,
    reports: Arc<ReportDispatcher>,
    period: Duration,
}

impl Scheduler {
    pub fn new(users: UserRepository, reports: Arc<ReportDispatcher>, period: Duration) -> Self {
        Self {
            users,
            reports,
            period,
        }
    }

    /// One pass: snapshot the users and dispatch to each in turn.
    ///
    /// A failure for one user does not stop the pass. Cancelling `shutdown`
    /// stops it before the next user; the report in flight still completes.
    pub async fn tick(&self, shutdown: &CancellationToken) -> StoreResult<TickSummary> {
        let users = self.users.list_users().await?;
        let mut summary = TickSummary {
            users: users.len(),
            ..TickSummary::default()
        };

        for user in &users {
            if shutdown.is_cancelled() {
                tracing::info!(
                    "Shutdown requested, skipping {} remaining reports",
                    summary.users - summary.delivered - summary.failed
                );
                break;
            }

            if self.reports.dispatch(user).await.delivered() {
                summary.delivered += 1;
            } else {
                summary.failed += 1;
            }
        }

        Ok(summary)
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// The first pass happens one full period after start.
    pub async fn run(self, shutdown: CancellationToken) {
        if self.period.is_zero() {
            tracing::warn!("Scheduler period is zero, not starting");
            return;
        }

        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!("Scheduler started, sending reports every {:?}", self.period);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            match self.tick(&shutdown).await {
                Ok(summary) => tracing::info!(
                    "Scheduled reports: {} users, {} delivered, {} failed",
                    summary.users,
                    summary.delivered,
                    summary.failed
                ),
                Err(e) => tracing::error!("Error listing users for scheduled reports: {}", e),
            }
        }

        tracing::info!("Scheduler stopped");
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
