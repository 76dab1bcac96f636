use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::application::usecases::run_sweep::RunSweepUseCase;

/// In-process trigger for the scheduled sweep, for deployments without an
/// external cron hitting `POST /api/scheduled/run`.
pub struct SweepTicker {
    usecase: Arc<RunSweepUseCase>,
    period: Duration,
}

impl SweepTicker {
    pub fn new(usecase: Arc<RunSweepUseCase>, period: Duration) -> Self {
        Self { usecase, period }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        info!(period_secs = self.period.as_secs(), "scheduled sweep ticker started");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match self.usecase.execute().await {
                Ok(report) => debug!(?report, "scheduled sweep tick"),
                Err(err) => error!(error = ?err, "scheduled sweep failed"),
            }
        }
    }
}
