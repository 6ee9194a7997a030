//! Cron plugin: fixed-interval background jobs on the tokio runtime.

use crate::lifecycle::BoxFuture;
use crate::logging::Logger;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type JobFn = Arc<dyn Fn() -> BoxFuture<()> + Send + Sync>;

/// One scheduled job.
#[derive(Clone)]
pub struct CronJob {
    pub name: String,
    pub every: Duration,
    task: JobFn,
}

impl CronJob {
    pub fn new<F, Fut>(name: impl Into<String>, every: Duration, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            name: name.into(),
            every,
            task: Arc::new(move || Box::pin(f())),
        }
    }
}

/// Configuration for the cron plugin.
#[derive(Clone, Default)]
pub struct CronConfig {
    pub jobs: Vec<CronJob>,
}

impl CronConfig {
    pub fn job(mut self, job: CronJob) -> Self {
        self.jobs.push(job);
        self
    }
}

/// Spawn every job as a detached interval task. The returned handles
/// are retained by the factory so `reset` can abort them.
pub(crate) fn spawn_jobs(config: &CronConfig, logger: &Logger) -> Vec<JoinHandle<()>> {
    config
        .jobs
        .iter()
        .map(|job| {
            let task = Arc::clone(&job.task);
            let name = job.name.clone();
            let every = job.every;
            logger.info(&format!("Scheduling cron job '{}' every {:?}", name, every));
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(every);
                // The first tick completes immediately; skip it so the
                // job first runs one full period after scheduling.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    tracing::debug!("Running cron job '{}'", name);
                    task().await;
                }
            })
        })
        .collect()
}
