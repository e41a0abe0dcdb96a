//! Daily background jobs.
//!
//! Times are wall-clock times in the configured UTC offset. The scheduler is a
//! `clokwerk` async scheduler polled from a tokio task; every run is spawned so
//! a slow job never delays the next tick.

use crate::db::db::SharedDb;
use crate::db::request_logs::RequestLogs;
use crate::libs::backup::backup_tasks;
use crate::libs::config::Config;
use crate::libs::digest::{build_digest, DigestKind};
use crate::libs::email::{send_logged, Mailer};
use crate::libs::messages::Message;
use crate::libs::quotes::QuoteBook;
use crate::libs::title::{sync_url_titles, TitleFetcher};
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;
use clokwerk::{AsyncScheduler, Job, TimeUnits};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledJob {
    TruncateRequestLogs,
    Backup,
    QuotesDigest,
    TodayDigest,
    CompletedDigest,
    SyncUrlTitles,
}

impl ScheduledJob {
    pub fn name(&self) -> &'static str {
        match self {
            ScheduledJob::TruncateRequestLogs => "truncate request logs",
            ScheduledJob::Backup => "email backup",
            ScheduledJob::QuotesDigest => "quotes of the day",
            ScheduledJob::TodayDigest => "today's tasks",
            ScheduledJob::CompletedDigest => "completed today",
            ScheduledJob::SyncUrlTitles => "sync url titles",
        }
    }

    fn needs_email(&self) -> bool {
        matches!(
            self,
            ScheduledJob::Backup | ScheduledJob::QuotesDigest | ScheduledJob::TodayDigest | ScheduledJob::CompletedDigest
        )
    }
}

/// `(HH:MM, job)` pairs run every day.
pub fn daily_schedule(config: &Config) -> Vec<(&'static str, ScheduledJob)> {
    let mut schedule = vec![
        ("02:00", ScheduledJob::TruncateRequestLogs),
        ("03:00", ScheduledJob::Backup),
        ("07:00", ScheduledJob::QuotesDigest),
        ("07:00", ScheduledJob::TodayDigest),
        ("09:00", ScheduledJob::QuotesDigest),
        ("22:00", ScheduledJob::CompletedDigest),
    ];
    if config.schedule.sync_url_titles {
        schedule.push(("00:00", ScheduledJob::SyncUrlTitles));
    }
    schedule
}

/// Everything a job needs, cheap to clone into each run.
#[derive(Clone)]
pub struct JobContext {
    pub db: SharedDb,
    pub config: Arc<Config>,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub quotes: Arc<QuoteBook>,
    pub fetcher: Arc<TitleFetcher>,
}

impl JobContext {
    /// Runs one job. Email jobs are skipped when no mailer is configured.
    pub async fn run(&self, job: ScheduledJob) -> Result<()> {
        msg_info!(Message::JobStarted(job.name().to_string()));

        let mailer = match (&self.mailer, self.config.email()) {
            (Some(mailer), Some(email)) => Some((mailer.clone(), email.clone())),
            _ => None,
        };
        if job.needs_email() && mailer.is_none() {
            msg_warning!(Message::JobSkipped(job.name().to_string()));
            return Ok(());
        }

        let now = self.config.now();
        match (job, mailer) {
            (ScheduledJob::TruncateRequestLogs, _) => {
                let removed = {
                    let db = self.db.lock();
                    RequestLogs::new(&db.conn).truncate()?
                };
                msg_info!(Message::RequestLogsTruncated(removed));
            }
            (ScheduledJob::SyncUrlTitles, _) => {
                sync_url_titles(&self.db, &self.fetcher).await?;
            }
            (ScheduledJob::Backup, Some((mailer, email))) => {
                backup_tasks(&self.db, mailer.as_ref(), &email, now).await?;
            }
            (digest, Some((mailer, email))) => {
                let kind = match digest {
                    ScheduledJob::QuotesDigest => DigestKind::Quotes,
                    ScheduledJob::TodayDigest => DigestKind::Today,
                    _ => DigestKind::Completed,
                };
                let message = build_digest(kind, &self.db, &self.quotes, &email.to_email, now)?;
                send_logged(mailer.as_ref(), &message).await?;
            }
            (_, None) => {}
        }

        Ok(())
    }

    async fn run_logged(self, job: ScheduledJob) {
        if let Err(e) = self.run(job).await {
            msg_error!(Message::JobFailed(job.name().to_string(), e.to_string()));
        }
    }
}

/// Registers the daily jobs and polls them forever on the current runtime.
pub fn spawn_scheduler(ctx: JobContext) -> tokio::task::JoinHandle<()> {
    let offset = ctx.config.offset();
    let mut scheduler = AsyncScheduler::with_tz(offset);

    for (at, job) in daily_schedule(&ctx.config) {
        let ctx = ctx.clone();
        scheduler.every(1.day()).at(at).run(move || {
            let ctx = ctx.clone();
            async move {
                tokio::spawn(ctx.run_logged(job));
            }
        });
    }

    msg_info!(Message::SchedulerStarted(offset.to_string()));

    tokio::spawn(async move {
        loop {
            scheduler.run_pending().await;
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    })
}
