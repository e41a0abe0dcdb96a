//! Runs the HTTP server, and the daily jobs unless disabled.

use super::{configured_mailer, load_quotes, open_db};
use crate::libs::config::Config;
use crate::libs::messages::macros::enable_structured_logging;
use crate::libs::scheduler::{spawn_scheduler, JobContext};
use crate::libs::title::{configured_browser, TitleFetcher};
use crate::server::{serve, AppState};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not start the daily email and maintenance jobs
    #[arg(long)]
    no_scheduler: bool,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    enable_structured_logging();

    let mut config = Config::read()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    let db = open_db(&config)?;
    let quotes = Arc::new(load_quotes(&config, true).await);
    let titles = Arc::new(TitleFetcher::new(configured_browser(&config)));
    let state = AppState::new(db.clone(), config.clone(), quotes.clone(), titles.clone())?;

    let scheduler = if config.schedule.enabled && !args.no_scheduler {
        let ctx = JobContext {
            db,
            config: config.clone(),
            mailer: configured_mailer(&config)?,
            quotes,
            fetcher: titles,
        };
        Some(spawn_scheduler(ctx))
    } else {
        None
    };

    let result = serve(state).await;
    if let Some(handle) = scheduler {
        handle.abort();
    }
    result
}
