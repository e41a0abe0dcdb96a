use super::open_db;
use crate::libs::config::Config;
use crate::libs::title::{configured_browser, sync_url_titles, TitleFetcher};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let config = Config::read()?;
    let db = open_db(&config)?;
    let fetcher = TitleFetcher::new(configured_browser(&config));
    sync_url_titles(&db, &fetcher).await?;
    Ok(())
}
