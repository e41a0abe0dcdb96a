pub mod backup;
pub mod config;
pub mod digest;
pub mod init;
pub mod migrations;
pub mod quotes;
pub mod serve;
pub mod sync_titles;

use crate::api::Notion;
use crate::db::db::{Db, SharedDb};
use crate::libs::config::Config;
use crate::libs::email::{Mailer, SmtpMailer};
use crate::libs::messages::Message;
use crate::libs::quotes::QuoteBook;
use crate::{msg_debug, msg_info, msg_warning};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server and the daily jobs")]
    Serve(serve::ServeArgs),
    #[command(about = "Write a starter configuration file")]
    Init(init::InitArgs),
    #[command(about = "Print the effective configuration with secrets masked")]
    Config,
    #[command(about = "Inspect database migrations", arg_required_else_help = true)]
    Migrations(migrations::MigrationsArgs),
    #[command(about = "Export all tasks as CSV, to a file or by email")]
    Backup(backup::BackupArgs),
    #[command(about = "Send one of the daily digest emails now")]
    Digest(digest::DigestArgs),
    #[command(about = "Print quotes from the quote book")]
    Quotes(quotes::QuotesArgs),
    #[command(about = "Re-fetch page titles that are missing or failed earlier")]
    SyncTitles,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::Init(args) => init::cmd(args),
            Commands::Config => config::cmd(),
            Commands::Migrations(args) => migrations::cmd(args),
            Commands::Backup(args) => backup::cmd(args).await,
            Commands::Digest(args) => digest::cmd(args).await,
            Commands::Quotes(args) => quotes::cmd(args).await,
            Commands::SyncTitles => sync_titles::cmd().await,
        }
    }
}

/// Opens the configured database, applying pending migrations.
pub(crate) fn open_db(config: &Config) -> Result<SharedDb> {
    let path = config.database_path()?;
    let db = Db::open(&path)?;
    msg_debug!(Message::DatabaseOpened(path.display().to_string()));
    Ok(db.shared())
}

/// Built-in quotes, extended from Notion when asked and configured.
///
/// A failing Notion request is logged and leaves the built-in book.
pub(crate) async fn load_quotes(config: &Config, with_notion: bool) -> QuoteBook {
    let mut book = QuoteBook::builtin();
    if !with_notion {
        return book;
    }

    let Some(notion) = &config.notion else {
        msg_debug!(Message::NotionNotConfigured);
        return book;
    };

    match Notion::new(notion).fetch_quotes().await {
        Ok(quotes) => {
            let added = book.extend(quotes);
            msg_info!(Message::QuotesLoadedFromNotion(added));
        }
        Err(e) => msg_warning!(Message::NotionFetchFailed(e.to_string())),
    }
    book
}

/// SMTP mailer when email settings are complete.
pub(crate) fn configured_mailer(config: &Config) -> Result<Option<Arc<dyn Mailer>>> {
    match config.email() {
        Some(email) => Ok(Some(Arc::new(SmtpMailer::new(email)?))),
        None => Ok(None),
    }
}
