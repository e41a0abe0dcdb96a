use super::{configured_mailer, open_db};
use crate::libs::backup::{backup_tasks, write_backup};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Write the CSV to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Mail the CSV to the configured recipient (the default without --output)
    #[arg(short, long)]
    email: bool,
}

pub async fn cmd(args: BackupArgs) -> Result<()> {
    let config = Config::read()?;
    let db = open_db(&config)?;

    if let Some(path) = &args.output {
        let db = db.lock();
        write_backup(&db, path)?;
    }

    if args.email || args.output.is_none() {
        let (Some(mailer), Some(email)) = (configured_mailer(&config)?, config.email()) else {
            msg_bail_anyhow!(Message::EmailNotConfigured);
        };
        backup_tasks(&db, mailer.as_ref(), email, config.now()).await?;
    }

    Ok(())
}
