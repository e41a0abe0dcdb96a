use super::{configured_mailer, load_quotes, open_db};
use crate::libs::config::Config;
use crate::libs::digest::{build_digest, DigestKind};
use crate::libs::email::send_logged;
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Which digest to send: quotes, today or completed
    kind: DigestKind,
}

pub async fn cmd(args: DigestArgs) -> Result<()> {
    let config = Config::read()?;
    let (Some(mailer), Some(email)) = (configured_mailer(&config)?, config.email()) else {
        msg_bail_anyhow!(Message::EmailNotConfigured);
    };

    let db = open_db(&config)?;
    let quotes = load_quotes(&config, args.kind == DigestKind::Quotes).await;
    let message = build_digest(args.kind, &db, &quotes, &email.to_email, config.now())?;
    send_logged(mailer.as_ref(), &message).await
}
