//! Writes a starter configuration file.
//!
//! The file gets the built-in defaults and a freshly generated API key. An
//! existing file is left alone unless `--force` is given.

use crate::{
    libs::{config::Config, messages::Message},
    msg_bail_anyhow, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::path::PathBuf;

pub const GENERATED_KEY_LEN: usize = 40;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    force: bool,

    /// Where to write the file instead of the default location
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn generate_api_key() -> String {
    rand::rng().sample_iter(&Alphanumeric).take(GENERATED_KEY_LEN).map(char::from).collect()
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let path = match init_args.output {
        Some(path) => path,
        None => Config::config_path()?,
    };

    if path.exists() && !init_args.force {
        msg_bail_anyhow!(Message::ConfigFileExists(path.display().to_string()));
    }

    let mut config = Config::default();
    config.server.api_key = Some(generate_api_key());
    config.save(&path)?;

    msg_success!(Message::ConfigSaved(path.display().to_string()));
    msg_print!(format!("API key: {}", config.server.api_key.unwrap_or_default()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_alphanumeric_and_distinct() {
        let first = generate_api_key();
        let second = generate_api_key();
        assert_eq!(first.len(), GENERATED_KEY_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
