use crate::libs::config::Config;
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    println!("{}", serde_json::to_string_pretty(&config.masked())?);
    println!("\nConfig file: {}", Config::config_path()?.display());
    Ok(())
}
