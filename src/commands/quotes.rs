use super::load_quotes;
use crate::libs::config::Config;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct QuotesArgs {
    /// Number of random quotes to print
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Include the quotes stored in Notion
    #[arg(short, long)]
    notion: bool,
}

pub async fn cmd(args: QuotesArgs) -> Result<()> {
    let config = Config::read()?;
    let book = load_quotes(&config, args.notion).await;

    for (idx, quote) in book.random(args.count).iter().enumerate() {
        println!("{}. {}\n", idx + 1, quote);
    }
    Ok(())
}
