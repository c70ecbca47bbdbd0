use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::import::read_posts;
use crate::infrastructure::services::PostService;

use super::open_client;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV sheet with the post column layout
    #[arg(long)]
    pub file: PathBuf,

    /// Account the posts belong to
    #[arg(long)]
    pub account: String,
}

pub async fn run(config: &AppConfig, args: ImportArgs) -> anyhow::Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let posts = read_posts(file)?;
    info!("Read {} posts from {}", posts.len(), args.file.display());

    let service = PostService::new(open_client(config).await?);

    let total = posts.len();
    let saved = service.import(&args.account, posts).await;

    for post in &saved {
        println!("{}", post.uuid);
    }

    if saved.len() < total {
        anyhow::bail!("{} of {} posts failed to import", total - saved.len(), total);
    }

    Ok(())
}
