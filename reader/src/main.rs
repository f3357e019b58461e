//! `reader` binary
//!
//! Mounts the router on a path against a live content API and prints the
//! resulting state.

use anyhow::{bail, Context};
use blogflux_reader::store::new_store_with_config;
use blogflux_reader::{
    mount, AppAction, ReaderConfig, ReaderEnvironment, RootAction, RootState, Router,
};
use blogflux_runtime::StoreConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "reader")]
#[command(about = "Load a blog page the way the reader app would", long_about = None)]
struct Cli {
    /// Path to mount, e.g. `/`, `/page/2/` or `/posts/42/`
    #[arg(default_value = "/")]
    path: String,

    /// Content API base URL
    #[arg(long, env = "BLOG_API_URL")]
    api_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Posts per page
    #[arg(long)]
    per_page: Option<u32>,

    /// How long to wait for the post list and for shutdown, in seconds
    #[arg(long, default_value_t = 30)]
    wait_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reader=info,blogflux_reader=info,blogflux_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    tracing::info!(api = %config.api_base_url, per_page = config.default_per_page, "Starting reader");

    let router = Router::blog();
    let navigation = router
        .navigate(&cli.path)
        .await
        .with_context(|| format!("cannot route {}", cli.path))?;
    println!("view:        {:?}", navigation.module.view);
    if let Some(chunk) = &navigation.module.chunk {
        println!("chunk:       {chunk}");
    }

    let environment = ReaderEnvironment::from_config(&config).context("cannot build HTTP client")?;
    let wait = Duration::from_secs(cli.wait_secs);
    let store = new_store_with_config(environment, StoreConfig::default().with_shutdown_timeout(wait));
    let mut actions = store.subscribe_actions();

    let params = mount(&store, &cli.path).await?;
    tracing::debug!(?params, "Mounted");

    let outcome = tokio::time::timeout(wait, async {
        loop {
            match actions.recv().await {
                Ok(RootAction::App(action @ (AppAction::ReceivePostList(_) | AppAction::PostListFailed { .. }))) => {
                    return Ok(action);
                },
                Ok(_) => {},
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Missed actions"),
                Err(RecvError::Closed) => bail!("store closed before the post list arrived"),
            }
        }
    })
    .await
    .context("timed out waiting for the post list")??;

    let state = store.state(RootState::clone).await;
    if let Some(id) = &state.article.post_id {
        println!("post id:     {id}");
    }
    println!("auto fetch:  {}", state.home.will_auto_fetch_posts);

    match outcome {
        AppAction::PostListFailed { error } => {
            store.shutdown_default().await?;
            bail!("post list request failed: {error}");
        },
        _ => {
            let posts = &state.app.posts;
            println!("total:       {}", posts.total);
            println!("total pages: {}", posts.total_pages);
            for post in posts.iter() {
                let date = post
                    .published_at
                    .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
                println!("  #{:<8} {date}  {}", post.id, post.title);
            }
        },
    }

    store.shutdown_default().await?;
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ReaderConfig> {
    let mut config = match &cli.config {
        Some(path) => ReaderConfig::from_file(path)?,
        None => ReaderConfig::from_env()?,
    };
    if let Some(url) = &cli.api_url {
        config.api_base_url.clone_from(url);
    }
    if let Some(per_page) = cli.per_page {
        config.default_per_page = per_page;
    }
    config.validate()?;
    Ok(config)
}
