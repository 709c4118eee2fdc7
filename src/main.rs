//! Downloads every comic in the `xkcd.com` archive into a local directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::{EnvFilter, fmt};
use xkcd::archive::{
    Client, ImageErrorPolicy,
    client::{DEFAULT_BASE_URL, DEFAULT_CONCURRENCY},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to save the comics in. Must already exist.
    #[arg(short, long, env = "XKCD_DIR", default_value = "xkcd")]
    dir: PathBuf,

    /// How many comics to download at the same time.
    #[arg(short, long, env = "XKCD_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Host serving the `info.0.json` metadata.
    #[arg(long, env = "XKCD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout, in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Custom `User-Agent` header.
    #[arg(long)]
    user_agent: Option<String>,

    /// Fail the whole run if any image fails, instead of skipping that comic.
    #[arg(long)]
    abort_on_image_error: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("xkcd=info".parse()?))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let mut builder = Client::builder()
        .base_url(&cli.base_url)
        .concurrency(cli.concurrency);

    if let Some(timeout) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(timeout));
    }

    if let Some(user_agent) = &cli.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if cli.abort_on_image_error {
        builder = builder.on_image_error(ImageErrorPolicy::Abort);
    }

    let client = builder.build().context("failed to build client")?;

    let report = client.download_all(&cli.dir).await?;

    // Releases the connection pool.
    drop(client);

    println!(
        "saved {} of {} comics to `{}` ({} skipped)",
        report.saved().len(),
        report.latest(),
        cli.dir.display(),
        report.skipped().len()
    );

    Ok(())
}
