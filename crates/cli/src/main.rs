mod echo;
mod jobs;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use retexo_core::{ExtractorConfig, MergeConfig, StoreClient, StoreConfig, Updater};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rewrite content store posts from extracted web articles
#[derive(Parser, Debug)]
#[command(name = "retexo")]
#[command(author = "Retexo Contributors")]
#[command(version = VERSION)]
#[command(about = "Rewrite content store posts from extracted web articles", long_about = None)]
struct Args {
    /// Target post URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Jobs file with one configuration per line
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Source article URL (copy mode)
    #[arg(long, value_name = "URL")]
    source_url: Option<String>,

    /// Copy content from the source URL into the target post
    #[arg(long)]
    copy_mode: bool,

    /// Start copying source content from this keyword
    #[arg(long, value_name = "KEYWORD")]
    start_keyword: Option<String>,

    /// Preview the change without updating the store
    #[arg(long)]
    dry_run: bool,

    /// Show post info without updating anything
    #[arg(long)]
    info: bool,

    /// Append target images at the end instead of interleaving
    #[arg(long)]
    no_interleave: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Checks the argument combinations the parser alone cannot express.
fn validate_args(args: &Args) -> Result<(), String> {
    if args.url.is_none() && args.file.is_none() {
        return Err("either --url or --file is required".to_string());
    }
    if args.url.is_some() && args.file.is_some() {
        return Err("--url and --file cannot be combined".to_string());
    }
    if args.copy_mode && args.source_url.is_none() {
        return Err("--copy-mode requires --source-url".to_string());
    }
    if args.copy_mode && args.file.is_some() {
        return Err("--copy-mode works on a single --url, not a jobs file".to_string());
    }
    if args.source_url.is_some() && !args.copy_mode {
        return Err("--source-url requires --copy-mode".to_string());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "retexo_core=debug,retexo=debug" } else { "retexo_core=info,retexo=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(message) = validate_args(&args) {
        echo::print_error(&message);
        anyhow::bail!(message);
    }

    init_logging(args.verbose);

    if args.verbose {
        echo::print_banner();
    }

    let store_config = StoreConfig::from_env().context("store configuration incomplete")?;
    let store = StoreClient::new(store_config)?;

    if args.verbose {
        echo::print_step(1, 2, "Checking content store connection");
    }
    if !store.test_connection().await {
        echo::print_error("cannot connect to the content store");
        anyhow::bail!("cannot connect to the content store");
    }

    let merge_config = MergeConfig { interleave_images: !args.no_interleave, ..Default::default() };
    let updater = Updater::with_configs(store, ExtractorConfig::default(), merge_config);

    if args.verbose {
        echo::print_step(2, 2, "Running");
    }

    if let Some(url) = &args.url {
        if args.info {
            let info = updater.post_info(url).await.context("failed to fetch post info")?;
            echo::print_post_info(&info);
        } else if args.copy_mode {
            let source_url = args.source_url.as_deref().unwrap_or_default();
            updater
                .copy_into_post(url, source_url, args.start_keyword.as_deref(), args.dry_run)
                .await
                .context("content copy failed")?;
            echo::print_success(&format!("copied content from {} into {}", source_url, url));
        } else {
            updater
                .strip_post(url, args.dry_run)
                .await
                .context("post update failed")?;
            echo::print_success(&format!("stripped text from {}", url));
        }
    } else if let Some(file) = &args.file {
        let job_list = jobs::load_jobs(file)?;
        echo::print_info(&format!("loaded {} job(s) from {}", job_list.len(), file.display()));

        let report = updater.run_jobs(&job_list, args.dry_run).await;
        echo::print_batch_summary(&report);

        if report.failed > 0 {
            anyhow::bail!("{} job(s) failed", report.failed);
        }
    }

    if args.dry_run {
        echo::print_info("dry run: the content store was not modified");
    }

    Ok(())
}
