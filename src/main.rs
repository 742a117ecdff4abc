// file: src/main.rs
// description: commandline entry point, startup pass and weekly scheduling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use gitea_mirror::{Config, MirrorSync, Scheduler};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "gitea_mirror")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Mirror GitHub repositories into Gitea every week", long_about = None)]
struct Cli {
    /// Optional TOML file; environment variables override its values
    #[arg(short, long, value_name = "FILE", env = "GITEA_MIRROR_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Run a single pass and exit instead of scheduling
    #[arg(long, action = ArgAction::SetTrue)]
    once: bool,

    /// Resolve and list everything but do not create mirrors
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    gitea_mirror::utils::logging::init_logger(cli.color, cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.dry_run |= cli.dry_run;

    info!(
        "Mirroring repositories of {} into {}",
        config.source.username, config.mirror.base_url
    );

    let sync = MirrorSync::from_config(&config).context("Failed to create API clients")?;

    if cli.once {
        sync.run().await.context("Mirror pass failed")?;
        return Ok(());
    }

    if config.schedule.run_on_start {
        info!("Syncing once now...");
        tokio::select! {
            result = sync.run() => {
                result.context("Initial mirror pass failed")?;
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted during initial mirror pass");
                info!("Scheduler stopped.");
                return Ok(());
            }
        }
    }

    Scheduler::new(&config.schedule).run(&sync).await;
    Ok(())
}
