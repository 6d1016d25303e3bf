use life_the_game::{
    config::{Config, LogConfig},
    draw,
};

use anyhow::Context;
use clap::Parser;
use std::{fs::File, path::PathBuf, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "life.toml")]
    config: PathBuf,

    /// Free-running step interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Write logs to this file
    #[arg(short, long)]
    log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(ms) = args.interval {
        config.timing.step_interval_ms = ms;
    }
    if args.log.is_some() {
        config.log.file = args.log;
    }
    config.validate()?;

    init_logging(&config.log)?;
    draw::run(&config).context("terminal session failed")?;
    Ok(())
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let Some(path) = &log.file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
