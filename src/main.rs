use briefing::{app, commands, config, locale};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "briefing")]
#[command(about = "An offline-first news briefing in your terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/briefing/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Display language
  #[arg(short, long, value_enum)]
  locale: Option<locale::Locale>,

  /// Keep everything in memory instead of the on-disk store
  #[arg(long)]
  ephemeral: bool,

  /// Also log to stderr
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<commands::Command>,
}

/// Log to a daily file in the data directory, leaving stdout to the
/// briefing itself. Filter with BRIEFING_LOG (default `briefing=info`).
fn init_tracing(verbose: bool) -> Result<WorkerGuard> {
  let log_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("briefing")
    .join("logs");

  let (file_writer, guard) =
    tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "briefing.log"));

  let filter =
    EnvFilter::try_from_env("BRIEFING_LOG").unwrap_or_else(|_| EnvFilter::new("briefing=info"));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(file_writer).with_ansi(false))
    .with(verbose.then(|| fmt::layer().compact().with_writer(std::io::stderr)))
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_tracing(args.verbose)?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override locale if specified on command line
  let config = if let Some(locale) = args.locale {
    config::Config { locale, ..config }
  } else {
    config
  };

  let app = app::App::new(config, args.ephemeral)?;
  app.run(args.command.unwrap_or_default()).await?;

  Ok(())
}
