mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{debug, info};

use pokedex::config::DEFAULT_TIMEOUT_SECS;
use pokedex::{logging, source_for, CatalogLocation, FetchConfig, SharedContext};

/// Browse and search the pokemon catalog in the terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex", version)]
struct Args {
    /// Absolute URL of the catalog document
    #[arg(long, env = "POKEDEX_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Read the catalog from a local file instead of over HTTP
    #[arg(long, env = "POKEDEX_CATALOG_FILE", conflicts_with = "catalog_url")]
    catalog_file: Option<PathBuf>,

    /// Give up on the catalog fetch after this many seconds
    #[arg(
        long,
        env = "POKEDEX_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long, env = "POKEDEX_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        logging::init_file_logging(path, args.verbose)?;
    }

    let location = CatalogLocation::from_options(args.catalog_url, args.catalog_file);
    let config = FetchConfig::with_timeout_secs(args.timeout_secs);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let mut ctx = SharedContext::default();
    let (tx, rx) = oneshot::channel();

    // The session's single catalog fetch runs in the background; the UI
    // shows the loading state until the result arrives.
    if ctx.begin_load() {
        match source_for(&location, config) {
            Ok(source) => {
                info!(source = %location, "loading catalog");
                runtime.spawn(async move {
                    let result = source.fetch().await;
                    if tx.send(result).is_err() {
                        debug!("client session closed; discarding catalog result");
                    }
                });
            }
            Err(e) => {
                if tx.send(Err(e)).is_err() {
                    debug!("client session closed; discarding catalog error");
                }
            }
        }
    }

    let mut app = ui::App::new(ctx, location.to_string());
    ui::run_ui(&mut app, rx)?;

    runtime.shutdown_background();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_and_rejects_zero() {
        let args = Args::try_parse_from(["pokedex"]).unwrap();
        assert_eq!(args.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let args = Args::try_parse_from(["pokedex", "--timeout-secs", "3"]).unwrap();
        assert_eq!(args.timeout_secs, 3);

        assert!(Args::try_parse_from(["pokedex", "--timeout-secs", "0"]).is_err());
    }
}
