// Logging - tracing subscriber setup shared by both binaries

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level implied by the number of `-v` flags
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` wins over the command-line verbosity
fn env_filter(verbose: u8) -> Result<EnvFilter> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(level_for(verbose))
            .add_directive("hyper=warn".parse()?)
            .add_directive("reqwest=warn".parse()?),
    };
    Ok(filter)
}

/// Log to stderr.
pub fn init_logging(verbose: u8) -> Result<()> {
    let debug = verbose >= 2;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug)
                .with_file(debug)
                .with_line_number(debug),
        )
        .with(env_filter(verbose)?)
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(())
}

/// Log to a file, appending. Used by the terminal client, whose screen owns stderr.
pub fn init_file_logging(path: &Path, verbose: u8) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(env_filter(verbose)?)
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(())
}
