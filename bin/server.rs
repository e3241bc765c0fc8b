// Pokedex - Web Server
// Serves the catalog document and server-rendered detail pages

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use pokedex::config::{CATALOG_FILE_NAME, DEFAULT_BIND, DEFAULT_TIMEOUT_SECS};
use pokedex::server::{build_router, AppState};
use pokedex::{logging, source_for, CatalogLocation, FetchConfig};

/// Serve the pokemon catalog and its server-rendered detail pages
#[derive(Parser, Debug)]
#[command(name = "pokedex-server", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "POKEDEX_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Directory holding pokemon.json
    #[arg(long, env = "POKEDEX_DATA_DIR", default_value = "public")]
    data_dir: PathBuf,

    /// Absolute URL the detail pages fetch the catalog from, on every request
    #[arg(long, env = "POKEDEX_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Fetch the catalog for detail pages from a local file instead
    #[arg(long, env = "POKEDEX_CATALOG_FILE", conflicts_with = "catalog_url")]
    catalog_file: Option<PathBuf>,

    /// Give up on one catalog fetch after this many seconds
    #[arg(
        long,
        env = "POKEDEX_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Startup events are worth seeing without -v
    logging::init_logging(args.verbose.max(1))?;

    let catalog_path = args.data_dir.join(CATALOG_FILE_NAME);
    if !catalog_path.exists() {
        tracing::warn!(path = %catalog_path.display(), "catalog document not found; /{} will 404", CATALOG_FILE_NAME);
    }

    let location = CatalogLocation::from_options(args.catalog_url, args.catalog_file);
    let source = source_for(&location, FetchConfig::with_timeout_secs(args.timeout_secs))
        .context("building catalog source")?;

    let app = build_router(AppState::new(source), &args.data_dir);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;

    info!(version = pokedex::VERSION, bind = %args.bind, "server running");
    info!(catalog = %catalog_path.display(), "serving /{}", CATALOG_FILE_NAME);
    info!(source = %location, "detail pages fetch the catalog per request");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
