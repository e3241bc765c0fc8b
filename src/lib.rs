// Pokedex - Core Library
// Shared state and retrieval engine used by the terminal client and the web server

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod logging;
pub mod lookup;
pub mod record;
pub mod selection;
pub mod source;
pub mod ssr;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogStore, LoadState};
pub use config::{CatalogLocation, FetchConfig};
pub use context::SharedContext;
pub use error::{CatalogError, Result};
pub use filter::DISPLAY_CAP;
pub use lookup::{find_by_id, parse_id, ClientLookup};
pub use record::{Name, Record};
pub use selection::SelectionModel;
pub use source::{source_for, CatalogSource, FileSource, HttpSource};
pub use ssr::{server_side_props, Props, ServerSideProps};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
