// Server-side props - per-request catalog fetch and lookup
//
// Each call fetches the whole catalog from its source and runs the same
// `find_by_id` the client uses. Nothing is shared between requests, so a
// request never sees another request's (or a client session's) state.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::lookup::{find_by_id, parse_id};
use crate::record::Record;
use crate::source::CatalogSource;

/// Data handed to the render step of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Props {
    /// Resolved record; omitted when the id matched nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currpokemon: Option<Record>,
}

/// Envelope returned by the server-rendering entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSideProps {
    pub props: Props,

    /// Set when the catalog could not be fetched, so "not found" and
    /// "fetch failed" stay distinguishable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerSideProps {
    pub fn record(&self) -> Option<&Record> {
        self.props.currpokemon.as_ref()
    }
}

/// Resolve the record for the raw `id` route parameter.
///
/// A fetch failure yields absent props plus an error note; it is never
/// propagated, so the page still renders.
pub async fn server_side_props(source: &dyn CatalogSource, raw_id: &str) -> ServerSideProps {
    let Some(id) = parse_id(raw_id) else {
        debug!(raw_id, "detail id is not an integer");
        return ServerSideProps::default();
    };

    match source.fetch().await {
        Ok(records) => {
            let currpokemon = find_by_id(&records, id).cloned();
            debug!(id, found = currpokemon.is_some(), "server lookup");
            ServerSideProps {
                props: Props { currpokemon },
                error: None,
            }
        }
        Err(e) => {
            warn!(id, source = %source.describe(), error = %e, "catalog fetch failed for server lookup");
            ServerSideProps {
                props: Props::default(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MemorySource {
        records: Vec<Record>,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for MemorySource {
        async fn fetch(&self) -> Result<Vec<Record>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl CatalogSource for BrokenSource {
        async fn fetch(&self) -> Result<Vec<Record>> {
            Err(CatalogError::Status {
                url: "http://localhost:3000/pokemon.json".to_string(),
                status: 404,
            })
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn source() -> MemorySource {
        MemorySource {
            records: vec![
                Record::new(1, "Bulbasaur").with_types(["Grass", "Poison"]).with_stat("HP", 45),
                Record::new(2, "Ivysaur").with_types(["Grass", "Poison"]).with_stat("HP", 60),
            ],
            fetches: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_found() {
        let props = server_side_props(&source(), "2").await;
        assert_eq!(props.record().map(Record::english_name), Some("Ivysaur"));
        assert!(props.error.is_none());
    }

    #[tokio::test]
    async fn test_not_found_and_bad_id() {
        assert!(server_side_props(&source(), "999").await.record().is_none());

        let src = source();
        let props = server_side_props(&src, "bulbasaur").await;
        assert_eq!(props, ServerSideProps::default());
        assert_eq!(src.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetches_on_every_request() {
        let src = source();
        server_side_props(&src, "1").await;
        server_side_props(&src, "1").await;
        server_side_props(&src, "2").await;
        assert_eq!(src.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_absent_with_error() {
        let props = server_side_props(&BrokenSource, "1").await;
        assert!(props.record().is_none());
        assert!(props.error.unwrap().contains("404"));
    }

    #[test]
    fn test_payload_shape() {
        let found = ServerSideProps {
            props: Props {
                currpokemon: Some(Record::new(1, "Bulbasaur").with_types(["Grass"]).with_stat("HP", 45)),
            },
            error: None,
        };
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["props"]["currpokemon"]["name"]["english"], "Bulbasaur");
        assert_eq!(json["props"]["currpokemon"]["type"][0], "Grass");
        assert_eq!(json["props"]["currpokemon"]["base"]["HP"], 45);
        assert!(json.get("error").is_none());

        let absent = serde_json::to_value(ServerSideProps::default()).unwrap();
        assert_eq!(absent, serde_json::json!({"props": {}}));
    }
}
