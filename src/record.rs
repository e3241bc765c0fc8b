// Record - one creature entry of the catalog
// Identity is the integer id assigned by the data source; everything else is display data.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// NAME
// ============================================================================

/// Localised display names. Only the english name is used for display and search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default, deserialize_with = "null_as_default")]
    pub english: String,
}

// ============================================================================
// RECORD
// ============================================================================

/// Catalog entry as delivered by the catalog resource.
///
/// Missing or null `name`, `type` or `base` decode to empty values so the
/// read path stays total. `id` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identity, assigned by the data source
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: Name,

    /// Category tags, usually one or two
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,

    /// Stat name -> value, in the order the source listed them
    #[serde(default, deserialize_with = "null_as_default")]
    pub base: IndexMap<String, i64>,
}

impl Record {
    pub fn new(id: i64, english: impl Into<String>) -> Self {
        Record {
            id,
            name: Name {
                english: english.into(),
            },
            types: Vec::new(),
            base: IndexMap::new(),
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stat(mut self, key: impl Into<String>, value: i64) -> Self {
        self.base.insert(key.into(), value);
        self
    }

    pub fn english_name(&self) -> &str {
        &self.name.english
    }

    /// Types joined the way the views print them: "Grass, Poison"
    pub fn type_label(&self) -> String {
        self.types.join(", ")
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

/// Explicit `null` decodes the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a catalog document (a JSON array of records).
pub fn decode_catalog(bytes: &[u8]) -> serde_json::Result<Vec<Record>> {
    serde_json::from_slice(bytes)
}
