//! Catalog sources and the raw-record adapter.
//!
//! Sources hand back loosely typed rows (string-keyed JSON objects). Key names
//! differ per source, so every row goes through a [`FieldMapping`] before it
//! becomes a [`Product`]; nothing past this module sees source key names.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use barlo_core::{LookupError, LookupResult, Product, ProductPatch};

/// One row as delivered by a catalog source.
pub type RawRecord = Map<String, Value>;

/// Price used when a row has no price field.
pub const DEFAULT_PRICE: &str = "0";

/// Source key names for the four logical product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub article: String,
    pub barcode: String,
    pub description: String,
    pub price: String,
}

impl FieldMapping {
    /// Key names of the exported spreadsheet document (`produkte.json`).
    pub fn document() -> Self {
        Self {
            article: "Artikel".to_string(),
            barcode: "Barcode".to_string(),
            description: "Beschreibung".to_string(),
            price: "Warenwert \npro Stk. [CHF]".to_string(),
        }
    }

    /// Column names of the hosted product table.
    pub fn table() -> Self {
        Self {
            article: "artikel".to_string(),
            barcode: "barcode".to_string(),
            description: "beschreibung".to_string(),
            price: "preis".to_string(),
        }
    }

    /// Map one raw row. Missing or null fields fall back to `""` (`"0"` for the
    /// price); numbers and booleans are coerced to their text form.
    pub fn map_record(&self, record: &RawRecord) -> Product {
        Product {
            article: text_field(record, &self.article).unwrap_or_default(),
            barcode: text_field(record, &self.barcode).unwrap_or_default(),
            description: text_field(record, &self.description).unwrap_or_default(),
            price: text_field(record, &self.price).unwrap_or_else(|| DEFAULT_PRICE.to_string()),
        }
    }

    /// Map rows in source order.
    pub fn map_records(&self, records: &[RawRecord]) -> Vec<Product> {
        records.iter().map(|r| self.map_record(r)).collect()
    }

    /// The reverse of [`FieldMapping::map_record`] for an update: the fields
    /// present in `patch`, under this source's key names.
    pub fn patch_record(&self, patch: &ProductPatch) -> RawRecord {
        let fields = [
            (&self.article, &patch.article),
            (&self.barcode, &patch.barcode),
            (&self.description, &patch.description),
            (&self.price, &patch.price),
        ];

        fields
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .map(|v| (key.clone(), Value::String(v.clone())))
            })
            .collect()
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::document()
    }
}

fn text_field(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Parse a static catalog document: a JSON array of objects.
pub fn parse_document(text: &str) -> LookupResult<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| LookupError::load(format!("catalog document is not valid JSON: {e}")))?;

    let Value::Array(rows) = value else {
        return Err(LookupError::load("catalog document is not an array"));
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(map) => Ok(map),
            _ => Err(LookupError::load(format!("catalog row {i} is not an object"))),
        })
        .collect()
}

/// Where the catalog comes from.
///
/// The fetch is the only suspension point of a load; implementations must not
/// touch session state.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch all rows, in source order.
    async fn fetch(&self) -> LookupResult<Vec<RawRecord>>;
}

/// Static JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonDocumentSource {
    path: PathBuf,
}

impl JsonDocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read catalog document at {:?}", self.path))
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonDocumentSource {
    async fn fetch(&self) -> LookupResult<Vec<RawRecord>> {
        let text = self
            .read()
            .await
            .map_err(|err| LookupError::load(format!("{err:#}")))?;
        parse_document(&text)
    }
}

/// In-memory rows (tests/dev), or a canned failure.
#[derive(Debug, Clone)]
pub struct StaticSource {
    rows: Result<Vec<RawRecord>, String>,
}

impl StaticSource {
    pub fn new(rows: Vec<RawRecord>) -> Self {
        Self { rows: Ok(rows) }
    }

    /// A source whose every fetch fails with `message`.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            rows: Err(message.into()),
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self) -> LookupResult<Vec<RawRecord>> {
        self.rows.clone().map_err(LookupError::load)
    }
}
