//! Lookup configuration (catalog source, key mapping, price display, scanner).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use barlo_core::{LookupError, LookupResult, PriceFormat};
use barlo_scanner::ScannerConfig;

use crate::source::FieldMapping;

pub const ENV_CATALOG_PATH: &str = "BARLO_CATALOG_PATH";
pub const ENV_CATALOG_SOURCE: &str = "BARLO_CATALOG_SOURCE";
pub const ENV_CURRENCY: &str = "BARLO_CURRENCY";

const DEFAULT_CATALOG_PATH: &str = "produkte.json";

/// Which kind of catalog source rows come from; selects the default key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Exported spreadsheet document.
    #[default]
    Document,
    /// Hosted product table.
    Table,
}

impl SourceKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "document" => Some(Self::Document),
            "table" => Some(Self::Table),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub source: SourceKind,
    pub catalog_path: PathBuf,
    /// Overrides the source kind's default key names.
    pub mapping: Option<FieldMapping>,
    pub price: PriceFormat,
    pub scanner: ScannerConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Document,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            mapping: None,
            price: PriceFormat::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Key mapping in effect: the explicit override, else the source preset.
    pub fn field_mapping(&self) -> FieldMapping {
        match (&self.mapping, self.source) {
            (Some(mapping), _) => mapping.clone(),
            (None, SourceKind::Document) => FieldMapping::document(),
            (None, SourceKind::Table) => FieldMapping::table(),
        }
    }

    pub fn from_json_str(text: &str) -> LookupResult<Self> {
        serde_json::from_str(text).map_err(|e| LookupError::config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> LookupResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lookup config at {:?}", path))
            .map_err(|err| LookupError::config(format!("{err:#}")))?;
        Self::from_json_str(&text)
    }

    /// Defaults overridden by `BARLO_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`LookupConfig::from_env`], reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        match var(ENV_CATALOG_PATH) {
            Some(path) if !path.trim().is_empty() => config.catalog_path = PathBuf::from(path),
            _ => tracing::warn!(
                "{ENV_CATALOG_PATH} not set; using {:?}",
                config.catalog_path
            ),
        }

        if let Some(raw) = var(ENV_CATALOG_SOURCE) {
            match SourceKind::parse(&raw) {
                Some(kind) => config.source = kind,
                None => tracing::warn!(
                    value = %raw,
                    "unknown {ENV_CATALOG_SOURCE}; expected `document` or `table`"
                ),
            }
        }

        if let Some(currency) = var(ENV_CURRENCY) {
            if !currency.trim().is_empty() {
                config.price.currency = currency.trim().to_string();
            }
        }

        config
    }
}
