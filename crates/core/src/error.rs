//! Lookup error model.

use thiserror::Error;

use crate::product::ViewKind;

/// Result type used across the lookup crates.
pub type LookupResult<T> = Result<T, LookupError>;

/// Lookup-level error.
///
/// Every variant is locally recoverable: a failed load leaves the catalog as it
/// was, a failed save leaves the edit in progress. Nothing here ends a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The catalog source could not be fetched or returned malformed data.
    #[error("catalog load failed: {0}")]
    LoadFailure(String),

    /// A price could not be parsed as a decimal number.
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    /// The persistence sink rejected an update.
    #[error("save failed: {0}")]
    SaveFailure(String),

    /// A field update or save was requested with no product under edit.
    #[error("no product is being edited")]
    NotEditing,

    /// A save for the product under edit has not completed yet.
    #[error("a save is already in progress")]
    SaveInProgress,

    /// The selected row does not exist in the given view.
    #[error("no row {index} in {view} matches")]
    RowNotFound { view: ViewKind, index: usize },

    /// The barcode scanner backend failed.
    #[error("scanner error: {0}")]
    Scanner(String),

    /// Configuration could not be read.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LookupError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::LoadFailure(msg.into())
    }

    pub fn invalid_price(raw: impl Into<String>) -> Self {
        Self::InvalidPrice(raw.into())
    }

    pub fn save(msg: impl Into<String>) -> Self {
        Self::SaveFailure(msg.into())
    }

    pub fn row_not_found(view: ViewKind, index: usize) -> Self {
        Self::RowNotFound { view, index }
    }

    pub fn scanner(msg: impl Into<String>) -> Self {
        Self::Scanner(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
