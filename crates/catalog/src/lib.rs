//! `barlo-catalog`
//!
//! **Responsibility:** the in-memory product catalog of a lookup session and
//! everything derived from it.
//!
//! This crate provides:
//! - The authoritative catalog store, replaced wholesale on each load
//! - Live barcode/article match views recomputed on every query change
//! - The edit reconciler that commits an edit to the sink, store and views
//! - Adapters for catalog sources and the persistence sink
//!
//! Transport to the hosted data service stays behind [`CatalogSource`] and
//! [`PersistenceSink`].

pub mod config;
pub mod matching;
pub mod reconcile;
pub mod session;
pub mod sink;
pub mod source;
pub mod store;

pub use config::{LookupConfig, SourceKind};
pub use matching::MatchEngine;
pub use reconcile::{EditReconciler, EditState, SaveRequest};
pub use session::{Completion, LoadTicket, LookupSession, SaveTicket};
pub use sink::{InMemorySink, PersistenceSink};
pub use source::{CatalogSource, FieldMapping, JsonDocumentSource, RawRecord, StaticSource};
pub use store::CatalogStore;
