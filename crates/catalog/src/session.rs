//! One mounted lookup component: store, match views, edit state and scanner.
//!
//! Everything runs on a single event loop. The catalog fetch and the sink call
//! are the only suspension points, so both are split into `begin_*` (take a
//! ticket) and `complete_*` (hand the ticket back with the response). A ticket
//! completed after [`LookupSession::teardown`], or superseded by a newer load, is
//! discarded without touching any state.

use barlo_core::{LookupError, LookupResult, PriceFormat, Product, ProductField, ViewKind};
use barlo_scanner::{BarcodeDetector, ScanBackend};

use crate::config::LookupConfig;
use crate::matching::MatchEngine;
use crate::reconcile::{EditReconciler, SaveRequest};
use crate::sink::PersistenceSink;
use crate::source::{CatalogSource, FieldMapping, RawRecord};
use crate::store::CatalogStore;

/// Outcome of completing a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    Applied(T),
    /// The session was torn down or the ticket superseded; nothing changed.
    Discarded,
}

impl<T> Completion<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Completion::Applied(v) => Some(v),
            Completion::Discarded => None,
        }
    }
}

/// An outstanding catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    epoch: u64,
}

/// An outstanding save; carries the request for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SaveTicket {
    request: SaveRequest,
}

impl SaveTicket {
    pub fn request(&self) -> &SaveRequest {
        &self.request
    }
}

pub struct LookupSession<B: ScanBackend> {
    store: CatalogStore,
    engine: MatchEngine,
    reconciler: EditReconciler,
    detector: BarcodeDetector<B>,
    mapping: FieldMapping,
    price_format: PriceFormat,
    load_epoch: u64,
    closed: bool,
}

impl<B: ScanBackend> LookupSession<B> {
    pub fn new(config: &LookupConfig, backend: B) -> Self {
        Self {
            store: CatalogStore::new(),
            engine: MatchEngine::new(),
            reconciler: EditReconciler::new(),
            detector: BarcodeDetector::new(backend, config.scanner.clone()),
            mapping: config.field_mapping(),
            price_format: config.price.clone(),
            load_epoch: 0,
            closed: false,
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn reconciler(&self) -> &EditReconciler {
        &self.reconciler
    }

    pub fn detector(&self) -> &BarcodeDetector<B> {
        &self.detector
    }

    /// Key names of the configured source; sink adapters map patches with it.
    pub fn field_mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Price of `product` as shown in the result lists.
    pub fn display_price(&self, product: &Product) -> String {
        self.price_format.format(&product.price)
    }

    // ---- loading ----

    /// Start a catalog fetch. A later `begin_load` supersedes this ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_epoch += 1;
        LoadTicket {
            epoch: self.load_epoch,
        }
    }

    /// Hand back the fetched rows.
    ///
    /// On success the store is replaced wholesale and both views re-derived from
    /// the current queries. On failure the store keeps its previous contents.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: LookupResult<Vec<RawRecord>>,
    ) -> LookupResult<Completion<usize>> {
        if self.closed || ticket.epoch != self.load_epoch {
            tracing::debug!(epoch = ticket.epoch, "discarding late catalog response");
            return Ok(Completion::Discarded);
        }

        let rows = match fetched {
            Ok(rows) => rows,
            Err(err) => {
                let err = match err {
                    LookupError::LoadFailure(msg) => LookupError::LoadFailure(msg),
                    other => LookupError::load(other.to_string()),
                };
                tracing::error!(kept = self.store.len(), "catalog load failed: {err}");
                return Err(err);
            }
        };

        let products = self.mapping.map_records(&rows);
        let count = products.len();
        self.store.replace(products);
        self.engine.refresh(&self.store);
        tracing::info!(products = count, "catalog loaded");
        Ok(Completion::Applied(count))
    }

    /// Fetch from `source` and complete the load.
    pub async fn load<S>(&mut self, source: &S) -> LookupResult<Completion<usize>>
    where
        S: CatalogSource + ?Sized,
    {
        let ticket = self.begin_load();
        let fetched = source.fetch().await;
        self.complete_load(ticket, fetched)
    }

    // ---- searching ----

    pub fn set_barcode_query(&mut self, query: &str) -> &[Product] {
        self.engine.set_barcode_query(query, &self.store)
    }

    pub fn set_article_query(&mut self, query: &str) -> &[Product] {
        self.engine.set_article_query(query, &self.store)
    }

    // ---- scanning ----

    pub fn activate_scanner(&mut self) -> LookupResult<u64> {
        if self.closed {
            return Err(LookupError::scanner("session is closed"));
        }
        self.detector.activate()
    }

    pub fn deactivate_scanner(&mut self) {
        self.detector.deactivate();
    }

    /// Feed a pending detection into the barcode query. Returns the code used.
    pub fn pump_scanner(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        let code = self.detector.poll()?;
        self.engine.set_barcode_query(&code, &self.store);
        Some(code)
    }

    // ---- editing ----

    pub fn select(&mut self, kind: ViewKind, index: usize) -> LookupResult<()> {
        self.reconciler.select(kind, index, &self.engine)
    }

    pub fn update_field(&mut self, field: ProductField, value: impl Into<String>) -> LookupResult<()> {
        self.reconciler.update_field(field, value)
    }

    pub fn cancel_edit(&mut self) -> LookupResult<()> {
        self.reconciler.cancel()
    }

    pub fn edit_buffer(&self) -> Option<&Product> {
        self.reconciler.buffer()
    }

    /// Start saving the product under edit.
    pub fn begin_save(&mut self) -> LookupResult<SaveTicket> {
        let request = self.reconciler.begin_save()?;
        tracing::info!(barcode = %request.barcode, "saving product");
        Ok(SaveTicket { request })
    }

    /// Hand back the sink's answer for `ticket`.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: LookupResult<()>,
    ) -> LookupResult<Completion<usize>> {
        if self.closed {
            tracing::debug!(barcode = %ticket.request.barcode, "discarding late save response");
            return Ok(Completion::Discarded);
        }

        match self
            .reconciler
            .finish_save(result, &mut self.store, &mut self.engine)
        {
            Ok(updated) => {
                tracing::info!(barcode = %ticket.request.barcode, updated, "product saved");
                Ok(Completion::Applied(updated))
            }
            Err(err) => {
                tracing::warn!(barcode = %ticket.request.barcode, "save rejected: {err}");
                Err(err)
            }
        }
    }

    /// Persist the edit through `sink` and complete the save.
    pub async fn save<K>(&mut self, sink: &K) -> LookupResult<Completion<usize>>
    where
        K: PersistenceSink + ?Sized,
    {
        let ticket = self.begin_save()?;
        let result = sink
            .update_by_barcode(&ticket.request.barcode, &ticket.request.patch)
            .await;
        self.complete_save(ticket, result)
    }

    // ---- lifecycle ----

    /// Unmount: stop the scanner and ignore every response still in flight.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.detector.teardown();
        tracing::debug!("lookup session torn down");
    }
}

impl<B: ScanBackend> Drop for LookupSession<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
