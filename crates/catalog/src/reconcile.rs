//! Edit lifecycle for one matched product.
//!
//! ```text
//! Viewing --select--> Editing --update_field--> Editing
//!                       |  ^
//!              begin_save  | finish_save(Err)
//!                       v  |
//!                      Saving --finish_save(Ok)--> Viewing
//! ```
//!
//! The save is keyed by the barcode the product had when it was selected, never
//! by the row index (indices are view-relative) and never by the buffer's barcode
//! (the user may be editing it).

use barlo_core::{LookupError, LookupResult, Product, ProductField, ProductPatch, ViewKind};

use crate::matching::MatchEngine;
use crate::store::CatalogStore;

/// The product under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    origin: (ViewKind, usize),
    original_barcode: String,
    buffer: Product,
}

impl PendingEdit {
    /// View and row the product was selected from.
    pub fn origin(&self) -> (ViewKind, usize) {
        self.origin
    }

    /// Barcode at selection time; the save lookup key.
    pub fn original_barcode(&self) -> &str {
        &self.original_barcode
    }

    pub fn buffer(&self) -> &Product {
        &self.buffer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing(PendingEdit),
    Saving(PendingEdit),
}

/// What the persistence sink must be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub barcode: String,
    pub patch: ProductPatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReconciler {
    state: EditState,
}

impl EditReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, EditState::Saving(_))
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        match &self.state {
            EditState::Viewing => None,
            EditState::Editing(edit) | EditState::Saving(edit) => Some(edit),
        }
    }

    /// Current edit buffer (also while saving).
    pub fn buffer(&self) -> Option<&Product> {
        self.pending().map(PendingEdit::buffer)
    }

    /// Start editing row `index` of the `kind` view.
    ///
    /// Replaces any unsaved edit. Refused while a save is in flight.
    pub fn select(
        &mut self,
        kind: ViewKind,
        index: usize,
        engine: &MatchEngine,
    ) -> LookupResult<()> {
        if self.is_saving() {
            return Err(LookupError::SaveInProgress);
        }
        let product = engine
            .view(kind)
            .get(index)
            .ok_or_else(|| LookupError::row_not_found(kind, index))?;

        self.state = EditState::Editing(PendingEdit {
            origin: (kind, index),
            original_barcode: product.barcode.clone(),
            buffer: product.clone(),
        });
        Ok(())
    }

    /// Merge one field into the buffer. Any value is accepted.
    pub fn update_field(&mut self, field: ProductField, value: impl Into<String>) -> LookupResult<()> {
        match &mut self.state {
            EditState::Editing(edit) => {
                edit.buffer.set_field(field, value);
                Ok(())
            }
            EditState::Saving(_) => Err(LookupError::SaveInProgress),
            EditState::Viewing => Err(LookupError::NotEditing),
        }
    }

    /// Drop the edit buffer without saving.
    pub fn cancel(&mut self) -> LookupResult<()> {
        if self.is_saving() {
            return Err(LookupError::SaveInProgress);
        }
        self.state = EditState::Viewing;
        Ok(())
    }

    /// Editing → Saving. Returns the request for the persistence sink.
    pub fn begin_save(&mut self) -> LookupResult<SaveRequest> {
        let edit = match std::mem::take(&mut self.state) {
            EditState::Editing(edit) => edit,
            EditState::Saving(edit) => {
                self.state = EditState::Saving(edit);
                return Err(LookupError::SaveInProgress);
            }
            EditState::Viewing => return Err(LookupError::NotEditing),
        };

        let request = SaveRequest {
            barcode: edit.original_barcode.clone(),
            patch: ProductPatch::from(&edit.buffer),
        };
        self.state = EditState::Saving(edit);
        Ok(request)
    }

    /// Settle the in-flight save with the sink's answer.
    ///
    /// On success the patch lands in every store entry and every view entry that
    /// carries the original barcode, and the reconciler returns to Viewing; the
    /// number of store entries updated is returned. On failure nothing is written
    /// and the edit goes back to Editing with its buffer intact.
    pub fn finish_save(
        &mut self,
        result: LookupResult<()>,
        store: &mut CatalogStore,
        engine: &mut MatchEngine,
    ) -> LookupResult<usize> {
        let edit = match std::mem::take(&mut self.state) {
            EditState::Saving(edit) => edit,
            other => {
                self.state = other;
                return Err(LookupError::NotEditing);
            }
        };

        match result {
            Ok(()) => {
                let patch = ProductPatch::from(&edit.buffer);
                let updated = store.apply_patch(&edit.original_barcode, &patch);
                engine.apply_patch(&edit.original_barcode, &patch);
                Ok(updated)
            }
            Err(err) => {
                self.state = EditState::Editing(edit);
                Err(match err {
                    LookupError::SaveFailure(msg) => LookupError::SaveFailure(msg),
                    other => LookupError::save(other.to_string()),
                })
            }
        }
    }
}
