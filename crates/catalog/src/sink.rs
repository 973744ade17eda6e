//! Persistence sink abstraction (hosted product table).

use std::sync::Mutex;

use barlo_core::{LookupError, LookupResult, ProductPatch};

/// Accepts product updates keyed by exact barcode equality.
///
/// No batching, no transactions: one call per committed edit. A rejection carries
/// the service's message as [`LookupError::SaveFailure`].
#[async_trait::async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn update_by_barcode(&self, barcode: &str, patch: &ProductPatch) -> LookupResult<()>;
}

/// In-memory sink for tests/dev.
///
/// Records every accepted update; can be switched to reject with a message.
#[derive(Debug, Default)]
pub struct InMemorySink {
    accepted: Mutex<Vec<(String, ProductPatch)>>,
    reject_with: Mutex<Option<String>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject subsequent updates with `message` (`None` accepts again).
    pub fn set_rejection(&self, message: Option<String>) {
        if let Ok(mut guard) = self.reject_with.lock() {
            *guard = message;
        }
    }

    /// Updates accepted so far, oldest first.
    pub fn accepted(&self) -> Vec<(String, ProductPatch)> {
        match self.accepted.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => vec![],
        }
    }
}

#[async_trait::async_trait]
impl PersistenceSink for InMemorySink {
    async fn update_by_barcode(&self, barcode: &str, patch: &ProductPatch) -> LookupResult<()> {
        let rejection = self
            .reject_with
            .lock()
            .map_err(|_| LookupError::save("sink lock poisoned"))?
            .clone();
        if let Some(message) = rejection {
            return Err(LookupError::save(message));
        }

        self.accepted
            .lock()
            .map_err(|_| LookupError::save("sink lock poisoned"))?
            .push((barcode.to_string(), patch.clone()));
        Ok(())
    }
}
