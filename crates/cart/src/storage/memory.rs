//! In-memory snapshot store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocketshoes_core::Cart;

use super::{SnapshotStore, StoreError, decode, encode};

/// Snapshot store that keeps the encoded JSON in memory.
///
/// The snapshot goes through the same encoding as [`FileStore`](super::FileStore),
/// so tests observe exactly what would be persisted. Clones share the slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Slot>>,
}

#[derive(Default)]
struct Slot {
    raw: Option<String>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `raw` as its snapshot text.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        store.lock().raw = Some(raw.into());
        store
    }

    /// The persisted snapshot text, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        self.lock().raw.as_deref().map(decode).transpose()
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let raw = encode(cart)?;
        let mut slot = self.lock();
        if slot.fail_saves {
            return Err(StoreError::Io(std::io::Error::other("simulated write failure")));
        }
        slot.raw = Some(raw);
        slot.saves += 1;
        Ok(())
    }
}
