use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::storage::{PersistedState, StateStorage};

/// In-process storage. Clones share the same slot, so a test can keep one
/// handle and inspect what the store wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<PersistedState>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with a snapshot, as if a previous session had saved it.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// The last saved snapshot, if any.
    pub fn snapshot(&self) -> Option<PersistedState> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PersistedState>> {
        // A panic while holding the guard cannot leave a half-written snapshot.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedState>> {
        Ok(self.lock().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self.lock() = Some(state.clone());
        Ok(())
    }
}
