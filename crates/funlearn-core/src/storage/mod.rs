pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Book;

/// The durable record: the whole collection plus the focused book.
///
/// `current_book` is a full copy of the book as it was at save time. Readers
/// must resolve it by id against `books` rather than trust its contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub books: Vec<Book>,

    #[serde(default)]
    pub current_book: Option<Book>,
}

/// Storage boundary for the library snapshot.
///
/// Every save replaces the previous snapshot wholesale.
pub trait StateStorage {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>>;
    fn save(&self, state: &PersistedState) -> Result<()>;
}

impl<S: StateStorage + ?Sized> StateStorage for Box<S> {
    fn load(&self) -> Result<Option<PersistedState>> {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        (**self).save(state)
    }
}
