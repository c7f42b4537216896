//! FunLearn core: the persisted book library store, learning-progress
//! tracking and the (mock) artifact generation service.

pub mod config;
pub mod error;
pub mod file_size;
pub mod generation;
pub mod models;
pub mod quiz;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::{AppConfig, GenerationConfig, StorageConfig};
pub use error::{ExitCode, FunlearnError, Result};
pub use models::*;

pub use file_size::format_file_size;
pub use generation::{GenerationService, MockGenerationService};
pub use quiz::score_answers;
pub use stats::{Achievement, LibraryStats};
pub use storage::{JsonFileStorage, MemoryStorage, PersistedState, StateStorage};
pub use store::{BookStore, LibraryState};
