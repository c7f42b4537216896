//! The book library store.
//!
//! [`BookStore`] owns the collection of books and the current-book reference,
//! and mirrors every successful change to its [`StateStorage`]. State is held
//! behind an `Arc` and updated copy-on-write, so a [`LibraryState`] handed out
//! by [`BookStore::snapshot`] never changes underneath its holder.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{FunlearnError, Result};
use crate::generation::canned;
use crate::models::{Artifact, Book, BookId, Feature, NewBook, QuizResult};
use crate::stats::LibraryStats;
use crate::storage::{PersistedState, StateStorage};

// ─── LibraryState ───────────────────────────────────────────

/// Immutable view of the library at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    books: Vec<Book>,
    current: Option<BookId>,
}

impl LibraryState {
    /// Books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn current_id(&self) -> Option<&BookId> {
        self.current.as_ref()
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn position(&self, id: &BookId) -> Option<usize> {
        self.books.iter().position(|b| &b.id == id)
    }

    fn to_persisted(&self) -> PersistedState {
        PersistedState {
            books: self.books.clone(),
            current_book: self.current_book().cloned(),
        }
    }

    /// Rebuild from a snapshot, enforcing unique ids and a current book
    /// that is actually in the collection.
    fn from_persisted(persisted: PersistedState) -> Self {
        let mut seen = HashSet::new();
        let mut books = Vec::with_capacity(persisted.books.len());
        for book in persisted.books {
            if seen.insert(book.id.clone()) {
                books.push(book);
            } else {
                warn!("dropping duplicate book id {} from snapshot", book.id);
            }
        }

        let current = persisted.current_book.and_then(|stale| {
            if seen.contains(&stale.id) {
                Some(stale.id)
            } else {
                warn!("current book {} is not in the collection, clearing it", stale.id);
                None
            }
        });

        Self { books, current }
    }
}

// ─── BookStore ──────────────────────────────────────────────

/// Persisted book collection with a single focused book.
///
/// Operations that target a book by id return [`FunlearnError::BookNotFound`]
/// when it is absent and leave both memory and storage untouched. When the
/// storage write fails the in-memory change is kept and the error returned;
/// the next successful save will include it.
#[derive(Debug)]
pub struct BookStore<S: StateStorage> {
    state: Arc<LibraryState>,
    storage: S,
}

impl<S: StateStorage> BookStore<S> {
    /// Load the last snapshot from `storage`, or start empty if there is none
    /// or it cannot be read.
    pub fn open(storage: S) -> Self {
        let state = match storage.load() {
            Ok(Some(persisted)) => {
                let state = LibraryState::from_persisted(persisted);
                info!("loaded library snapshot with {} books", state.len());
                state
            }
            Ok(None) => {
                debug!("no library snapshot found, starting empty");
                LibraryState::default()
            }
            Err(e) => {
                warn!("library snapshot unreadable, starting empty: {e}");
                LibraryState::default()
            }
        };

        Self {
            state: Arc::new(state),
            storage,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ─── Reads ──────────────────────────────────────────────

    /// Shared handle to the current state. Later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<LibraryState> {
        Arc::clone(&self.state)
    }

    pub fn books(&self) -> &[Book] {
        self.state.books()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.state.get(id)
    }

    pub fn current(&self) -> Option<&Book> {
        self.state.current_book()
    }

    /// Books whose title or author contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Book> {
        self.state.books.iter().filter(|b| b.matches(query)).collect()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_books(self.books())
    }

    // ─── Mutations ──────────────────────────────────────────

    /// Append a new book and make it the current one.
    pub fn add(&mut self, data: NewBook) -> Result<Book> {
        let book = Book::new(data);
        let state = Arc::make_mut(&mut self.state);
        state.current = Some(book.id.clone());
        state.books.push(book.clone());
        info!(id = %book.id, title = %book.title, "book added");
        self.persist()?;
        Ok(book)
    }

    /// Focus a book, or clear the focus with `None`.
    pub fn set_current(&mut self, id: Option<&BookId>) -> Result<Option<Book>> {
        let book = match id {
            Some(id) => Some(self.require(id)?.clone()),
            None => None,
        };
        Arc::make_mut(&mut self.state).current = id.cloned();
        self.persist()?;
        Ok(book)
    }

    /// Set a single progress flag.
    pub fn update_progress(&mut self, id: &BookId, feature: Feature, value: bool) -> Result<Book> {
        debug!(%id, %feature, value, "updating progress");
        self.update_book(id, |book| book.progress.set(feature, value))
    }

    pub fn generate_summary(&mut self, id: &BookId) -> Result<Book> {
        self.apply(id, canned::summary())
    }

    pub fn generate_quiz(&mut self, id: &BookId) -> Result<Book> {
        self.apply(id, canned::quiz())
    }

    pub fn generate_audio(&mut self, id: &BookId) -> Result<Book> {
        self.apply(id, canned::audio())
    }

    pub fn generate_games(&mut self, id: &BookId) -> Result<Book> {
        self.apply(id, Artifact::Games)
    }

    /// Store a generated artifact on the book and mark its feature done.
    pub fn apply(&mut self, id: &BookId, artifact: Artifact) -> Result<Book> {
        let feature = artifact.feature();
        let book = self.update_book(id, |book| artifact.apply_to(book))?;
        info!(%id, %feature, "artifact applied");
        Ok(book)
    }

    /// Record one quiz attempt. Progress flags are left alone.
    pub fn add_quiz_result(&mut self, id: &BookId, score: u8) -> Result<Book> {
        if score > 100 {
            return Err(FunlearnError::ValidationError(format!(
                "quiz score must be 0-100, got {score}"
            )));
        }
        self.update_book(id, |book| book.quiz_results.push(QuizResult::now(score)))
    }

    /// Delete a book, clearing the focus if it pointed there.
    pub fn remove(&mut self, id: &BookId) -> Result<Book> {
        let idx = self
            .state
            .position(id)
            .ok_or_else(|| FunlearnError::BookNotFound(id.to_string()))?;

        let state = Arc::make_mut(&mut self.state);
        let removed = state.books.remove(idx);
        if state.current.as_ref() == Some(id) {
            state.current = None;
        }
        info!(%id, "book removed");
        self.persist()?;
        Ok(removed)
    }

    /// Drop every book and the focus.
    pub fn clear(&mut self) -> Result<()> {
        self.state = Arc::new(LibraryState::default());
        info!("library cleared");
        self.persist()
    }

    // ─── Internals ──────────────────────────────────────────

    fn require(&self, id: &BookId) -> Result<&Book> {
        self.state
            .get(id)
            .ok_or_else(|| FunlearnError::BookNotFound(id.to_string()))
    }

    fn update_book(&mut self, id: &BookId, f: impl FnOnce(&mut Book)) -> Result<Book> {
        let idx = self
            .state
            .position(id)
            .ok_or_else(|| FunlearnError::BookNotFound(id.to_string()))?;

        let book = &mut Arc::make_mut(&mut self.state).books[idx];
        f(book);
        let updated = book.clone();
        self.persist()?;
        Ok(updated)
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.state.to_persisted()).inspect_err(|e| {
            warn!("failed to persist library snapshot: {e}");
        })
    }
}
