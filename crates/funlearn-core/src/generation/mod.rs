//! Learning-artifact generation.
//!
//! [`GenerationService`] is the seam where real summarization, quiz and audio
//! backends plug in. The bundled [`MockGenerationService`] waits a configured
//! delay and returns [`canned`] content.

pub mod canned;
pub mod mock;

pub use mock::MockGenerationService;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{FunlearnError, Result};
use crate::models::{Artifact, Book, BookId, Feature};
use crate::store::BookStore;
use crate::storage::StateStorage;

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_summary(&self, book: &Book) -> Result<Artifact>;
    async fn generate_quiz(&self, book: &Book) -> Result<Artifact>;
    async fn generate_audio(&self, book: &Book) -> Result<Artifact>;
    async fn generate_games(&self, book: &Book) -> Result<Artifact>;

    /// Dispatch on `feature`.
    async fn generate_feature(&self, feature: Feature, book: &Book) -> Result<Artifact> {
        match feature {
            Feature::Summary => self.generate_summary(book).await,
            Feature::Quiz => self.generate_quiz(book).await,
            Feature::Audio => self.generate_audio(book).await,
            Feature::Games => self.generate_games(book).await,
        }
    }
}

/// Run one generation step for `book` and check the service answered with
/// the requested kind of artifact.
pub async fn run<G>(service: &G, feature: Feature, book: &Book) -> Result<Artifact>
where
    G: GenerationService + ?Sized,
{
    debug!(id = %book.id, %feature, "generation started");
    let artifact = service.generate_feature(feature, book).await?;
    if artifact.feature() != feature {
        return Err(FunlearnError::Generation(format!(
            "asked for {feature}, service returned {}",
            artifact.feature()
        )));
    }
    Ok(artifact)
}

/// Generate `feature` for the book and apply the result to the store.
pub async fn generate<S, G>(
    store: &mut BookStore<S>,
    service: &G,
    id: &BookId,
    feature: Feature,
) -> Result<Book>
where
    S: StateStorage,
    G: GenerationService + ?Sized,
{
    let book = store
        .get(id)
        .cloned()
        .ok_or_else(|| FunlearnError::BookNotFound(id.to_string()))?;
    let artifact = run(service, feature, &book).await?;
    store.apply(id, artifact)
}

/// Like [`generate`], but the store lock is released while the service runs.
///
/// Other tasks may change the library in the meantime. If the book is gone
/// by the time the artifact is ready, the artifact is dropped and
/// [`FunlearnError::BookNotFound`] returned.
pub async fn generate_shared<S, G>(
    store: &Mutex<BookStore<S>>,
    service: &G,
    id: &BookId,
    feature: Feature,
) -> Result<Book>
where
    S: StateStorage,
    G: GenerationService + ?Sized,
{
    let book = {
        let guard = store.lock().await;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| FunlearnError::BookNotFound(id.to_string()))?
    };

    let artifact = run(service, feature, &book).await?;

    let mut guard = store.lock().await;
    guard.apply(id, artifact).inspect_err(|e| {
        if e.is_not_found() {
            debug!(%id, %feature, "book removed during generation, result discarded");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::GenerationConfig;
    use crate::models::NewBook;
    use crate::storage::MemoryStorage;

    /// Always answers with a summary, whatever was asked.
    struct ConfusedService;

    #[async_trait]
    impl GenerationService for ConfusedService {
        async fn generate_summary(&self, _book: &Book) -> Result<Artifact> {
            Ok(canned::summary())
        }
        async fn generate_quiz(&self, _book: &Book) -> Result<Artifact> {
            Ok(canned::summary())
        }
        async fn generate_audio(&self, _book: &Book) -> Result<Artifact> {
            Ok(canned::summary())
        }
        async fn generate_games(&self, _book: &Book) -> Result<Artifact> {
            Ok(canned::summary())
        }
    }

    #[tokio::test]
    async fn test_generate_applies_every_feature() {
        let mut store = BookStore::open(MemoryStorage::new());
        let book = store.add(NewBook::new("Dune", "Herbert", "1.2 MB")).unwrap();
        let service = MockGenerationService::instant();

        for feature in Feature::ALL {
            let updated = generate(&mut store, &service, &book.id, feature).await.unwrap();
            assert!(updated.progress.get(feature));
        }

        let book = store.get(&book.id).unwrap();
        assert!(book.progress.is_complete());
        assert_eq!(book.summary.as_deref(), Some(canned::SUMMARY));
        assert_eq!(book.quizzes.as_ref().map(Vec::len), Some(2));
        assert_eq!(book.audio_url.as_deref(), Some(canned::AUDIO_URL));
    }

    #[tokio::test]
    async fn test_generate_matches_sync_operation() {
        let mut store = BookStore::open(MemoryStorage::new());
        let a = store.add(NewBook::new("A", "", "")).unwrap();
        let b = store.add(NewBook::new("B", "", "")).unwrap();

        let via_service = generate(&mut store, &MockGenerationService::instant(), &a.id, Feature::Quiz)
            .await
            .unwrap();
        let via_store = store.generate_quiz(&b.id).unwrap();
        assert_eq!(via_service.quizzes, via_store.quizzes);
    }

    #[tokio::test]
    async fn test_generate_unknown_book() {
        let mut store = BookStore::open(MemoryStorage::new());
        let err = generate(
            &mut store,
            &MockGenerationService::instant(),
            &BookId::from("nope"),
            Feature::Summary,
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_wrong_artifact_kind_is_rejected() {
        let mut store = BookStore::open(MemoryStorage::new());
        let book = store.add(NewBook::default()).unwrap();

        let err = generate(&mut store, &ConfusedService, &book.id, Feature::Audio)
            .await
            .unwrap_err();
        assert!(matches!(err, FunlearnError::Generation(_)));
        assert!(!store.get(&book.id).unwrap().progress.audio);
    }

    #[tokio::test]
    async fn test_removed_during_generation_discards_result() {
        let storage = MemoryStorage::new();
        let mut store = BookStore::open(storage.clone());
        let book = store.add(NewBook::new("Gone", "", "")).unwrap();
        let store = Mutex::new(store);

        let mut delays = GenerationConfig::instant();
        delays.summary_delay_ms = 100;
        let service = MockGenerationService::new(delays);

        let (result, ()) = tokio::join!(
            generate_shared(&store, &service, &book.id, Feature::Summary),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                store.lock().await.remove(&book.id).unwrap();
            }
        );

        assert!(result.unwrap_err().is_not_found());
        assert!(store.lock().await.books().is_empty());
        assert!(storage.snapshot().unwrap().books.is_empty());
    }

    #[tokio::test]
    async fn test_shared_generation_applies_when_book_survives() {
        let mut store = BookStore::open(MemoryStorage::new());
        let book = store.add(NewBook::new("Stays", "", "")).unwrap();
        let store = Mutex::new(store);

        let updated = generate_shared(&store, &MockGenerationService::instant(), &book.id, Feature::Games)
            .await
            .unwrap();
        assert!(updated.progress.games);
    }
}
