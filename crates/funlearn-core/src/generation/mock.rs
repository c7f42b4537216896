use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::generation::{GenerationService, canned};
use crate::models::{Artifact, Book};

/// Stand-in generator: sleeps for the configured delay, then returns canned data.
#[derive(Debug, Clone)]
pub struct MockGenerationService {
    delays: GenerationConfig,
}

impl MockGenerationService {
    pub fn new(delays: GenerationConfig) -> Self {
        Self { delays }
    }

    /// No artificial latency.
    pub fn instant() -> Self {
        Self::new(GenerationConfig::instant())
    }

    async fn wait(&self, delay: Duration, what: &str, book: &Book) {
        if delay.is_zero() {
            return;
        }
        debug!(id = %book.id, "simulating {what} generation for {delay:?}");
        tokio::time::sleep(delay).await;
    }
}

impl Default for MockGenerationService {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn generate_summary(&self, book: &Book) -> Result<Artifact> {
        self.wait(self.delays.summary_delay(), "summary", book).await;
        Ok(canned::summary())
    }

    async fn generate_quiz(&self, book: &Book) -> Result<Artifact> {
        self.wait(self.delays.quiz_delay(), "quiz", book).await;
        Ok(canned::quiz())
    }

    async fn generate_audio(&self, book: &Book) -> Result<Artifact> {
        self.wait(self.delays.audio_delay(), "audio", book).await;
        Ok(canned::audio())
    }

    async fn generate_games(&self, book: &Book) -> Result<Artifact> {
        self.wait(self.delays.games_delay(), "games", book).await;
        Ok(Artifact::Games)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::models::{Feature, NewBook};

    #[tokio::test]
    async fn test_waits_configured_delay() {
        let mut delays = GenerationConfig::instant();
        delays.audio_delay_ms = 30;
        let service = MockGenerationService::new(delays);
        let book = Book::new(NewBook::default());

        let start = Instant::now();
        let artifact = service.generate_audio(&book).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(artifact, canned::audio());
    }

    #[tokio::test]
    async fn test_feature_dispatch() {
        let service = MockGenerationService::instant();
        let book = Book::new(NewBook::default());
        for feature in Feature::ALL {
            let artifact = service.generate_feature(feature, &book).await.unwrap();
            assert_eq!(artifact.feature(), feature);
        }
    }
}
