use serde::{Deserialize, Serialize};

use crate::models::book::{Book, Feature, Quiz};

/// Output of one generation step, ready to be applied to a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Artifact {
    Summary(String),
    Quiz(Vec<Quiz>),
    Games,
    Audio(String),
}

impl Artifact {
    /// The progress flag this artifact completes.
    pub fn feature(&self) -> Feature {
        match self {
            Self::Summary(_) => Feature::Summary,
            Self::Quiz(_) => Feature::Quiz,
            Self::Games => Feature::Games,
            Self::Audio(_) => Feature::Audio,
        }
    }

    /// Store the artifact on `book` and mark its feature complete.
    pub(crate) fn apply_to(self, book: &mut Book) {
        let feature = self.feature();
        match self {
            Self::Summary(text) => book.summary = Some(text),
            Self::Quiz(quizzes) => book.quizzes = Some(quizzes),
            Self::Audio(url) => book.audio_url = Some(url),
            Self::Games => {}
        }
        book.progress.set(feature, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::NewBook;

    #[test]
    fn test_games_only_touches_progress() {
        let mut book = Book::new(NewBook::new("T", "A", "1 MB"));
        Artifact::Games.apply_to(&mut book);
        assert!(book.progress.games);
        assert!(book.summary.is_none());
        assert!(book.quizzes.is_none());
        assert!(book.audio_url.is_none());
    }

    #[test]
    fn test_summary_sets_text_and_flag() {
        let mut book = Book::new(NewBook::new("T", "A", "1 MB"));
        Artifact::Summary("short".into()).apply_to(&mut book);
        assert_eq!(book.summary.as_deref(), Some("short"));
        assert!(book.progress.summary);
        assert!(!book.progress.quiz);
    }
}
