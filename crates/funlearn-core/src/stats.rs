use serde::Serialize;

use crate::models::{Book, Feature};

/// Attempts needed for the "Quiz Master" achievement.
pub const QUIZ_MASTER_ATTEMPTS: usize = 10;
/// Books with audio needed for the "Audio Learner" achievement.
pub const AUDIO_LEARNER_BOOKS: usize = 5;

/// Aggregate learning progress across the whole library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    pub total_books: usize,
    /// Books with all four features done.
    pub completed_books: usize,
    pub total_quiz_attempts: usize,
    /// Mean over all books of each book's mean score; books without attempts count as 0.
    pub average_score: f64,
    pub with_summary: usize,
    pub with_quiz: usize,
    pub with_games: usize,
    pub with_audio: usize,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

impl LibraryStats {
    pub fn from_books(books: &[Book]) -> Self {
        let count = |feature: Feature| books.iter().filter(|b| b.progress.get(feature)).count();

        let total_books = books.len();
        let total_quiz_attempts = books.iter().map(|b| b.quiz_results.len()).sum();
        let score_sum: f64 = books.iter().map(|b| b.average_score().unwrap_or(0.0)).sum();
        let average_score = score_sum / total_books.max(1) as f64;

        let with_games = count(Feature::Games);
        let with_audio = count(Feature::Audio);
        let perfect = books
            .iter()
            .any(|b| b.quiz_results.iter().any(|r| r.score == 100));

        let achievements = vec![
            Achievement {
                name: "First Book",
                description: "Uploaded your first book",
                earned: total_books > 0,
            },
            Achievement {
                name: "Quiz Master",
                description: "Completed 10 quizzes",
                earned: total_quiz_attempts >= QUIZ_MASTER_ATTEMPTS,
            },
            Achievement {
                name: "Perfect Score",
                description: "Got 100% on a quiz",
                earned: perfect,
            },
            Achievement {
                name: "Game Champion",
                description: "Played all game types",
                earned: with_games > 0,
            },
            Achievement {
                name: "Audio Learner",
                description: "Listened to 5 audio books",
                earned: with_audio >= AUDIO_LEARNER_BOOKS,
            },
        ];

        Self {
            total_books,
            completed_books: books.iter().filter(|b| b.progress.is_complete()).count(),
            total_quiz_attempts,
            average_score,
            with_summary: count(Feature::Summary),
            with_quiz: count(Feature::Quiz),
            with_games,
            with_audio,
            achievements,
        }
    }

    pub fn earned(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.earned)
    }
}
