use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FunlearnError;

// ─── BookId ─────────────────────────────────────────────────

/// Opaque book identifier. Generated once at creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters used for compact list output.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Book ───────────────────────────────────────────────────

/// One uploaded book and the learning artifacts generated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quizzes: Option<Vec<Quiz>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// Attempts in chronological order. Append-only.
    #[serde(default)]
    pub quiz_results: Vec<QuizResult>,

    #[serde(default)]
    pub progress: Progress,
}

impl Book {
    /// Create a fresh book: new id, current timestamp, no artifacts, no progress.
    pub fn new(data: NewBook) -> Self {
        Self {
            id: BookId::generate(),
            title: data.title,
            author: data.author,
            upload_date: Utc::now(),
            file_size: data.file_size,
            summary: None,
            quizzes: None,
            audio_url: None,
            quiz_results: Vec::new(),
            progress: Progress::default(),
        }
    }

    /// Mean of this book's quiz scores, or `None` before the first attempt.
    pub fn average_score(&self) -> Option<f64> {
        if self.quiz_results.is_empty() {
            return None;
        }
        let total: f64 = self.quiz_results.iter().map(|r| f64::from(r.score)).sum();
        Some(total / self.quiz_results.len() as f64)
    }

    /// Case-insensitive substring match on title or author.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.title.to_lowercase().contains(&q) || self.author.to_lowercase().contains(&q)
    }
}

/// Caller-supplied fields for [`Book::new`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub file_size: String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        file_size: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            file_size: file_size.into(),
        }
    }
}

// ─── Quiz ───────────────────────────────────────────────────

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Percentage, 0–100.
    pub score: u8,
    pub date: DateTime<Utc>,
}

impl QuizResult {
    pub fn now(score: u8) -> Self {
        Self {
            score,
            date: Utc::now(),
        }
    }
}

// ─── Progress ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Summary,
    Quiz,
    Games,
    Audio,
}

impl Feature {
    pub const ALL: [Feature; 4] = [Self::Summary, Self::Quiz, Self::Games, Self::Audio];
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Summary => "summary",
            Self::Quiz => "quiz",
            Self::Games => "games",
            Self::Audio => "audio",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Feature {
    type Err = FunlearnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "quiz" => Ok(Self::Quiz),
            "games" => Ok(Self::Games),
            "audio" => Ok(Self::Audio),
            other => Err(FunlearnError::InvalidFeature(other.to_string())),
        }
    }
}

/// Completion flags, one per learning feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub summary: bool,
    pub quiz: bool,
    pub games: bool,
    pub audio: bool,
}

impl Progress {
    pub fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::Summary => self.summary,
            Feature::Quiz => self.quiz,
            Feature::Games => self.games,
            Feature::Audio => self.audio,
        }
    }

    pub fn set(&mut self, feature: Feature, value: bool) {
        match feature {
            Feature::Summary => self.summary = value,
            Feature::Quiz => self.quiz = value,
            Feature::Games => self.games = value,
            Feature::Audio => self.audio = value,
        }
    }

    pub fn completed_count(&self) -> usize {
        Feature::ALL.iter().filter(|f| self.get(**f)).count()
    }

    /// Share of completed features, 0.0–100.0.
    pub fn percentage(&self) -> f64 {
        self.completed_count() as f64 * 100.0 / Feature::ALL.len() as f64
    }

    pub fn is_complete(&self) -> bool {
        self.completed_count() == Feature::ALL.len()
    }
}

// ─── Tests ─────────────────────────────────────────────────
