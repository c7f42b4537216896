//! Fixed placeholder content returned in place of real generation.

use crate::models::{Artifact, Quiz};

pub const SUMMARY: &str = "This is a comprehensive summary of the book covering key concepts, \
main themes, and important takeaways.";

pub const AUDIO_URL: &str = "/placeholder-audio.mp3";

pub fn summary() -> Artifact {
    Artifact::Summary(SUMMARY.to_string())
}

pub fn audio() -> Artifact {
    Artifact::Audio(AUDIO_URL.to_string())
}

/// The two-question set every book receives.
pub fn quiz() -> Artifact {
    Artifact::Quiz(vec![
        Quiz {
            id: "1".into(),
            question: "What is the main theme of this book?".into(),
            options: strings(&["Adventure", "Romance", "Education", "Mystery"]),
            correct_answer: 2,
            explanation: "The book focuses primarily on educational concepts and learning \
methodologies."
                .into(),
        },
        Quiz {
            id: "2".into(),
            question: "Which concept is emphasized throughout the chapters?".into(),
            options: strings(&["Critical thinking", "Memorization", "Speed reading", "Note-taking"]),
            correct_answer: 0,
            explanation: "Critical thinking is a recurring theme that helps readers analyze \
complex topics."
                .into(),
        },
    ])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
