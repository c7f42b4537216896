use crate::error::{FunlearnError, Result};
use crate::models::Quiz;

/// Percentage of correct answers, rounded to the nearest integer.
///
/// `answers[i]` is the option index chosen for `quizzes[i]`. Questions left
/// without an answer count as wrong.
pub fn score_answers(quizzes: &[Quiz], answers: &[usize]) -> Result<u8> {
    if quizzes.is_empty() {
        return Err(FunlearnError::ValidationError("quiz has no questions".into()));
    }
    if answers.len() > quizzes.len() {
        return Err(FunlearnError::ValidationError(format!(
            "{} answers given for {} questions",
            answers.len(),
            quizzes.len()
        )));
    }

    let correct = quizzes
        .iter()
        .zip(answers)
        .filter(|(quiz, answer)| quiz.correct_answer == **answer)
        .count();

    let pct = (correct as f64 / quizzes.len() as f64 * 100.0).round();
    Ok(pct as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::canned;
    use crate::models::Artifact;

    fn canned_quizzes() -> Vec<Quiz> {
        match canned::quiz() {
            Artifact::Quiz(q) => q,
            other => panic!("unexpected artifact {other:?}"),
        }
    }

    #[test]
    fn test_all_correct() {
        let quizzes = canned_quizzes();
        assert_eq!(score_answers(&quizzes, &[2, 0]).unwrap(), 100);
    }

    #[test]
    fn test_half_correct() {
        let quizzes = canned_quizzes();
        assert_eq!(score_answers(&quizzes, &[2, 3]).unwrap(), 50);
    }

    #[test]
    fn test_unanswered_counts_wrong() {
        let quizzes = canned_quizzes();
        assert_eq!(score_answers(&quizzes, &[2]).unwrap(), 50);
        assert_eq!(score_answers(&quizzes, &[]).unwrap(), 0);
    }

    #[test]
    fn test_rounding() {
        let mut quizzes = canned_quizzes();
        quizzes.push(quizzes[0].clone());
        // 2 of 3 correct
        assert_eq!(score_answers(&quizzes, &[2, 0, 1]).unwrap(), 67);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(score_answers(&[], &[]).is_err());
        let quizzes = canned_quizzes();
        assert!(score_answers(&quizzes, &[0, 0, 0]).is_err());
    }
}
