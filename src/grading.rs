// src/grading.rs

use serde_json::Value;

use crate::models::attempt::QuestionResult;
use crate::models::item::QuizQuestion;

/// Outcome of grading one quiz submission.
#[derive(Debug, Clone)]
pub struct GradeOutcome {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub results: Vec<QuestionResult>,
}

/// Grades a quiz submission against its question set.
///
/// * Answers are positional: `answers[i]` is matched against
///   `questions[i].correct_answer`.
/// * Matching is case-insensitive string equality after coercing both
///   sides to text (strings, numbers and booleans coerce; anything else
///   does not). No partial credit.
/// * A missing answer, or a question with no recorded correct answer,
///   counts as incorrect instead of failing the attempt.
///
/// Pure and deterministic; never touches storage.
pub fn grade(questions: &[QuizQuestion], answers: &[Value]) -> GradeOutcome {
    let total_questions = questions.len() as i32;
    let mut score = 0;
    let mut results = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let student_answer = answers.get(i).cloned().unwrap_or(Value::Null);
        let correct_answer = question.correct_answer.clone().unwrap_or(Value::Null);

        let is_correct = match (answer_text(&student_answer), answer_text(&correct_answer)) {
            (Some(given), Some(expected)) => given.to_lowercase() == expected.to_lowercase(),
            _ => false,
        };

        if is_correct {
            score += 1;
        }

        results.push(QuestionResult {
            question_index: i as i32,
            is_correct,
            student_answer,
            correct_answer,
        });
    }

    let percentage = if total_questions > 0 {
        100.0 * f64::from(score) / f64::from(total_questions)
    } else {
        0.0
    };

    GradeOutcome {
        score,
        total_questions,
        percentage,
        results,
    }
}

/// Coerces a JSON scalar to its text form for comparison.
/// Arrays, objects and null have no text form and never match.
fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(correct: Value) -> QuizQuestion {
        QuizQuestion {
            prompt: "q".to_string(),
            options: None,
            correct_answer: Some(correct),
        }
    }

    #[test]
    fn test_all_correct_scores_full() {
        let questions = vec![question(json!("paris")), question(json!("42"))];
        let outcome = grade(&questions, &[json!("paris"), json!("42")]);

        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total_questions, 2);
        assert_eq!(outcome.percentage, 100.0);
        assert!(outcome.results.iter().all(|r| r.is_correct));
    }

    #[test]
    fn test_case_insensitive_match() {
        let questions = vec![question(json!("paris"))];
        let outcome = grade(&questions, &[json!("Paris")]);

        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn test_number_coerces_to_string() {
        let questions = vec![question(json!("42")), question(json!(7))];
        let outcome = grade(&questions, &[json!(42), json!("7")]);

        assert_eq!(outcome.score, 2);
    }

    #[test]
    fn test_empty_quiz_is_zero_percent() {
        let outcome = grade(&[], &[]);

        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total_questions, 0);
        assert_eq!(outcome.percentage, 0.0);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_missing_answer_is_incorrect() {
        let questions = vec![question(json!("a")), question(json!("b"))];
        let outcome = grade(&questions, &[json!("a")]);

        assert_eq!(outcome.score, 1);
        assert!(!outcome.results[1].is_correct);
        assert_eq!(outcome.results[1].student_answer, Value::Null);
    }

    #[test]
    fn test_missing_correct_answer_degrades_to_incorrect() {
        let broken = QuizQuestion {
            prompt: "q".to_string(),
            options: None,
            correct_answer: None,
        };
        let outcome = grade(&[broken], &[json!("anything")]);

        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total_questions, 1);
        assert!(!outcome.results[0].is_correct);
    }

    #[test]
    fn test_null_and_object_answers_never_match() {
        let questions = vec![question(json!("null")), question(json!("x"))];
        let outcome = grade(&questions, &[Value::Null, json!({"a": 1})]);

        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_half_correct_is_fifty_percent() {
        let questions = vec![question(json!("paris")), question(json!("42"))];
        let outcome = grade(&questions, &[json!("Paris"), json!("0")]);

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.percentage, 50.0);
        assert!(outcome.results[0].is_correct);
        assert!(!outcome.results[1].is_correct);
    }
}
