// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// Represents the 'quiz_attempts' table in the database.
///
/// Attempts are append-only: a row is written once at submission time and
/// never mutated. `results` holds the full per-question breakdown; whether
/// it is disclosed to the student is decided per response, not here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub cohort_id: Option<i64>,
    pub quiz_id: i64,
    pub attempt_number: i32,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub passed: bool,
    pub answers: Json<Vec<Value>>,
    pub results: Option<Json<Vec<QuestionResult>>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Per-question grading detail, stored alongside the attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_index: i32,
    pub is_correct: bool,
    pub student_answer: Value,
    pub correct_answer: Value,
}

/// DTO for submitting a quiz attempt.
///
/// Answers are positional: `answers[i]` responds to `questions[i]`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    pub course_id: i64,
    pub cohort_id: Option<i64>,
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub answers: Vec<Value>,
}

/// DTO returned after a graded submission.
#[derive(Debug, Serialize)]
pub struct QuizAttemptResponse {
    pub attempt_id: i64,
    pub passed: bool,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub attempts_count: i64,
    pub max_attempts: i32,
    pub can_retry: bool,
    /// Nulled while the student has retries left and has not passed.
    pub results: Option<Vec<QuestionResult>>,
    /// False when the attempt was recorded but the progress upsert failed;
    /// safe to retry, the grade itself is durable.
    pub progress_recorded: bool,
}

/// Query parameters for the quiz state fetch.
#[derive(Debug, Deserialize)]
pub struct QuizStateQuery {
    pub cohort_id: Option<i64>,
}

/// DTO for the quiz state fetch: sanitized config plus attempt summary.
#[derive(Debug, Serialize)]
pub struct QuizStateResponse {
    pub quiz_id: i64,
    pub course_id: i64,
    pub title: String,
    pub questions: Vec<super::item::PublicQuizQuestion>,
    pub max_attempts: i32,
    pub passing_grade: f64,
    pub attempts_count: i64,
    pub passed: bool,
    pub can_retry: bool,
    /// Best attempt so far (a passed one if any, else the latest), with
    /// results stripped unless visibility rules allow them.
    pub latest_attempt: Option<QuizAttempt>,
}
