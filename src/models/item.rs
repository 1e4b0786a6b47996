// src/models/item.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A curriculum item as surfaced by the catalog.
///
/// The raw `metadata` JSON column is decoded exactly once, at the catalog
/// boundary, into the typed `kind` variant. Handlers never see the blob.
#[derive(Debug, Clone)]
pub struct CurriculumItem {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub kind: ItemKind,
}

/// Tagged variant per item type. Only quizzes carry structured config;
/// the other kinds need nothing beyond their identity.
#[derive(Debug, Clone)]
pub enum ItemKind {
    Lesson,
    Quiz(QuizConfig),
    Assignment,
    LiveClass,
}

fn default_max_attempts() -> i32 {
    1
}

fn default_passing_grade() -> f64 {
    50.0
}

/// Quiz configuration stored in the item's metadata column.
///
/// Missing `maxAttempts`/`passingGrade` fall back to defaults instead of
/// erroring, so a data-quality gap in the catalog never blocks a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    #[serde(default = "default_passing_grade")]
    pub passing_grade: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub prompt: String,

    /// Choice options, absent for free-text questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// A question without a correct answer grades as incorrect rather
    /// than failing the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<Value>,
}

/// DTO for sending a question to a student (excludes the answer key).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuizQuestion {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl From<&QuizQuestion> for PublicQuizQuestion {
    fn from(q: &QuizQuestion) -> Self {
        PublicQuizQuestion {
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        }
    }
}
