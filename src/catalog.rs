// src/catalog.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::item::{CurriculumItem, ItemKind, QuizConfig};

/// Read-only view of the course/module catalog.
///
/// The engine consumes this as a black box. The production implementation
/// reads the `course_items` table; `AppState::with_services` accepts any
/// other implementation.
#[async_trait]
pub trait CurriculumCatalog: Send + Sync {
    async fn get_item(&self, item_id: i64) -> Result<Option<CurriculumItem>, AppError>;

    /// Item ids belonging to a course, for the progress roll-up.
    async fn list_item_ids(&self, course_id: i64) -> Result<Vec<i64>, AppError>;
}

pub struct PgCurriculumCatalog {
    pool: PgPool,
}

impl PgCurriculumCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    course_id: i64,
    kind: String,
    title: String,
    metadata: Value,
}

#[async_trait]
impl CurriculumCatalog for PgCurriculumCatalog {
    async fn get_item(&self, item_id: i64) -> Result<Option<CurriculumItem>, AppError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, course_id, kind, title, metadata
            FROM course_items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch course item {}: {:?}", item_id, e);
            AppError::from(e)
        })?;

        row.map(|r| {
            let kind = decode_kind(&r.kind, r.metadata)?;
            Ok(CurriculumItem {
                id: r.id,
                course_id: r.course_id,
                title: r.title,
                kind,
            })
        })
        .transpose()
    }

    async fn list_item_ids(&self, course_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM course_items WHERE course_id = $1 ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

/// Decodes the metadata blob into the typed variant for its kind.
/// This is the only place the raw JSON is interpreted.
fn decode_kind(kind: &str, metadata: Value) -> Result<ItemKind, AppError> {
    match kind {
        "lesson" => Ok(ItemKind::Lesson),
        "assignment" => Ok(ItemKind::Assignment),
        "live_class" => Ok(ItemKind::LiveClass),
        "quiz" => {
            let mut config: QuizConfig = serde_json::from_value(metadata).map_err(|e| {
                AppError::InternalServerError(format!("Malformed quiz metadata: {}", e))
            })?;
            // Keep stored config inside its documented ranges.
            config.max_attempts = config.max_attempts.max(1);
            config.passing_grade = config.passing_grade.clamp(0.0, 100.0);
            Ok(ItemKind::Quiz(config))
        }
        other => Err(AppError::InternalServerError(format!(
            "Unknown item kind '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_quiz_with_full_config() {
        let metadata = json!({
            "questions": [
                {"prompt": "Capital of France?", "options": ["paris", "rome"], "correctAnswer": "paris"}
            ],
            "maxAttempts": 3,
            "passingGrade": 70
        });

        let kind = decode_kind("quiz", metadata).unwrap();
        match kind {
            ItemKind::Quiz(config) => {
                assert_eq!(config.questions.len(), 1);
                assert_eq!(config.max_attempts, 3);
                assert_eq!(config.passing_grade, 70.0);
                assert_eq!(config.questions[0].correct_answer, Some(json!("paris")));
            }
            other => panic!("expected quiz, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_quiz_defaults() {
        let kind = decode_kind("quiz", json!({})).unwrap();
        match kind {
            ItemKind::Quiz(config) => {
                assert!(config.questions.is_empty());
                assert_eq!(config.max_attempts, 1);
                assert_eq!(config.passing_grade, 50.0);
            }
            other => panic!("expected quiz, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_quiz_clamps_out_of_range_config() {
        let metadata = json!({"maxAttempts": 0, "passingGrade": 250});
        let kind = decode_kind("quiz", metadata).unwrap();
        match kind {
            ItemKind::Quiz(config) => {
                assert_eq!(config.max_attempts, 1);
                assert_eq!(config.passing_grade, 100.0);
            }
            other => panic!("expected quiz, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_quiz_question_without_answer_key() {
        let metadata = json!({"questions": [{"prompt": "unanswerable"}]});
        let kind = decode_kind("quiz", metadata).unwrap();
        match kind {
            ItemKind::Quiz(config) => {
                assert_eq!(config.questions[0].correct_answer, None);
            }
            other => panic!("expected quiz, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_quiz_ignores_metadata() {
        assert!(matches!(
            decode_kind("lesson", json!({"whatever": true})).unwrap(),
            ItemKind::Lesson
        ));
        assert!(matches!(
            decode_kind("assignment", json!(null)).unwrap(),
            ItemKind::Assignment
        ));
        assert!(matches!(
            decode_kind("live_class", json!({})).unwrap(),
            ItemKind::LiveClass
        ));
    }

    #[test]
    fn test_decode_unknown_kind_errors() {
        assert!(decode_kind("podcast", json!({})).is_err());
    }

    #[test]
    fn test_decode_malformed_quiz_metadata_errors() {
        assert!(decode_kind("quiz", json!({"questions": "not a list"})).is_err());
    }
}
