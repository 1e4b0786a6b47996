// src/store/progress.rs

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::progress::ProgressRecord;
use crate::models::scope::ScopeKey;

const PROGRESS_COLUMNS: &str =
    "id, student_id, course_id, item_id, cohort_id, is_completed, completed_at, updated_at";

/// Upserts the completion flag for one scope key.
///
/// `completed_at` is stamped only on the false-to-true transition and
/// cleared on true-to-false; repeating the same value is a no-op beyond
/// refreshing `updated_at`, so retries are safe.
pub async fn mark_completed(
    pool: &PgPool,
    scope: &ScopeKey,
    course_id: i64,
    completed: bool,
) -> Result<ProgressRecord, AppError> {
    let record = sqlx::query_as::<_, ProgressRecord>(&format!(
        r#"
        INSERT INTO progress_records
            (student_id, course_id, item_id, cohort_id, is_completed, completed_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, CASE WHEN $5 THEN now() END, now())
        ON CONFLICT ON CONSTRAINT uq_progress_scope DO UPDATE SET
            is_completed = EXCLUDED.is_completed,
            completed_at = CASE
                WHEN EXCLUDED.is_completed AND NOT progress_records.is_completed THEN now()
                WHEN NOT EXCLUDED.is_completed THEN NULL
                ELSE progress_records.completed_at
            END,
            updated_at = now()
        RETURNING {PROGRESS_COLUMNS}
        "#
    ))
    .bind(scope.student_id)
    .bind(course_id)
    .bind(scope.item_id)
    .bind(scope.cohort_id)
    .bind(completed)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to upsert progress record: {:?}", e);
        AppError::from(e)
    })?;

    Ok(record)
}

/// All progress rows for a student in one course, restricted to the
/// requested cohort partition.
pub async fn list_course_progress(
    pool: &PgPool,
    student_id: i64,
    course_id: i64,
    cohort_id: Option<i64>,
) -> Result<Vec<ProgressRecord>, AppError> {
    let records = sqlx::query_as::<_, ProgressRecord>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM progress_records
        WHERE student_id = $1 AND course_id = $2 AND cohort_id IS NOT DISTINCT FROM $3
        ORDER BY item_id
        "#
    ))
    .bind(student_id)
    .bind(course_id)
    .bind(cohort_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Aggregate completion for reporting. Not used for gating.
pub fn course_progress_percent(total_items: usize, completed_items: usize) -> u8 {
    if total_items == 0 {
        return 0;
    }
    let completed = completed_items.min(total_items);
    (100.0 * completed as f64 / total_items as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_course_is_zero_percent() {
        assert_eq!(course_progress_percent(0, 0), 0);
    }

    #[test]
    fn test_percent_rounds_to_nearest() {
        assert_eq!(course_progress_percent(3, 1), 33);
        assert_eq!(course_progress_percent(3, 2), 67);
        assert_eq!(course_progress_percent(2, 1), 50);
    }

    #[test]
    fn test_full_completion_is_hundred() {
        assert_eq!(course_progress_percent(4, 4), 100);
    }

    #[test]
    fn test_excess_completions_are_capped() {
        // Stale ledger rows for removed items must not push past 100.
        assert_eq!(course_progress_percent(2, 3), 100);
    }
}
