// src/store/attempts.rs

use serde_json::Value;
use sqlx::{PgPool, types::Json};

use crate::error::{AppError, is_unique_violation};
use crate::grading::GradeOutcome;
use crate::models::attempt::QuizAttempt;
use crate::models::scope::ScopeKey;
use crate::policy::{self, AttemptStats};

const ATTEMPT_COLUMNS: &str = "id, student_id, course_id, cohort_id, quiz_id, attempt_number, \
     score, total_questions, percentage, passed, answers, results, created_at";

/// Attempt count and pass flag for one scope key.
pub async fn attempt_stats<'e, E>(executor: E, scope: &ScopeKey) -> Result<AttemptStats, AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let (count, passed): (i64, bool) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(BOOL_OR(passed), FALSE)
        FROM quiz_attempts
        WHERE student_id = $1 AND quiz_id = $2 AND cohort_id IS NOT DISTINCT FROM $3
        "#,
    )
    .bind(scope.student_id)
    .bind(scope.item_id)
    .bind(scope.cohort_id)
    .fetch_one(executor)
    .await?;

    Ok(AttemptStats { count, passed })
}

/// All attempts for one scope key, oldest first.
pub async fn list_attempts(pool: &PgPool, scope: &ScopeKey) -> Result<Vec<QuizAttempt>, AppError> {
    let attempts = sqlx::query_as::<_, QuizAttempt>(&format!(
        r#"
        SELECT {ATTEMPT_COLUMNS}
        FROM quiz_attempts
        WHERE student_id = $1 AND quiz_id = $2 AND cohort_id IS NOT DISTINCT FROM $3
        ORDER BY created_at, attempt_number
        "#
    ))
    .bind(scope.student_id)
    .bind(scope.item_id)
    .bind(scope.cohort_id)
    .fetch_all(pool)
    .await?;

    Ok(attempts)
}

/// Records a graded attempt, reserving the next attempt slot.
///
/// Eligibility is re-derived and `attempt_number` computed inside the
/// transaction, so two concurrent submissions cannot both pass the gate:
/// whichever commits second either fails the re-check or trips the
/// unique constraint on (student, quiz, cohort, attempt_number) and
/// surfaces as `Conflict`.
pub async fn insert_attempt(
    pool: &PgPool,
    scope: &ScopeKey,
    course_id: i64,
    max_attempts: i32,
    passed: bool,
    answers: &[Value],
    outcome: &GradeOutcome,
) -> Result<QuizAttempt, AppError> {
    let mut tx = pool.begin().await?;

    let stats = attempt_stats(&mut *tx, scope).await?;
    policy::check_attempt(&stats, max_attempts)?;

    let attempt_number = stats.count as i32 + 1;

    let attempt = sqlx::query_as::<_, QuizAttempt>(&format!(
        r#"
        INSERT INTO quiz_attempts
            (student_id, course_id, cohort_id, quiz_id, attempt_number,
             score, total_questions, percentage, passed, answers, results)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {ATTEMPT_COLUMNS}
        "#
    ))
    .bind(scope.student_id)
    .bind(course_id)
    .bind(scope.cohort_id)
    .bind(scope.item_id)
    .bind(attempt_number)
    .bind(outcome.score)
    .bind(outcome.total_questions)
    .bind(outcome.percentage)
    .bind(passed)
    .bind(Json(answers))
    .bind(Json(&outcome.results))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Attempt slot already taken, please retry".to_string())
        } else {
            tracing::error!("Failed to insert quiz attempt: {:?}", e);
            AppError::from(e)
        }
    })?;

    tx.commit().await?;

    Ok(attempt)
}
