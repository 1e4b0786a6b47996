// src/store/submissions.rs

use sqlx::{PgPool, types::Json};

use crate::error::AppError;
use crate::models::scope::ScopeKey;
use crate::models::submission::AssignmentSubmission;

const SUBMISSION_COLUMNS: &str = "id, student_id, course_id, cohort_id, item_id, attachments, \
     comment, submitted_at, status, points, feedback, grader_id, graded_at, updated_at";

/// Creates or replaces the one submission row for a scope key.
///
/// A single atomic upsert, so two concurrent resubmissions cannot
/// duplicate the row; the later writer simply wins. Resubmission resets
/// `status` to 'submitted', leaving any earlier grade fields untouched
/// until the tutor re-grades.
pub async fn upsert_submission(
    pool: &PgPool,
    scope: &ScopeKey,
    course_id: i64,
    attachments: &[String],
    comment: &str,
) -> Result<AssignmentSubmission, AppError> {
    let submission = sqlx::query_as::<_, AssignmentSubmission>(&format!(
        r#"
        INSERT INTO assignment_submissions
            (student_id, course_id, cohort_id, item_id, attachments, comment,
             submitted_at, status, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now(), 'submitted', now())
        ON CONFLICT ON CONSTRAINT uq_submission_scope DO UPDATE SET
            attachments = EXCLUDED.attachments,
            comment = EXCLUDED.comment,
            submitted_at = now(),
            status = 'submitted',
            updated_at = now()
        RETURNING {SUBMISSION_COLUMNS}
        "#
    ))
    .bind(scope.student_id)
    .bind(course_id)
    .bind(scope.cohort_id)
    .bind(scope.item_id)
    .bind(Json(attachments))
    .bind(comment)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to upsert assignment submission: {:?}", e);
        AppError::from(e)
    })?;

    Ok(submission)
}

/// Marks a submission graded. Grading never touches the submission
/// content, only the grade fields.
pub async fn grade_submission(
    pool: &PgPool,
    submission_id: i64,
    points: i32,
    feedback: &str,
    grader_id: i64,
) -> Result<AssignmentSubmission, AppError> {
    let submission = sqlx::query_as::<_, AssignmentSubmission>(&format!(
        r#"
        UPDATE assignment_submissions
        SET status = 'graded',
            points = $2,
            feedback = $3,
            grader_id = $4,
            graded_at = now(),
            updated_at = now()
        WHERE id = $1
        RETURNING {SUBMISSION_COLUMNS}
        "#
    ))
    .bind(submission_id)
    .bind(points)
    .bind(feedback)
    .bind(grader_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    Ok(submission)
}

/// The submission for one scope key, if any.
pub async fn submission_for_scope(
    pool: &PgPool,
    scope: &ScopeKey,
) -> Result<Option<AssignmentSubmission>, AppError> {
    let submission = sqlx::query_as::<_, AssignmentSubmission>(&format!(
        r#"
        SELECT {SUBMISSION_COLUMNS}
        FROM assignment_submissions
        WHERE student_id = $1 AND item_id = $2 AND cohort_id IS NOT DISTINCT FROM $3
        "#
    ))
    .bind(scope.student_id)
    .bind(scope.item_id)
    .bind(scope.cohort_id)
    .fetch_optional(pool)
    .await?;

    Ok(submission)
}
