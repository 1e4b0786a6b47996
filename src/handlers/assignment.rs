// src/handlers/assignment.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    enrollment::{require_path, require_unlocked_path},
    error::AppError,
    models::{
        item::ItemKind,
        scope::ScopeKey,
        submission::{GradeAssignmentRequest, SubmitAssignmentRequest},
    },
    state::AppState,
    store,
    utils::{html::clean_html, jwt::Claims},
};

#[derive(Debug, serde::Deserialize)]
pub struct SubmissionQuery {
    pub cohort_id: Option<i64>,
}

/// Submits or resubmits an assignment.
///
/// The submission row for the scope key is upserted in a single
/// statement, so a resubmission overwrites rather than appends. Submitting
/// always marks the item complete in the progress ledger, regardless of
/// any eventual grade.
pub async fn submit_assignment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<i64>,
    Json(payload): Json<SubmitAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let student_id = claims.user_id()?;

    let item = state
        .catalog
        .get_item(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
    if !matches!(item.kind, ItemKind::Assignment) {
        return Err(AppError::BadRequest(
            "Item is not an assignment".to_string(),
        ));
    }
    if item.course_id != payload.course_id {
        return Err(AppError::BadRequest(
            "Assignment does not belong to this course".to_string(),
        ));
    }

    let paths = state
        .enrollment
        .resolve_paths(student_id, payload.course_id)
        .await?;
    require_unlocked_path(&paths, payload.cohort_id)?;

    let scope = ScopeKey::new(student_id, item_id, payload.cohort_id);
    let comment = clean_html(&payload.comment);

    let submission = store::submissions::upsert_submission(
        &state.pool,
        &scope,
        payload.course_id,
        &payload.attachments,
        &comment,
    )
    .await?;

    let mut progress_recorded = true;
    if let Err(e) =
        store::progress::mark_completed(&state.pool, &scope, payload.course_id, true).await
    {
        tracing::warn!(
            "Progress upsert failed after submission {}: {}",
            submission.id,
            e
        );
        progress_recorded = false;
    }

    Ok(Json(serde_json::json!({
        "submission": submission,
        "progress_recorded": progress_recorded,
    })))
}

/// Fetches the requesting student's submission for an assignment, if any.
pub async fn get_submission(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<i64>,
    Query(query): Query<SubmissionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let item = state
        .catalog
        .get_item(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
    if !matches!(item.kind, ItemKind::Assignment) {
        return Err(AppError::BadRequest(
            "Item is not an assignment".to_string(),
        ));
    }

    let paths = state
        .enrollment
        .resolve_paths(student_id, item.course_id)
        .await?;
    require_path(&paths, query.cohort_id)?;

    let scope = ScopeKey::new(student_id, item_id, query.cohort_id);
    let submission = store::submissions::submission_for_scope(&state.pool, &scope).await?;

    Ok(Json(serde_json::json!({ "submission": submission })))
}

/// Grades a submission. Tutor-facing; the grader's identity comes from
/// the verified token, never the request body.
pub async fn grade_assignment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(submission_id): Path<i64>,
    Json(payload): Json<GradeAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let grader_id = claims.user_id()?;

    let feedback = clean_html(&payload.feedback);

    let submission = store::submissions::grade_submission(
        &state.pool,
        submission_id,
        payload.points,
        &feedback,
        grader_id,
    )
    .await?;

    Ok(Json(submission))
}
