// src/handlers/progress.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    enrollment::{require_path, require_unlocked_path},
    error::AppError,
    models::{
        item::ItemKind,
        progress::{CourseProgressResponse, ItemProgress, ProgressQuery, SetProgressRequest},
        scope::ScopeKey,
    },
    state::AppState,
    store::{self, progress::course_progress_percent},
    utils::jwt::Claims,
};

/// Returns per-item completion for a course under one cohort scope,
/// plus the rolled-up percentage. Items without a ledger row report as
/// incomplete.
pub async fn get_course_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Query(query): Query<ProgressQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let paths = state
        .enrollment
        .resolve_paths(student_id, course_id)
        .await?;
    require_path(&paths, query.cohort_id)?;

    let item_ids = state.catalog.list_item_ids(course_id).await?;
    let records =
        store::progress::list_course_progress(&state.pool, student_id, course_id, query.cohort_id)
            .await?;

    let by_item: HashMap<i64, _> = records.iter().map(|r| (r.item_id, r)).collect();

    let items: Vec<ItemProgress> = item_ids
        .iter()
        .map(|id| match by_item.get(id) {
            Some(record) => ItemProgress {
                item_id: *id,
                is_completed: record.is_completed,
                completed_at: record.completed_at,
            },
            None => ItemProgress {
                item_id: *id,
                is_completed: false,
                completed_at: None,
            },
        })
        .collect();

    let completed = items.iter().filter(|i| i.is_completed).count();
    let percent = course_progress_percent(item_ids.len(), completed);

    Ok(Json(CourseProgressResponse {
        course_id,
        cohort_id: query.cohort_id,
        percent,
        items,
    }))
}

/// Explicitly toggles completion for a lesson or live class.
///
/// Quiz and assignment completion is derived from grading and submission;
/// toggling those by hand would bypass the attempt policy.
pub async fn set_item_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Json(payload): Json<SetProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let item = state
        .catalog
        .get_item(payload.item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    if item.course_id != course_id {
        return Err(AppError::BadRequest(
            "Item does not belong to this course".to_string(),
        ));
    }
    match item.kind {
        ItemKind::Lesson | ItemKind::LiveClass => {}
        _ => {
            return Err(AppError::BadRequest(
                "Completion for this item is derived from submissions".to_string(),
            ));
        }
    }

    let paths = state
        .enrollment
        .resolve_paths(student_id, course_id)
        .await?;
    require_unlocked_path(&paths, payload.cohort_id)?;

    let scope = ScopeKey::new(student_id, payload.item_id, payload.cohort_id);
    let record =
        store::progress::mark_completed(&state.pool, &scope, course_id, payload.is_completed)
            .await?;

    Ok(Json(record))
}
