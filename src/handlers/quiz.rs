// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    enrollment::{require_path, require_unlocked_path},
    error::AppError,
    grading,
    models::{
        attempt::{QuizAttemptResponse, QuizStateQuery, QuizStateResponse, SubmitQuizRequest},
        item::{ItemKind, PublicQuizQuestion},
        scope::ScopeKey,
    },
    policy,
    state::AppState,
    store,
    utils::jwt::Claims,
};

/// Submits a quiz attempt and returns the graded result.
///
/// * Resolves the quiz config through the curriculum catalog.
/// * Verifies the enrollment path for the requested cohort scope is unlocked.
/// * Applies the attempt policy, grades, and records the attempt.
/// * On pass, marks the item complete in the progress ledger.
/// * Hides per-question results while the student can still retry.
pub async fn submit_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let student_id = claims.user_id()?;

    let item = state
        .catalog
        .get_item(quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;
    let config = match item.kind {
        ItemKind::Quiz(config) => config,
        _ => return Err(AppError::BadRequest("Item is not a quiz".to_string())),
    };
    if item.course_id != payload.course_id {
        return Err(AppError::BadRequest(
            "Quiz does not belong to this course".to_string(),
        ));
    }

    let paths = state
        .enrollment
        .resolve_paths(student_id, payload.course_id)
        .await?;
    require_unlocked_path(&paths, payload.cohort_id)?;

    let scope = ScopeKey::new(student_id, quiz_id, payload.cohort_id);

    // Fast-fail before grading; insert_attempt re-checks the gate inside
    // its own transaction.
    let stats = store::attempts::attempt_stats(&state.pool, &scope).await?;
    policy::check_attempt(&stats, config.max_attempts)?;

    let outcome = grading::grade(&config.questions, &payload.answers);
    let passed = outcome.percentage >= config.passing_grade;

    let attempt = store::attempts::insert_attempt(
        &state.pool,
        &scope,
        payload.course_id,
        config.max_attempts,
        passed,
        &payload.answers,
        &outcome,
    )
    .await?;

    // The attempt row is the source of truth; a failed ledger write is
    // surfaced as a flag, logged, and safe to retry.
    let mut progress_recorded = true;
    if passed {
        if let Err(e) =
            store::progress::mark_completed(&state.pool, &scope, payload.course_id, true).await
        {
            tracing::warn!(
                "Progress upsert failed after passed attempt {}: {}",
                attempt.id,
                e
            );
            progress_recorded = false;
        }
    }

    let visible = policy::results_visible(passed, attempt.attempt_number, config.max_attempts);
    let can_retry = !passed && attempt.attempt_number < config.max_attempts;

    Ok(Json(QuizAttemptResponse {
        attempt_id: attempt.id,
        passed,
        score: outcome.score,
        total_questions: outcome.total_questions,
        percentage: outcome.percentage,
        attempts_count: i64::from(attempt.attempt_number),
        max_attempts: config.max_attempts,
        can_retry,
        results: visible.then_some(outcome.results),
        progress_recorded,
    }))
}

/// Fetches the quiz state for the requesting student.
///
/// The answer key never leaves the server here: questions are mapped to
/// their public DTO, and the best attempt's results are stripped unless
/// the student has passed or run out of retries.
pub async fn get_quiz_state(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Query(query): Query<QuizStateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let item = state
        .catalog
        .get_item(quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;
    let config = match item.kind {
        ItemKind::Quiz(config) => config,
        _ => return Err(AppError::BadRequest("Item is not a quiz".to_string())),
    };

    let paths = state
        .enrollment
        .resolve_paths(student_id, item.course_id)
        .await?;
    require_path(&paths, query.cohort_id)?;

    let scope = ScopeKey::new(student_id, quiz_id, query.cohort_id);
    let attempts = store::attempts::list_attempts(&state.pool, &scope).await?;

    let stats = policy::AttemptStats {
        count: attempts.len() as i64,
        passed: attempts.iter().any(|a| a.passed),
    };
    let can_retry = policy::can_retry(&stats, config.max_attempts);

    // Best attempt: the passed one if any, else the most recent.
    let latest_attempt = attempts
        .iter()
        .find(|a| a.passed)
        .or_else(|| attempts.last())
        .cloned()
        .map(|mut attempt| {
            if !policy::results_visible(attempt.passed, attempt.attempt_number, config.max_attempts)
            {
                attempt.results = None;
            }
            attempt
        });

    let questions: Vec<PublicQuizQuestion> =
        config.questions.iter().map(PublicQuizQuestion::from).collect();

    Ok(Json(QuizStateResponse {
        quiz_id,
        course_id: item.course_id,
        title: item.title,
        questions,
        max_attempts: config.max_attempts,
        passing_grade: config.passing_grade,
        attempts_count: stats.count,
        passed: stats.passed,
        can_retry,
        latest_attempt,
    }))
}
