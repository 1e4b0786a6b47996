// src/routes.rs

use std::sync::Arc;

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assignment, progress, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, tutor_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quizzes, assignments, submissions, progress).
/// * Every route sits behind the bearer-token middleware; grading
///   additionally requires a tutor role.
/// * Applies global middleware (Trace, CORS, rate limiting).
/// * Injects global state (pool, config, catalog, enrollment resolver).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(20)
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    let quiz_routes = Router::new()
        .route("/{quiz_id}", get(quiz::get_quiz_state))
        .route("/{quiz_id}/attempts", post(quiz::submit_attempt));

    let assignment_routes = Router::new().route(
        "/{item_id}/submission",
        get(assignment::get_submission).put(assignment::submit_assignment),
    );

    // Tutor-facing grading endpoint: Auth first, then role check.
    let submission_routes = Router::new()
        .route("/{id}/grade", post(assignment::grade_assignment))
        .layer(middleware::from_fn(tutor_middleware));

    let progress_routes = Router::new().route(
        "/{course_id}/progress",
        get(progress::get_course_progress).post(progress::set_item_progress),
    );

    Router::new()
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/assignments", assignment_routes)
        .nest("/api/submissions", submission_routes)
        .nest("/api/courses", progress_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(GovernorLayer::new(governor_conf)),
        )
        .with_state(state)
}
