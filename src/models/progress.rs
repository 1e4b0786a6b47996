// src/models/progress.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'progress_records' table in the database.
/// Exactly one row per scope triple, maintained by upsert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub item_id: i64,
    pub cohort_id: Option<i64>,
    pub is_completed: bool,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Query parameters for the course progress fetch.
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub cohort_id: Option<i64>,
}

/// DTO for the explicit completion toggle (lessons and live classes).
#[derive(Debug, Deserialize)]
pub struct SetProgressRequest {
    pub item_id: i64,
    pub cohort_id: Option<i64>,
    pub is_completed: bool,
}

/// Completion state of one item within the course roll-up.
#[derive(Debug, Serialize)]
pub struct ItemProgress {
    pub item_id: i64,
    pub is_completed: bool,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregate view returned by the course progress fetch.
#[derive(Debug, Serialize)]
pub struct CourseProgressResponse {
    pub course_id: i64,
    pub cohort_id: Option<i64>,
    /// round(100 * completed / total), 0 for an empty course.
    pub percent: u8,
    pub items: Vec<ItemProgress>,
}
