// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use url::Url;
use validator::Validate;

/// Represents the 'assignment_submissions' table in the database.
///
/// At most one row exists per scope triple; resubmission overwrites the
/// submission fields in place and resets `status` to 'submitted'.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AssignmentSubmission {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub cohort_id: Option<i64>,
    pub item_id: i64,
    pub attachments: Json<Vec<String>>,
    pub comment: String,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
    pub points: Option<i32>,
    pub feedback: Option<String>,
    pub grader_id: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting (or resubmitting) an assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAssignmentRequest {
    pub course_id: i64,
    pub cohort_id: Option<i64>,
    #[validate(custom(function = validate_attachment_urls))]
    #[serde(default)]
    pub attachments: Vec<String>,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub comment: String,
}

fn validate_attachment_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("attachment_url_too_long"));
        }
        if Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_attachment_url"));
        }
    }
    Ok(())
}

/// DTO for the tutor-facing grading call.
#[derive(Debug, Deserialize, Validate)]
pub struct GradeAssignmentRequest {
    #[validate(range(min = 0))]
    pub points: i32,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub feedback: String,
}
