// src/models/enrollment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One way a student can reach a course: directly (`cohort_id = None`,
/// never locked) or through a cohort whose course link may be locked.
#[derive(Debug, Clone, Copy, FromRow, Serialize, Deserialize)]
pub struct EnrollmentPath {
    pub cohort_id: Option<i64>,
    pub locked: bool,
}
