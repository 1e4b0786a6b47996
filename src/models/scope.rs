// src/models/scope.rs

use serde::{Deserialize, Serialize};

/// The (student, item, cohort-or-null) triple that partitions every
/// submission and progress row.
///
/// `cohort_id = None` is the direct (non-cohort) enrollment path. A NULL
/// cohort and a concrete cohort are separate partitions: queries must
/// compare with `IS NOT DISTINCT FROM`, never merge the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub student_id: i64,
    pub item_id: i64,
    pub cohort_id: Option<i64>,
}

impl ScopeKey {
    pub fn new(student_id: i64, item_id: i64, cohort_id: Option<i64>) -> Self {
        Self {
            student_id,
            item_id,
            cohort_id,
        }
    }
}
