// src/enrollment.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::enrollment::EnrollmentPath;

/// Read-only view of the enrollment/cohort membership store.
///
/// Returns every path a student holds into a course. Direct enrollments
/// (no cohort) are never locked; cohort paths inherit the lock flag of
/// their course-cohort link.
#[async_trait]
pub trait EnrollmentResolver: Send + Sync {
    async fn resolve_paths(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<EnrollmentPath>, AppError>;
}

pub struct PgEnrollmentResolver {
    pool: PgPool,
}

impl PgEnrollmentResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentResolver for PgEnrollmentResolver {
    async fn resolve_paths(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<EnrollmentPath>, AppError> {
        let paths = sqlx::query_as::<_, EnrollmentPath>(
            r#"
            SELECT e.cohort_id, COALESCE(cc.locked, FALSE) AS locked
            FROM enrollments e
            LEFT JOIN course_cohorts cc
                ON cc.course_id = e.course_id AND cc.cohort_id = e.cohort_id
            WHERE e.student_id = $1 AND e.course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve enrollment paths: {:?}", e);
            AppError::from(e)
        })?;

        Ok(paths)
    }
}

/// The path matching the requested cohort scope, if the student holds one.
pub fn find_path(paths: &[EnrollmentPath], cohort_id: Option<i64>) -> Option<&EnrollmentPath> {
    paths.iter().find(|p| p.cohort_id == cohort_id)
}

/// Read access: the scope's enrollment path must exist.
pub fn require_path(paths: &[EnrollmentPath], cohort_id: Option<i64>) -> Result<(), AppError> {
    find_path(paths, cohort_id)
        .map(|_| ())
        .ok_or_else(|| AppError::Forbidden("Not enrolled in this course".to_string()))
}

/// Write access: the scope's enrollment path must exist and be unlocked.
/// A locked path is an authorization failure, not a validation failure.
pub fn require_unlocked_path(
    paths: &[EnrollmentPath],
    cohort_id: Option<i64>,
) -> Result<(), AppError> {
    let path = find_path(paths, cohort_id)
        .ok_or_else(|| AppError::Forbidden("Not enrolled in this course".to_string()))?;

    if path.locked {
        return Err(AppError::Forbidden(
            "Enrollment path is locked".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Vec<EnrollmentPath> {
        vec![
            EnrollmentPath {
                cohort_id: None,
                locked: false,
            },
            EnrollmentPath {
                cohort_id: Some(7),
                locked: true,
            },
        ]
    }

    #[test]
    fn test_direct_path_allows_writes() {
        assert!(require_unlocked_path(&paths(), None).is_ok());
    }

    #[test]
    fn test_locked_cohort_rejects_writes_but_not_reads() {
        let paths = paths();
        assert!(require_unlocked_path(&paths, Some(7)).is_err());
        assert!(require_path(&paths, Some(7)).is_ok());
    }

    #[test]
    fn test_unknown_cohort_is_not_a_path() {
        let paths = paths();
        // Holding a path for cohort 7 grants nothing for cohort 8.
        assert!(require_path(&paths, Some(8)).is_err());
        assert!(require_unlocked_path(&paths, Some(8)).is_err());
    }

    #[test]
    fn test_cohort_path_does_not_grant_direct_scope() {
        let only_cohort = vec![EnrollmentPath {
            cohort_id: Some(7),
            locked: false,
        }];
        assert!(require_path(&only_cohort, None).is_err());
    }
}
