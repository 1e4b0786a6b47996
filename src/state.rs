use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::catalog::{CurriculumCatalog, PgCurriculumCatalog};
use crate::config::Config;
use crate::enrollment::{EnrollmentResolver, PgEnrollmentResolver};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub catalog: Arc<dyn CurriculumCatalog>,
    pub enrollment: Arc<dyn EnrollmentResolver>,
}

impl AppState {
    /// Wires the Postgres-backed catalog and enrollment resolver.
    pub fn new(pool: PgPool, config: Config) -> Self {
        let catalog = Arc::new(PgCurriculumCatalog::new(pool.clone()));
        let enrollment = Arc::new(PgEnrollmentResolver::new(pool.clone()));
        Self {
            pool,
            config,
            catalog,
            enrollment,
        }
    }

    pub fn with_services(
        pool: PgPool,
        config: Config,
        catalog: Arc<dyn CurriculumCatalog>,
        enrollment: Arc<dyn EnrollmentResolver>,
    ) -> Self {
        Self {
            pool,
            config,
            catalog,
            enrollment,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
