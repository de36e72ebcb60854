use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;

/// A job posting from the catalog. Owned by the catalog store; the matching
/// pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: uuid::Uuid,
    pub company_name: String,
    pub job_title: String,
    pub job_location: String,
    pub apply_link: Option<String>,
    pub job_description: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read-only access to the job catalog. No filtering is pushed down; the
/// pipeline filters in-process. Carried as `Arc<dyn JobCatalog>` so tests can
/// substitute an in-memory catalog.
#[async_trait]
pub trait JobCatalog: Send + Sync {
    async fn find_all(&self) -> Result<Vec<JobRow>, AppError>;
}

pub struct PgJobCatalog {
    pool: PgPool,
}

impl PgJobCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobCatalog for PgJobCatalog {
    async fn find_all(&self) -> Result<Vec<JobRow>, AppError> {
        let jobs = sqlx::query_as::<_, JobRow>(
            "SELECT id, company_name, job_title, job_location, apply_link, job_description, source, created_at
             FROM jobs",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }
}

/// Case-insensitive keyword search over title, company, location and
/// description.
pub async fn search_jobs(pool: &PgPool, query: &str) -> Result<Vec<JobRow>, AppError> {
    let pattern = format!("%{query}%");
    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT id, company_name, job_title, job_location, apply_link, job_description, source, created_at
         FROM jobs
         WHERE job_title ILIKE $1
            OR company_name ILIKE $1
            OR job_location ILIKE $1
            OR job_description ILIKE $1",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(jobs)
}
