use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::JobWithCompany;

/// A user's bookmark of a job. Unique per (user, job).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedJobWithJob {
    #[serde(flatten)]
    pub saved: SavedJob,
    pub job: JobWithCompany,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobRequest {
    pub job_id: Uuid,
}
