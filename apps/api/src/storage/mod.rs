//! Persistence layer.
//!
//! Handlers only ever see `Arc<dyn Storage>`. `PgStorage` is the production
//! backend; tests drive the router against an in-memory implementation.

pub mod filter;
#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationStatus, ApplicationWithApplicant, ApplicationWithJob, JobApplication,
    NewApplication,
};
use crate::models::company::{Company, NewCompany};
use crate::models::job::{Job, JobWithCompany, NewJob};
use crate::models::latex::{LatexResumeTemplate, TemplateRecord};
use crate::models::resume_analysis::{NewResumeAnalysis, ResumeAnalysis};
use crate::models::saved_job::{SavedJob, SavedJobWithJob};
use crate::models::user::{NewUser, ProfileUpdate, User};

pub use filter::JobFilter;
pub use postgres::PgStorage;

pub const DEFAULT_COMPANY_PAGE: i64 = 50;
pub const FEATURED_JOBS_LIMIT: i64 = 6;
pub const SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: i64,
    pub total_companies: i64,
    pub total_candidates: i64,
}

#[async_trait]
pub trait Storage: Send + Sync {
    // ── users ──────────────────────────────────────────────────────────────
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    /// Lookup is by normalized (trimmed, lowercased) email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn update_user_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError>;
    async fn set_user_resume_url(&self, id: Uuid, resume_url: &str) -> Result<(), AppError>;

    // ── companies ──────────────────────────────────────────────────────────
    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError>;
    async fn list_companies(&self, limit: i64, offset: i64) -> Result<Vec<Company>, AppError>;
    async fn create_company(&self, company: NewCompany) -> Result<Company, AppError>;

    // ── jobs ───────────────────────────────────────────────────────────────
    async fn get_job(&self, id: Uuid) -> Result<Option<JobWithCompany>, AppError>;
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>, AppError>;
    async fn featured_jobs(&self, limit: i64) -> Result<Vec<JobWithCompany>, AppError>;
    /// Matches title, description or company name.
    async fn search_jobs(&self, query: &str, limit: i64) -> Result<Vec<JobWithCompany>, AppError>;
    async fn create_job(&self, job: NewJob) -> Result<Job, AppError>;
    /// Persists every mutable column of `job`.
    async fn update_job(&self, job: Job) -> Result<Job, AppError>;
    async fn job_stats(&self) -> Result<JobStats, AppError>;

    // ── applications ───────────────────────────────────────────────────────
    async fn get_application(&self, id: Uuid) -> Result<Option<JobApplication>, AppError>;
    async fn list_applications_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, AppError>;
    async fn list_applications_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, AppError>;
    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, AppError>;
    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, AppError>;

    // ── saved jobs ─────────────────────────────────────────────────────────
    async fn list_saved_jobs(&self, user_id: Uuid) -> Result<Vec<SavedJobWithJob>, AppError>;
    /// Fails with `Conflict` when the pair is already saved.
    async fn create_saved_job(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob, AppError>;
    /// Returns `false` when nothing was deleted.
    async fn delete_saved_job(&self, user_id: Uuid, job_id: Uuid) -> Result<bool, AppError>;

    // ── resume analyses ────────────────────────────────────────────────────
    async fn create_resume_analysis(
        &self,
        analysis: NewResumeAnalysis,
    ) -> Result<ResumeAnalysis, AppError>;
    async fn list_resume_analyses(&self, user_id: Uuid) -> Result<Vec<ResumeAnalysis>, AppError>;

    // ── LaTeX templates ────────────────────────────────────────────────────
    async fn list_latex_templates(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LatexResumeTemplate>, AppError>;
    async fn get_latex_template(&self, id: Uuid) -> Result<Option<LatexResumeTemplate>, AppError>;
    /// Marking a template as default clears the flag on the user's others.
    async fn create_latex_template(
        &self,
        record: TemplateRecord,
    ) -> Result<LatexResumeTemplate, AppError>;
    async fn update_latex_template(
        &self,
        id: Uuid,
        record: TemplateRecord,
    ) -> Result<Option<LatexResumeTemplate>, AppError>;
    async fn delete_latex_template(&self, id: Uuid) -> Result<bool, AppError>;
}
