//! In-memory `Storage` used by router tests. Mirrors the Postgres semantics the
//! handlers depend on: unique email and saved pairs, active-only newest-first
//! listings, case-insensitive substring matching.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::types::Json;
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
use crate::models::user::{normalize_email, NewUser, ProfileUpdate, User, UserRole};
use crate::storage::{JobFilter, JobStats, Storage};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    companies: Vec<Company>,
    jobs: Vec<Job>,
    applications: Vec<JobApplication>,
    saved: Vec<SavedJob>,
    analyses: Vec<ResumeAnalysis>,
    templates: Vec<LatexResumeTemplate>,
    /// Monotonic clock so insertion order is observable through timestamps.
    tick: i64,
}

impl Tables {
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.tick += 1;
        Utc::now() + Duration::milliseconds(self.tick)
    }

    fn with_company(&self, job: &Job) -> Option<JobWithCompany> {
        self.companies
            .iter()
            .find(|c| c.id == job.company_id)
            .map(|company| JobWithCompany {
                job: job.clone(),
                company: company.clone(),
            })
    }

    fn job_with_company(&self, id: Uuid) -> Option<JobWithCompany> {
        self.jobs
            .iter()
            .find(|j| j.id == id)
            .and_then(|j| self.with_company(j))
    }

    fn active_newest_first(&self) -> Vec<JobWithCompany> {
        let mut jobs: Vec<_> = self
            .jobs
            .iter()
            .filter(|j| j.is_active)
            .filter_map(|j| self.with_company(j))
            .collect();
        jobs.sort_by(|a, b| b.job.created_at.cmp(&a.job.created_at));
        jobs
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(entry: &JobWithCompany, filter: &JobFilter) -> bool {
    let job = &entry.job;
    if let Some(search) = &filter.search {
        if !contains_ci(&job.title, search) && !contains_ci(&job.description, search) {
            return false;
        }
    }
    if let Some(location) = &filter.location {
        if !contains_ci(&job.location, location) {
            return false;
        }
    }
    if filter.job_type.is_some_and(|t| t != job.job_type) {
        return false;
    }
    if filter
        .experience_level
        .is_some_and(|l| l != job.experience_level)
    {
        return false;
    }
    if let Some(min) = filter.salary_min {
        if !job.salary_min.is_some_and(|s| s >= min) {
            return false;
        }
    }
    if let Some(max) = filter.salary_max {
        if !job.salary_max.is_some_and(|s| s <= max) {
            return false;
        }
    }
    if !filter.skills.is_empty() && !filter.skills.iter().any(|s| job.skills.contains(s)) {
        return false;
    }
    true
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }
        let now = t.now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            profile_picture: None,
            phone: user.phone,
            location: user.location,
            bio: user.bio,
            skills: user.skills,
            experience: None,
            education: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            portfolio_url: None,
            is_email_verified: false,
            created_at: now,
            updated_at: now,
        };
        t.users.push(created.clone());
        Ok(created)
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = update.first_name {
            user.first_name = v;
        }
        if let Some(v) = update.last_name {
            user.last_name = v;
        }
        user.profile_picture = update.profile_picture.or(user.profile_picture.take());
        user.phone = update.phone.or(user.phone.take());
        user.location = update.location.or(user.location.take());
        user.bio = update.bio.or(user.bio.take());
        if let Some(v) = update.skills {
            user.skills = v;
        }
        user.experience = update.experience.or(user.experience.take());
        user.education = update.education.or(user.education.take());
        user.linkedin_url = update.linkedin_url.or(user.linkedin_url.take());
        user.github_url = update.github_url.or(user.github_url.take());
        user.portfolio_url = update.portfolio_url.or(user.portfolio_url.take());
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn set_user_resume_url(&self, id: Uuid, resume_url: &str) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(user) = t.users.iter_mut().find(|u| u.id == id) {
            user.resume_url = Some(resume_url.to_string());
        }
        Ok(())
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list_companies(&self, limit: i64, offset: i64) -> Result<Vec<Company>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut companies = t.companies.clone();
        companies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(companies
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let created = Company {
            id: Uuid::new_v4(),
            name: company.name,
            description: company.description,
            industry: company.industry,
            size: company.size,
            website: company.website,
            logo: company.logo,
            location: company.location,
            founded_year: company.founded_year,
            benefits: company.benefits,
            culture: company.culture,
            owner_id: company.owner_id,
            created_at: now,
            updated_at: now,
        };
        t.companies.push(created.clone());
        Ok(created)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobWithCompany>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.job_with_company(id))
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.active_newest_first()
            .into_iter()
            .filter(|j| matches_filter(j, filter))
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn featured_jobs(&self, limit: i64) -> Result<Vec<JobWithCompany>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.active_newest_first()
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn search_jobs(&self, query: &str, limit: i64) -> Result<Vec<JobWithCompany>, AppError> {
        let query = query.trim();
        let t = self.tables.lock().unwrap();
        Ok(t.active_newest_first()
            .into_iter()
            .filter(|j| {
                contains_ci(&j.job.title, query)
                    || contains_ci(&j.job.description, query)
                    || contains_ci(&j.company.name, query)
            })
            .take(limit as usize)
            .collect())
    }

    async fn create_job(&self, job: NewJob) -> Result<Job, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let created = Job {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            responsibilities: job.responsibilities,
            company_id: job.company_id,
            location: job.location,
            job_type: job.job_type,
            experience_level: job.experience_level,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            currency: job.currency,
            skills: job.skills,
            benefits: job.benefits,
            is_remote: job.is_remote,
            is_active: job.is_active,
            posted_by_id: job.posted_by_id,
            created_at: now,
            updated_at: now,
            expires_at: job.expires_at,
        };
        t.jobs.push(created.clone());
        Ok(created)
    }

    async fn update_job(&self, job: Job) -> Result<Job, AppError> {
        let mut t = self.tables.lock().unwrap();
        let slot = t
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
        *slot = job.clone();
        Ok(job)
    }

    async fn job_stats(&self) -> Result<JobStats, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(JobStats {
            total_jobs: t.jobs.iter().filter(|j| j.is_active).count() as i64,
            total_companies: t.companies.len() as i64,
            total_candidates: t
                .users
                .iter()
                .filter(|u| u.role == UserRole::JobSeeker)
                .count() as i64,
        })
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<JobApplication>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_applications_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut out: Vec<_> = t
            .applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| {
                t.job_with_company(a.job_id).map(|job| ApplicationWithJob {
                    application: a.clone(),
                    job,
                })
            })
            .collect();
        out.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        Ok(out)
    }

    async fn list_applications_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut out: Vec<_> = t
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .filter_map(|a| {
                t.users
                    .iter()
                    .find(|u| u.id == a.user_id)
                    .map(|user| ApplicationWithApplicant {
                        application: a.clone(),
                        user: user.clone(),
                    })
            })
            .collect();
        out.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        Ok(out)
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let created = JobApplication {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            user_id: application.user_id,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            status: ApplicationStatus::Pending,
            ai_match_score: application.ai_match_score,
            applied_at: now,
            updated_at: now,
        };
        t.applications.push(created.clone());
        Ok(created)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        Ok(t.applications.iter_mut().find(|a| a.id == id).map(|a| {
            a.status = status;
            a.updated_at = now;
            a.clone()
        }))
    }

    async fn list_saved_jobs(&self, user_id: Uuid) -> Result<Vec<SavedJobWithJob>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut out: Vec<_> = t
            .saved
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                t.job_with_company(s.job_id).map(|job| SavedJobWithJob {
                    saved: s.clone(),
                    job,
                })
            })
            .collect();
        out.sort_by(|a, b| b.saved.saved_at.cmp(&a.saved.saved_at));
        Ok(out)
    }

    async fn create_saved_job(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.saved
            .iter()
            .any(|s| s.user_id == user_id && s.job_id == job_id)
        {
            return Err(AppError::Conflict("Job is already saved".to_string()));
        }
        let saved_at = t.now();
        let saved = SavedJob {
            id: Uuid::new_v4(),
            user_id,
            job_id,
            saved_at,
        };
        t.saved.push(saved.clone());
        Ok(saved)
    }

    async fn delete_saved_job(&self, user_id: Uuid, job_id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.saved.len();
        t.saved
            .retain(|s| !(s.user_id == user_id && s.job_id == job_id));
        Ok(t.saved.len() < before)
    }

    async fn create_resume_analysis(
        &self,
        analysis: NewResumeAnalysis,
    ) -> Result<ResumeAnalysis, AppError> {
        let mut t = self.tables.lock().unwrap();
        let created_at = t.now();
        let created = ResumeAnalysis {
            id: Uuid::new_v4(),
            user_id: analysis.user_id,
            resume_url: analysis.resume_url,
            ats_score: analysis.ats_score,
            keyword_optimization: analysis.keyword_optimization,
            suggestions: analysis.suggestions,
            analysis_data: Json(analysis.analysis_data),
            created_at,
        };
        t.analyses.push(created.clone());
        Ok(created)
    }

    async fn list_resume_analyses(&self, user_id: Uuid) -> Result<Vec<ResumeAnalysis>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut out: Vec<_> = t
            .analyses
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_latex_templates(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LatexResumeTemplate>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut out: Vec<_> = t
            .templates
            .iter()
            .filter(|tpl| tpl.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    async fn get_latex_template(&self, id: Uuid) -> Result<Option<LatexResumeTemplate>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.templates.iter().find(|tpl| tpl.id == id).cloned())
    }

    async fn create_latex_template(
        &self,
        record: TemplateRecord,
    ) -> Result<LatexResumeTemplate, AppError> {
        let mut t = self.tables.lock().unwrap();
        if record.is_default {
            for tpl in t.templates.iter_mut().filter(|tpl| tpl.user_id == record.user_id) {
                tpl.is_default = false;
            }
        }
        let now = t.now();
        let created = LatexResumeTemplate {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            name: record.name,
            resume_data: Json(record.resume_data),
            latex_content: record.latex_content,
            is_default: record.is_default,
            created_at: now,
            updated_at: now,
        };
        t.templates.push(created.clone());
        Ok(created)
    }

    async fn update_latex_template(
        &self,
        id: Uuid,
        record: TemplateRecord,
    ) -> Result<Option<LatexResumeTemplate>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if record.is_default {
            for tpl in t
                .templates
                .iter_mut()
                .filter(|tpl| tpl.user_id == record.user_id && tpl.id != id)
            {
                tpl.is_default = false;
            }
        }
        let now = t.now();
        Ok(t.templates.iter_mut().find(|tpl| tpl.id == id).map(|tpl| {
            tpl.name = record.name;
            tpl.resume_data = Json(record.resume_data);
            tpl.latex_content = record.latex_content;
            tpl.is_default = record.is_default;
            tpl.updated_at = now;
            tpl.clone()
        }))
    }

    async fn delete_latex_template(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.templates.len();
        t.templates.retain(|tpl| tpl.id != id);
        Ok(t.templates.len() < before)
    }
}

/// Lets tests pin a job's creation time to check ordering.
impl MemoryStorage {
    pub fn set_job_created_at(&self, id: Uuid, created_at: chrono::DateTime<Utc>) {
        let mut t = self.tables.lock().unwrap();
        if let Some(job) = t.jobs.iter_mut().find(|j| j.id == id) {
            job.created_at = created_at;
        }
    }
}
