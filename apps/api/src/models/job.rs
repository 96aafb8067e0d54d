use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::Company;
use crate::models::validation::{non_blank, require_non_empty};

pub const DEFAULT_CURRENCY: &str = "PKR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Remote,
}

impl FromStr for JobType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_time" => Ok(JobType::FullTime),
            "part_time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "freelance" => Ok(JobType::Freelance),
            "remote" => Ok(JobType::Remote),
            other => Err(AppError::Validation(format!("Unknown job type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "experience_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "executive" => Ok(ExperienceLevel::Executive),
            other => Err(AppError::Validation(format!(
                "Unknown experience level '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub company_id: Uuid,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: String,
    pub skills: Vec<String>,
    pub benefits: Vec<String>,
    pub is_remote: bool,
    pub is_active: bool,
    pub posted_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A job joined with its owning company, the shape every listing returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: Job,
    pub company: Company,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub company_id: Uuid,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub is_remote: bool,
    pub is_active: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("description", &self.description)?;
        require_non_empty("location", &self.location)?;
        validate_salary_range(self.salary_min, self.salary_max)
    }

    pub fn into_new_job(self, posted_by_id: Uuid) -> NewJob {
        NewJob {
            title: self.title.trim().to_string(),
            description: self.description,
            requirements: non_blank(self.requirements),
            responsibilities: non_blank(self.responsibilities),
            company_id: self.company_id,
            location: self.location.trim().to_string(),
            job_type: self.job_type,
            experience_level: self.experience_level,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            currency: non_blank(self.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            skills: self.skills,
            benefits: self.benefits,
            is_remote: self.is_remote,
            is_active: self.is_active.unwrap_or(true),
            posted_by_id: Some(posted_by_id),
            expires_at: self.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub company_id: Uuid,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: String,
    pub skills: Vec<String>,
    pub benefits: Vec<String>,
    pub is_remote: bool,
    pub is_active: bool,
    pub posted_by_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial job update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: Option<String>,
    pub skills: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub is_remote: Option<bool>,
    pub is_active: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    /// Validates the update against the job it will be applied to, so a new
    /// bound is checked against the bound it leaves in place.
    pub fn validate(&self, current: &Job) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if let Some(v) = value {
                require_non_empty(field, v)?;
            }
        }
        validate_salary_range(
            self.salary_min.or(current.salary_min),
            self.salary_max.or(current.salary_max),
        )
    }

    pub fn apply(self, job: &mut Job) {
        if let Some(v) = self.title {
            job.title = v.trim().to_string();
        }
        if let Some(v) = self.description {
            job.description = v;
        }
        if self.requirements.is_some() {
            job.requirements = non_blank(self.requirements);
        }
        if self.responsibilities.is_some() {
            job.responsibilities = non_blank(self.responsibilities);
        }
        if let Some(v) = self.location {
            job.location = v.trim().to_string();
        }
        if let Some(v) = self.job_type {
            job.job_type = v;
        }
        if let Some(v) = self.experience_level {
            job.experience_level = v;
        }
        if self.salary_min.is_some() {
            job.salary_min = self.salary_min;
        }
        if self.salary_max.is_some() {
            job.salary_max = self.salary_max;
        }
        if let Some(v) = non_blank(self.currency) {
            job.currency = v;
        }
        if let Some(v) = self.skills {
            job.skills = v;
        }
        if let Some(v) = self.benefits {
            job.benefits = v;
        }
        if let Some(v) = self.is_remote {
            job.is_remote = v;
        }
        if let Some(v) = self.is_active {
            job.is_active = v;
        }
        if self.expires_at.is_some() {
            job.expires_at = self.expires_at;
        }
        job.updated_at = Utc::now();
    }
}

fn validate_salary_range(min: Option<f64>, max: Option<f64>) -> Result<(), AppError> {
    for bound in [min, max].into_iter().flatten() {
        if bound < 0.0 {
            return Err(AppError::Validation(
                "Salary bounds cannot be negative".to_string(),
            ));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::Validation(
                "salaryMin cannot exceed salaryMax".to_string(),
            ));
        }
    }
    Ok(())
}
