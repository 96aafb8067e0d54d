use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
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
use crate::storage::filter::{build_job_query, build_search_query, JobFilter};
use crate::storage::{JobStats, Storage};

/// Postgres-backed storage over a shared connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Joins each job with its company. Jobs whose company is missing are dropped,
    /// matching the inner join used by the listing queries.
    async fn attach_companies(&self, jobs: Vec<Job>) -> Result<Vec<JobWithCompany>, AppError> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = jobs
            .iter()
            .map(|j| j.company_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let companies: HashMap<Uuid, Company> =
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ANY($1)")
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();

        Ok(jobs
            .into_iter()
            .filter_map(|job| {
                companies
                    .get(&job.company_id)
                    .cloned()
                    .map(|company| JobWithCompany { job, company })
            })
            .collect())
    }

    async fn jobs_by_id(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, JobWithCompany>, AppError> {
        let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(self
            .attach_companies(jobs)
            .await?
            .into_iter()
            .map(|j| (j.job.id, j))
            .collect())
    }

    async fn count(&self, sql: &str) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (email, password, first_name, last_name, role, phone, location, bio, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(&user.phone)
        .bind(&user.location)
        .bind(&user.bio)
        .bind(&user.skills)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "User already exists with this email"))?;

        info!("Created user {} ({:?})", created.id, created.role);
        Ok(created)
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name      = COALESCE($2, first_name),
                last_name       = COALESCE($3, last_name),
                profile_picture = COALESCE($4, profile_picture),
                phone           = COALESCE($5, phone),
                location        = COALESCE($6, location),
                bio             = COALESCE($7, bio),
                skills          = COALESCE($8, skills),
                experience      = COALESCE($9, experience),
                education       = COALESCE($10, education),
                linkedin_url    = COALESCE($11, linkedin_url),
                github_url      = COALESCE($12, github_url),
                portfolio_url   = COALESCE($13, portfolio_url),
                updated_at      = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.profile_picture)
        .bind(update.phone)
        .bind(update.location)
        .bind(update.bio)
        .bind(update.skills)
        .bind(update.experience)
        .bind(update.education)
        .bind(update.linkedin_url)
        .bind(update.github_url)
        .bind(update.portfolio_url)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_user_resume_url(&self, id: Uuid, resume_url: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET resume_url = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(resume_url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_companies(&self, limit: i64, offset: i64) -> Result<Vec<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            "SELECT * FROM companies ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, AppError> {
        let created = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (name, description, industry, size, website, logo, location,
                 founded_year, benefits, culture, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.industry)
        .bind(&company.size)
        .bind(&company.website)
        .bind(&company.logo)
        .bind(&company.location)
        .bind(company.founded_year)
        .bind(&company.benefits)
        .bind(&company.culture)
        .bind(company.owner_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Created company {} '{}'", created.id, created.name);
        Ok(created)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobWithCompany>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match job {
            Some(job) => Ok(self.attach_companies(vec![job]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>, AppError> {
        let mut qb = build_job_query(filter);
        let jobs = qb.build_query_as::<Job>().fetch_all(&self.pool).await?;
        self.attach_companies(jobs).await
    }

    async fn featured_jobs(&self, limit: i64) -> Result<Vec<JobWithCompany>, AppError> {
        let filter = JobFilter {
            limit,
            ..JobFilter::default()
        };
        self.list_jobs(&filter).await
    }

    async fn search_jobs(&self, query: &str, limit: i64) -> Result<Vec<JobWithCompany>, AppError> {
        let mut qb = build_search_query(query, limit);
        let jobs = qb.build_query_as::<Job>().fetch_all(&self.pool).await?;
        self.attach_companies(jobs).await
    }

    async fn create_job(&self, job: NewJob) -> Result<Job, AppError> {
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (title, description, requirements, responsibilities, company_id, location,
                 job_type, experience_level, salary_min, salary_max, currency, skills,
                 benefits, is_remote, is_active, posted_by_id, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.responsibilities)
        .bind(job.company_id)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(job.experience_level)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.currency)
        .bind(&job.skills)
        .bind(&job.benefits)
        .bind(job.is_remote)
        .bind(job.is_active)
        .bind(job.posted_by_id)
        .bind(job.expires_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job {} '{}'", created.id, created.title);
        Ok(created)
    }

    async fn update_job(&self, job: Job) -> Result<Job, AppError> {
        Ok(sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                title = $2, description = $3, requirements = $4, responsibilities = $5,
                location = $6, job_type = $7, experience_level = $8, salary_min = $9,
                salary_max = $10, currency = $11, skills = $12, benefits = $13,
                is_remote = $14, is_active = $15, expires_at = $16, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.responsibilities)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(job.experience_level)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.currency)
        .bind(&job.skills)
        .bind(&job.benefits)
        .bind(job.is_remote)
        .bind(job.is_active)
        .bind(job.expires_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn job_stats(&self) -> Result<JobStats, AppError> {
        Ok(JobStats {
            total_jobs: self
                .count("SELECT COUNT(*) FROM jobs WHERE is_active = TRUE")
                .await?,
            total_companies: self.count("SELECT COUNT(*) FROM companies").await?,
            total_candidates: sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE role = $1",
            )
            .bind(UserRole::JobSeeker)
            .fetch_one(&self.pool)
            .await?,
        })
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<JobApplication>, AppError> {
        Ok(
            sqlx::query_as::<_, JobApplication>("SELECT * FROM job_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_applications_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, AppError> {
        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE user_id = $1 ORDER BY applied_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let job_ids: Vec<Uuid> = applications.iter().map(|a| a.job_id).collect();
        let jobs = self.jobs_by_id(&job_ids).await?;

        Ok(applications
            .into_iter()
            .filter_map(|application| {
                jobs.get(&application.job_id)
                    .cloned()
                    .map(|job| ApplicationWithJob { application, job })
            })
            .collect())
    }

    async fn list_applications_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, AppError> {
        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE job_id = $1 ORDER BY applied_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        let user_ids: Vec<Uuid> = applications.iter().map(|a| a.user_id).collect();
        let users: HashMap<Uuid, User> =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
                .bind(&user_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();

        Ok(applications
            .into_iter()
            .filter_map(|application| {
                users
                    .get(&application.user_id)
                    .cloned()
                    .map(|user| ApplicationWithApplicant { application, user })
            })
            .collect())
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, AppError> {
        let created = sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO job_applications (job_id, user_id, cover_letter, resume_url, ai_match_score)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(application.job_id)
        .bind(application.user_id)
        .bind(&application.cover_letter)
        .bind(&application.resume_url)
        .bind(application.ai_match_score)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "User {} applied to job {} (application {})",
            created.user_id, created.job_id, created.id
        );
        Ok(created)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, AppError> {
        Ok(sqlx::query_as::<_, JobApplication>(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_saved_jobs(&self, user_id: Uuid) -> Result<Vec<SavedJobWithJob>, AppError> {
        let saved = sqlx::query_as::<_, SavedJob>(
            "SELECT * FROM saved_jobs WHERE user_id = $1 ORDER BY saved_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let job_ids: Vec<Uuid> = saved.iter().map(|s| s.job_id).collect();
        let jobs = self.jobs_by_id(&job_ids).await?;

        Ok(saved
            .into_iter()
            .filter_map(|saved| {
                jobs.get(&saved.job_id)
                    .cloned()
                    .map(|job| SavedJobWithJob { saved, job })
            })
            .collect())
    }

    async fn create_saved_job(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob, AppError> {
        sqlx::query_as::<_, SavedJob>(
            "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Job is already saved"))
    }

    async fn delete_saved_job(&self, user_id: Uuid, job_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_resume_analysis(
        &self,
        analysis: NewResumeAnalysis,
    ) -> Result<ResumeAnalysis, AppError> {
        Ok(sqlx::query_as::<_, ResumeAnalysis>(
            r#"
            INSERT INTO resume_analyses
                (user_id, resume_url, ats_score, keyword_optimization, suggestions, analysis_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(analysis.user_id)
        .bind(&analysis.resume_url)
        .bind(analysis.ats_score)
        .bind(analysis.keyword_optimization)
        .bind(&analysis.suggestions)
        .bind(Json(&analysis.analysis_data))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_resume_analyses(&self, user_id: Uuid) -> Result<Vec<ResumeAnalysis>, AppError> {
        Ok(sqlx::query_as::<_, ResumeAnalysis>(
            "SELECT * FROM resume_analyses WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_latex_templates(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LatexResumeTemplate>, AppError> {
        Ok(sqlx::query_as::<_, LatexResumeTemplate>(
            "SELECT * FROM latex_resume_templates WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_latex_template(&self, id: Uuid) -> Result<Option<LatexResumeTemplate>, AppError> {
        Ok(sqlx::query_as::<_, LatexResumeTemplate>(
            "SELECT * FROM latex_resume_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_latex_template(
        &self,
        record: TemplateRecord,
    ) -> Result<LatexResumeTemplate, AppError> {
        let mut tx = self.pool.begin().await?;
        if record.is_default {
            sqlx::query("UPDATE latex_resume_templates SET is_default = FALSE WHERE user_id = $1")
                .bind(record.user_id)
                .execute(&mut *tx)
                .await?;
        }
        let created = sqlx::query_as::<_, LatexResumeTemplate>(
            r#"
            INSERT INTO latex_resume_templates
                (user_id, name, resume_data, latex_content, is_default)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(record.user_id)
        .bind(&record.name)
        .bind(Json(&record.resume_data))
        .bind(&record.latex_content)
        .bind(record.is_default)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        info!("Saved LaTeX template {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    async fn update_latex_template(
        &self,
        id: Uuid,
        record: TemplateRecord,
    ) -> Result<Option<LatexResumeTemplate>, AppError> {
        let mut tx = self.pool.begin().await?;
        if record.is_default {
            sqlx::query(
                "UPDATE latex_resume_templates SET is_default = FALSE WHERE user_id = $1 AND id <> $2",
            )
            .bind(record.user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }
        let updated = sqlx::query_as::<_, LatexResumeTemplate>(
            r#"
            UPDATE latex_resume_templates SET
                name = $2, resume_data = $3, latex_content = $4, is_default = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.name)
        .bind(Json(&record.resume_data))
        .bind(&record.latex_content)
        .bind(record.is_default)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_latex_template(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM latex_resume_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::db::create_pool;
    use crate::models::job::{ExperienceLevel, JobType};

    fn new_job(
        company_id: Uuid,
        title: &str,
        location: &str,
        job_type: JobType,
        active: bool,
    ) -> NewJob {
        NewJob {
            title: title.to_string(),
            description: format!("{title} role"),
            requirements: None,
            responsibilities: None,
            company_id,
            location: location.to_string(),
            job_type,
            experience_level: ExperienceLevel::Mid,
            salary_min: None,
            salary_max: None,
            currency: "PKR".into(),
            skills: vec![],
            benefits: vec![],
            is_remote: false,
            is_active: active,
            posted_by_id: None,
            expires_at: None,
        }
    }

    /// Same listing property the router tests check against `MemoryStorage`,
    /// run through the real SQL. `cargo test -- --ignored` with `DATABASE_URL` set.
    #[tokio::test]
    #[ignore = "needs a Postgres database at DATABASE_URL"]
    async fn test_list_jobs_filters_active_only_newest_first() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = create_pool(&url).await.unwrap();
        let storage = PgStorage::new(pool.clone());
        let marker = Uuid::new_v4().simple().to_string();

        let company = storage
            .create_company(NewCompany {
                name: format!("Acme {marker}"),
                description: None,
                industry: None,
                size: None,
                website: None,
                logo: None,
                location: None,
                founded_year: None,
                benefits: vec![],
                culture: None,
                owner_id: None,
            })
            .await
            .unwrap();

        let title = |name: &str| format!("{name} {marker}");
        let older = storage
            .create_job(new_job(company.id, &title("Backend"), "Lahore", JobType::FullTime, true))
            .await
            .unwrap();
        let newer = storage
            .create_job(new_job(company.id, &title("Data"), "Lahore, Punjab", JobType::FullTime, true))
            .await
            .unwrap();
        for job in [
            new_job(company.id, &title("Closed"), "Lahore", JobType::FullTime, false),
            new_job(company.id, &title("Contractor"), "Lahore", JobType::Contract, true),
            new_job(company.id, &title("Karachi"), "Karachi", JobType::FullTime, true),
        ] {
            storage.create_job(job).await.unwrap();
        }

        let now = Utc::now();
        for (id, age) in [(older.id, 2), (newer.id, 1)] {
            sqlx::query("UPDATE jobs SET created_at = $2 WHERE id = $1")
                .bind(id)
                .bind(now - Duration::days(age))
                .execute(&pool)
                .await
                .unwrap();
        }

        let filter = JobFilter {
            search: Some(marker.clone()),
            location: Some("lahore".into()),
            job_type: Some(JobType::FullTime),
            ..JobFilter::default()
        };
        let titles: Vec<String> = storage
            .list_jobs(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.job.title)
            .collect();

        sqlx::query("DELETE FROM jobs WHERE company_id = $1")
            .bind(company.id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(company.id)
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(titles, vec![newer.title, older.title]);
    }
}
