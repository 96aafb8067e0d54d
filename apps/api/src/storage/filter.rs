//! Job search filter composer.
//!
//! Query-string criteria are parsed into a `JobFilter`, then rendered into a
//! parameterized Postgres query. Every value is bound; nothing user-supplied is
//! spliced into the SQL text.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::models::job::{ExperienceLevel, JobType};
use crate::models::validation::non_blank;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Location value the client sends to mean "anywhere".
pub const ANY_LOCATION: &str = "All Pakistan";

const JOB_SELECT: &str = "SELECT jobs.* FROM jobs \
     INNER JOIN companies ON companies.id = jobs.company_id \
     WHERE jobs.is_active = TRUE";

/// Raw query-string parameters for `GET /api/jobs`. All optional; blank means absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    /// Comma separated.
    pub skills: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub skills: Vec<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            search: None,
            location: None,
            job_type: None,
            experience_level: None,
            salary_min: None,
            salary_max: None,
            skills: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl TryFrom<JobQuery> for JobFilter {
    type Error = AppError;

    fn try_from(query: JobQuery) -> Result<Self, Self::Error> {
        let location = non_blank(query.location).filter(|l| l != ANY_LOCATION);
        let job_type = non_blank(query.job_type)
            .map(|s| s.parse::<JobType>())
            .transpose()?;
        let experience_level = non_blank(query.experience_level)
            .map(|s| s.parse::<ExperienceLevel>())
            .transpose()?;
        // A zero bound filters nothing, same as leaving it out.
        let salary_min = parse_number::<f64>("salaryMin", query.salary_min)?.filter(|v| *v > 0.0);
        let salary_max = parse_number::<f64>("salaryMax", query.salary_max)?.filter(|v| *v > 0.0);
        let skills = query
            .skills
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let limit = parse_number::<i64>("limit", query.limit)?
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        let offset = parse_number::<i64>("offset", query.offset)?
            .unwrap_or(0)
            .max(0);

        Ok(JobFilter {
            search: non_blank(query.search),
            location,
            job_type,
            experience_level,
            salary_min,
            salary_max,
            skills,
            limit,
            offset,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &str,
    raw: Option<String>,
) -> Result<Option<T>, AppError> {
    non_blank(raw)
        .map(|s| {
            s.parse::<T>()
                .map_err(|_| AppError::Validation(format!("{field} must be a number")))
        })
        .transpose()
}

/// Wraps `term` for a substring `ILIKE`, escaping LIKE wildcards so the term
/// matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Builds the active-only, newest-first job listing query for `filter`.
pub fn build_job_query(filter: &JobFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(JOB_SELECT);

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (jobs.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR jobs.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = &filter.location {
        qb.push(" AND jobs.location ILIKE ")
            .push_bind(like_pattern(location));
    }
    if let Some(job_type) = filter.job_type {
        qb.push(" AND jobs.job_type = ").push_bind(job_type);
    }
    if let Some(level) = filter.experience_level {
        qb.push(" AND jobs.experience_level = ").push_bind(level);
    }
    if let Some(min) = filter.salary_min {
        qb.push(" AND jobs.salary_min >= ").push_bind(min);
    }
    if let Some(max) = filter.salary_max {
        qb.push(" AND jobs.salary_max <= ").push_bind(max);
    }
    if !filter.skills.is_empty() {
        qb.push(" AND jobs.skills && ").push_bind(filter.skills.clone());
    }

    qb.push(" ORDER BY jobs.created_at DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);
    qb
}

/// Free-text search over title, description and company name.
pub fn build_search_query(term: &str, limit: i64) -> QueryBuilder<'static, Postgres> {
    let pattern = like_pattern(term.trim());
    let mut qb = QueryBuilder::new(JOB_SELECT);
    qb.push(" AND (jobs.title ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR jobs.description ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR companies.name ILIKE ")
        .push_bind(pattern)
        .push(") ORDER BY jobs.created_at DESC LIMIT ")
        .push_bind(limit);
    qb
}
