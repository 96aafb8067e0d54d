use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobWithCompany;
use crate::models::user::User;
use crate::models::validation::non_blank;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    InterviewScheduled,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    /// Review flow: pending → under_review / interview_scheduled → accepted / rejected.
    /// An application may be rejected at any non-terminal stage.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, UnderReview | InterviewScheduled | Rejected)
                | (UnderReview, InterviewScheduled | Accepted | Rejected)
                | (InterviewScheduled, Accepted | Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }

    pub fn transition(self, next: ApplicationStatus) -> Result<ApplicationStatus, AppError> {
        if self.can_transition_to(next) {
            return Ok(next);
        }
        let message = if self.is_terminal() {
            format!(
                "Application is already {} and cannot move to {}",
                self.as_str(),
                next.as_str()
            )
        } else {
            format!(
                "Cannot move application from {} to {}",
                self.as_str(),
                next.as_str()
            )
        };
        Err(AppError::Validation(message))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub ai_match_score: Option<f64>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: JobApplication,
    pub job: JobWithCompany,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: JobApplication,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub ai_match_score: Option<f64>,
}

impl CreateApplicationRequest {
    /// Falls back to the applicant's uploaded résumé when none is attached.
    pub fn into_new_application(self, applicant: &User) -> NewApplication {
        NewApplication {
            job_id: self.job_id,
            user_id: applicant.id,
            cover_letter: non_blank(self.cover_letter),
            resume_url: non_blank(self.resume_url).or_else(|| applicant.resume_url.clone()),
            ai_match_score: self.ai_match_score.map(|s| s.clamp(0.0, 100.0)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub ai_match_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}
