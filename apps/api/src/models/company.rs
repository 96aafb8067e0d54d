use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::validation::{non_blank, require_non_empty};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub founded_year: Option<i32>,
    pub benefits: Vec<String>,
    pub culture: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub culture: Option<String>,
}

impl CreateCompanyRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("name", &self.name)
    }

    pub fn into_new_company(self, owner_id: Option<Uuid>) -> NewCompany {
        NewCompany {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            industry: non_blank(self.industry),
            size: non_blank(self.size),
            website: non_blank(self.website),
            logo: non_blank(self.logo),
            location: non_blank(self.location),
            founded_year: self.founded_year,
            benefits: self.benefits,
            culture: non_blank(self.culture),
            owner_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub founded_year: Option<i32>,
    pub benefits: Vec<String>,
    pub culture: Option<String>,
    pub owner_id: Option<Uuid>,
}
