use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::validation::{
    non_blank, require_non_empty, validate_email, validate_password,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    JobSeeker,
    Employer,
    Admin,
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub profile_picture: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
        }
    }
}

/// The subset of a user returned alongside a freshly issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(AppError::Validation("Passwords don't match".to_string()));
        }
        require_non_empty("firstName", &self.first_name)?;
        require_non_empty("lastName", &self.last_name)?;
        if self.role == UserRole::Admin {
            return Err(AppError::Validation(
                "role must be job_seeker or employer".to_string(),
            ));
        }
        Ok(())
    }

    /// Consumes the request into a storage record once the password is hashed.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            email: normalize_email(&self.email),
            password_hash,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            role: self.role,
            phone: non_blank(self.phone),
            location: non_blank(self.location),
            bio: non_blank(self.bio),
            skills: self.skills,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(first) = &self.first_name {
            require_non_empty("firstName", first)?;
        }
        if let Some(last) = &self.last_name {
            require_non_empty("lastName", last)?;
        }
        Ok(())
    }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: "sara@example.pk".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            first_name: "Sara".to_string(),
            last_name: "Khan".to_string(),
            role: UserRole::default(),
            phone: None,
            location: Some("  ".to_string()),
            bio: None,
            skills: vec![],
        }
    }

    #[test]
    fn test_register_rejects_mismatched_confirmation() {
        let err = register("secret1", "secret2").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Passwords don't match"));
    }

    #[test]
    fn test_register_accepts_valid_payload() {
        assert!(register("secret1", "secret1").validate().is_ok());
    }

    #[test]
    fn test_into_new_user_normalizes_fields() {
        let mut req = register("secret1", "secret1");
        req.email = " Sara@Example.PK ".to_string();
        let new_user = req.into_new_user("hash".to_string());
        assert_eq!(new_user.email, "sara@example.pk");
        assert_eq!(new_user.location, None);
        assert_eq!(new_user.role, UserRole::JobSeeker);
    }

    #[test]
    fn test_admin_cannot_self_register() {
        let mut req = register("secret1", "secret1");
        req.role = UserRole::Admin;
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.role = UserRole::Employer;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_role_defaults_to_job_seeker_when_omitted() {
        let json = r#"{
            "email": "a@b.co", "password": "secret1", "confirmPassword": "secret1",
            "firstName": "A", "lastName": "B"
        }"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.role, UserRole::JobSeeker);
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            password_hash: "$2b$10$secret".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: UserRole::Employer,
            profile_picture: None,
            phone: None,
            location: None,
            bio: None,
            skills: vec![],
            experience: None,
            education: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            portfolio_url: None,
            is_email_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "employer");
        assert_eq!(json["firstName"], "A");
    }
}
