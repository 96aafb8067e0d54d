pub mod application;
pub mod company;
pub mod job;
pub mod latex;
pub mod resume_analysis;
pub mod saved_job;
pub mod user;
pub mod validation;

/// `{"message": "..."}` acknowledgement body.
#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
