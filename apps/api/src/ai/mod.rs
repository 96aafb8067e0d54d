//! AI features built on `LlmClient`: résumé analysis, job matching, cover
//! letters and LaTeX résumé enhancement.
//!
//! Model replies are read as raw JSON and coerced field by field, so a reply
//! with missing or mistyped fields still yields a well-formed result.

pub mod analysis;
pub mod coerce;
pub mod cover_letter;
pub mod enhance;
pub mod handlers;
pub mod matching;
pub mod prompts;

pub use analysis::{analyze_resume, ResumeAnalysisResult};
pub use cover_letter::generate_cover_letter;
pub use enhance::enhance_resume;
pub use matching::{calculate_job_match, JobMatchResult};
