use crate::ai::prompts::{cover_letter_prompt, COVER_LETTER_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

pub const FALLBACK_COVER_LETTER: &str = "Unable to generate cover letter at this time.";

/// Free-text cover letter. An empty completion yields the fallback text.
pub async fn generate_cover_letter(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
    job_title: &str,
    company_name: &str,
) -> Result<String, AppError> {
    let prompt = cover_letter_prompt(resume_text, job_description, job_title, company_name);
    let letter = llm.call_text(&prompt, COVER_LETTER_SYSTEM).await?;
    Ok(letter.unwrap_or_else(|| FALLBACK_COVER_LETTER.to_string()))
}
