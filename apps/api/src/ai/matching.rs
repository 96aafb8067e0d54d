use serde::Serialize;
use serde_json::Value;

use crate::ai::coerce::{score, string_list, text};
use crate::ai::prompts::{job_match_prompt, JOB_MATCH_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;

pub const DEFAULT_REASONING: &str = "Unable to determine match score";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResult {
    pub match_score: f64,
    pub reasoning: String,
    pub skills_match: Vec<String>,
    pub skills_gap: Vec<String>,
    pub recommendations: Vec<String>,
}

impl JobMatchResult {
    pub fn from_value(value: &Value) -> Self {
        Self {
            match_score: score(value.get("matchScore")),
            reasoning: text(value.get("reasoning"))
                .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
            skills_match: string_list(value.get("skillsMatch")),
            skills_gap: string_list(value.get("skillsGap")),
            recommendations: string_list(value.get("recommendations")),
        }
    }
}

pub async fn calculate_job_match(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
    job_title: &str,
) -> Result<JobMatchResult, AppError> {
    let prompt = job_match_prompt(resume_text, job_description, job_title);
    let reply: Value = llm
        .call_json(&prompt, &json_system(JOB_MATCH_SYSTEM))
        .await?;
    Ok(JobMatchResult::from_value(&reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_reasoning_gets_default() {
        let result = JobMatchResult::from_value(&json!({"matchScore": 91}));
        assert_eq!(result.match_score, 91.0);
        assert_eq!(result.reasoning, DEFAULT_REASONING);
        assert!(result.skills_gap.is_empty());
    }

    #[test]
    fn test_wrong_types_are_coerced() {
        let result = JobMatchResult::from_value(&json!({
            "matchScore": 130,
            "reasoning": ["not", "a", "string"],
            "skillsMatch": "Rust",
            "skillsGap": ["Go", 7],
            "recommendations": null
        }));
        assert_eq!(result.match_score, 100.0);
        assert_eq!(result.reasoning, DEFAULT_REASONING);
        assert!(result.skills_match.is_empty());
        assert_eq!(result.skills_gap, vec!["Go"]);
        assert!(result.recommendations.is_empty());
    }
}
