use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::ai::coerce::{string_list, text};
use crate::ai::prompts::{enhance_resume_prompt, ENHANCE_RESUME_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::models::latex::LatexResumeData;

/// Asks the model to rewrite `original` for `target_job_title`. Anything the
/// model drops or mangles falls back to the caller's value.
pub async fn enhance_resume(
    llm: &LlmClient,
    original: &LatexResumeData,
    target_job_title: Option<&str>,
) -> Result<LatexResumeData, AppError> {
    let resume_json = serde_json::to_string_pretty(original)
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    let prompt = enhance_resume_prompt(&resume_json, target_job_title);
    let reply: Value = llm
        .call_json(&prompt, &json_system(ENHANCE_RESUME_SYSTEM))
        .await?;
    Ok(merge_enhanced(original, &reply))
}

/// Field-by-field merge of a model reply over the original résumé.
pub fn merge_enhanced(original: &LatexResumeData, reply: &Value) -> LatexResumeData {
    // Models sometimes wrap the document in a single key.
    let reply = ["resumeData", "enhancedData"]
        .iter()
        .find_map(|key| reply.get(key).filter(|v| v.is_object()))
        .unwrap_or(reply);

    if !reply.is_object() {
        warn!("Enhancement reply was not an object; keeping original resume");
        return original.clone();
    }

    let string_or = |key: &str, fallback: &String| text(reply.get(key)).unwrap_or_else(|| fallback.clone());
    let list_or = |key: &str, fallback: &Vec<String>| match reply.get(key) {
        Some(v @ Value::Array(_)) => string_list(Some(v)),
        _ => fallback.clone(),
    };

    LatexResumeData {
        name: string_or("name", &original.name),
        email: string_or("email", &original.email),
        phone: string_or("phone", &original.phone),
        linkedin: string_or("linkedin", &original.linkedin),
        education: merge_items(reply.get("education"), &original.education),
        experience: merge_items(reply.get("experience"), &original.experience),
        leadership: merge_items(reply.get("leadership"), &original.leadership),
        certifications: list_or("certifications", &original.certifications),
        skills: list_or("skills", &original.skills),
    }
}

/// Items that fail to parse are replaced by the original item at the same
/// position, or dropped when there is none.
fn merge_items<T: DeserializeOwned + Clone>(value: Option<&Value>, original: &[T]) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return original.to_vec();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            serde_json::from_value::<T>(item.clone())
                .ok()
                .or_else(|| original.get(i).cloned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::latex::ExperienceItem;
    use serde_json::json;

    fn original() -> LatexResumeData {
        LatexResumeData {
            name: "Bilal Ahmed".into(),
            email: "bilal@example.pk".into(),
            phone: "+92 300 0000000".into(),
            linkedin: "https://linkedin.com/in/bilal".into(),
            experience: vec![ExperienceItem {
                company: "Arbisoft".into(),
                position: "Engineer".into(),
                achievements: vec!["Wrote code".into()],
                ..Default::default()
            }],
            skills: vec!["Python".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_enhanced_fields_replace_original() {
        let reply = json!({
            "experience": [{
                "company": "Arbisoft",
                "position": "Engineer",
                "achievements": ["Cut p95 latency by 40% across 3 services"]
            }],
            "skills": ["Python", "PostgreSQL"]
        });
        let merged = merge_enhanced(&original(), &reply);
        assert_eq!(
            merged.experience[0].achievements,
            vec!["Cut p95 latency by 40% across 3 services"]
        );
        assert_eq!(merged.skills, vec!["Python", "PostgreSQL"]);
        assert_eq!(merged.name, "Bilal Ahmed");
        assert_eq!(merged.email, "bilal@example.pk");
    }

    #[test]
    fn test_wrapped_reply_is_unwrapped() {
        let reply = json!({"resumeData": {"name": "B. Ahmed"}});
        assert_eq!(merge_enhanced(&original(), &reply).name, "B. Ahmed");
    }

    #[test]
    fn test_mangled_items_fall_back_by_position() {
        let reply = json!({"experience": [{"achievements": "one string"}]});
        let merged = merge_enhanced(&original(), &reply);
        assert_eq!(merged.experience, original().experience);
    }

    #[test]
    fn test_non_object_reply_keeps_original() {
        assert_eq!(merge_enhanced(&original(), &json!([1, 2])), original());
    }
}
