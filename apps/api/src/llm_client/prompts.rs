// Cross-cutting prompt fragments. Feature-specific prompts live in `ai::prompts`.

/// Appended to every structured system prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with a single valid JSON object only. \
    Do not include any text outside the JSON object and do not use markdown code fences.";

/// Joins a feature system prompt with the JSON-only instruction.
pub fn json_system(base: &str) -> String {
    format!("{base} {JSON_ONLY_INSTRUCTION}")
}

/// Renders the optional target role line used by résumé prompts.
pub fn target_role_line(target_job_title: Option<&str>) -> String {
    match target_job_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("Target Job Title: {title}\n"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_role_line_omitted_when_blank() {
        assert_eq!(target_role_line(None), "");
        assert_eq!(target_role_line(Some("  ")), "");
        assert_eq!(
            target_role_line(Some("Backend Engineer")),
            "Target Job Title: Backend Engineer\n"
        );
    }
}
