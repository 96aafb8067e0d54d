use crate::llm_client::prompts::target_role_line;

pub const ANALYZE_RESUME_SYSTEM: &str = "You are an expert resume analyzer and career counselor. \
    Provide detailed, actionable feedback on resumes to help job seekers improve their chances of getting hired.";

pub const JOB_MATCH_SYSTEM: &str = "You are an AI recruiter and career counselor. \
    Analyze job-candidate fit and provide detailed matching insights.";

pub const COVER_LETTER_SYSTEM: &str = "You are a professional career counselor who writes compelling \
    cover letters that help candidates stand out to employers.";

pub const ENHANCE_RESUME_SYSTEM: &str = "You are an expert resume writer. You rewrite resume content \
    to be concise, achievement-oriented and ATS friendly without inventing facts.";

pub fn analyze_resume_prompt(resume_text: &str, target_job_title: Option<&str>) -> String {
    format!(
        "Analyze the following resume and provide a comprehensive assessment.\n\
         {role}\n\
         Resume content:\n{resume_text}\n\n\
         Respond with JSON in this exact format:\n\
         {{\n\
           \"atsScore\": number (0-100),\n\
           \"keywordOptimization\": number (0-100),\n\
           \"suggestions\": [\"suggestion1\", ...],\n\
           \"analysisData\": {{\n\
             \"strengths\": [\"strength1\", ...],\n\
             \"weaknesses\": [\"weakness1\", ...],\n\
             \"missingKeywords\": [\"keyword1\", ...],\n\
             \"formatIssues\": [\"issue1\", ...],\n\
             \"contentQuality\": number (0-100),\n\
             \"structureScore\": number (0-100)\n\
           }}\n\
         }}\n\n\
         Provide actionable insights for ATS optimization, keyword usage and overall resume quality.",
        role = target_role_line(target_job_title),
    )
}

pub fn job_match_prompt(resume_text: &str, job_description: &str, job_title: &str) -> String {
    format!(
        "Calculate how well this resume matches the job description and provide insights.\n\n\
         Job Title: {job_title}\n\n\
         Job Description:\n{job_description}\n\n\
         Resume:\n{resume_text}\n\n\
         Respond with JSON in this exact format:\n\
         {{\n\
           \"matchScore\": number (0-100),\n\
           \"reasoning\": \"detailed explanation of the match score\",\n\
           \"skillsMatch\": [\"skill1\", ...],\n\
           \"skillsGap\": [\"missing_skill1\", ...],\n\
           \"recommendations\": [\"recommendation1\", ...]\n\
         }}\n\n\
         Provide actionable insights for improving the match score."
    )
}

pub fn cover_letter_prompt(
    resume_text: &str,
    job_description: &str,
    job_title: &str,
    company_name: &str,
) -> String {
    format!(
        "Generate a professional cover letter based on the candidate's resume and the job description.\n\n\
         Job Title: {job_title}\n\
         Company: {company_name}\n\n\
         Job Description:\n{job_description}\n\n\
         Candidate's Resume:\n{resume_text}\n\n\
         Write a compelling, personalized cover letter that highlights relevant experience and skills. \
         Keep it professional, engaging and around 250-300 words."
    )
}

/// `resume_json` is the serialized résumé the model should return in the same shape.
pub fn enhance_resume_prompt(resume_json: &str, target_job_title: Option<&str>) -> String {
    format!(
        "Improve the following resume data.\n\
         {role}\n\
         Rewrite experience and leadership achievements and education details as strong, \
         quantified bullet points. Tighten the skills list. Keep names, dates, employers, \
         institutions and contact details unchanged.\n\n\
         Resume data (JSON):\n{resume_json}\n\n\
         Return the improved resume as a JSON object with exactly the same keys and structure.",
        role = target_role_line(target_job_title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_prompt_mentions_target_role_only_when_given() {
        let with = analyze_resume_prompt("resume body", Some("Data Engineer"));
        assert!(with.contains("Target Job Title: Data Engineer"));
        assert!(with.contains("resume body"));

        let without = analyze_resume_prompt("resume body", None);
        assert!(!without.contains("Target Job Title"));
    }

    #[test]
    fn test_cover_letter_prompt_includes_company() {
        let prompt = cover_letter_prompt("cv", "desc", "SRE", "Careem");
        assert!(prompt.contains("Company: Careem"));
        assert!(prompt.contains("Job Title: SRE"));
    }
}
