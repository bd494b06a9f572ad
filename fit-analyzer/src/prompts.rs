// Prompt constants and builders for the two-stage analysis chain.

/// System instruction for the cleaning stage. Scraped pages arrive with
/// navigation chrome, cookie banners and footers still attached.
pub const CLEANER_SYSTEM: &str = "You are a text cleaning assistant. \
    You will be given the raw text of a web page containing a job posting. \
    Remove navigation menus, cookie banners, footers, legal boilerplate, \
    related-job listings and any other text that is not part of the posting itself. \
    Output ONLY the cleaned job posting text, with no commentary.";

pub fn clean_prompt(raw_page_text: &str) -> String {
    format!(
        "Page text:\n{}\n\nPlease return only the job posting content from this page.",
        raw_page_text
    )
}

/// Keys and value ranges the scoring stage must emit. Kept in one place so
/// the parser and the prompt cannot drift apart silently.
pub const FORMAT_INSTRUCTIONS: &str = r#"Respond with a single JSON object with exactly these keys:
- "overall_match_percentage": integer 0-100, the overall fit of the resume to the posting
- "key_matches": array of objects, each with "skill" (string), "match_level" (one of "High", "Medium", "Low", "Not Found") and "explanation" (string)
- "missing_skills": array of strings, important skills from the posting not found in the resume
- "recommendations": array of strings, specific recommendations for the candidate
- "remote_eligible": boolean, whether this role can be performed remotely given the candidate's stated preferences
- "summary": string, overall summary of the match
Do not include any text outside the JSON object."#;

pub fn fit_system() -> String {
    format!(
        "You are an expert hiring manager and resume analyst. \
        Analyze the provided resume against the job description to determine fit. \
        Be thorough but fair in your analysis. \
        Take the job seeker's stated preferences into account when judging fit \
        and remote eligibility.\n\n\
        Focus on:\n\
        1. Technical skills match\n\
        2. Experience level alignment\n\
        3. Role-specific requirements\n\
        4. Soft skills where mentioned\n\
        5. Industry experience\n\
        6. Whether this role can be performed remotely\n\n\
        {}",
        FORMAT_INSTRUCTIONS
    )
}

pub fn fit_prompt(job_description: &str, preferences: &str, resume: &str) -> String {
    format!(
        "Job Description:\n{}\n\nJob Seeker Preferences:\n{}\n\nResume:\n{}\n\n\
        Please analyze the fit between this resume and job description.",
        job_description, preferences, resume
    )
}
