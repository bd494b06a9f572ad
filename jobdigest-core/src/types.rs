use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single job listing as fetched from a job board. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub url: String,
    pub created: Option<DateTime<Utc>>,
}

/// How well one skill from the posting matches the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    High,
    Medium,
    Low,
    #[serde(rename = "Not Found")]
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub match_level: MatchLevel,
    pub explanation: String,
}

/// Structured judgment of resume-to-posting fit, produced at most once per
/// posting. Absent when the analysis chain failed for that posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitAnalysis {
    pub overall_match_percentage: u8,
    #[serde(default)]
    pub key_matches: Vec<SkillMatch>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub remote_eligible: bool,
    pub summary: String,
}
