use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::scoring::engine::ScoreBreakdown;

pub const SCORE_HISTORY_CAP: usize = 50;
pub const SKILL_GAP_HISTORY_CAP: usize = 20;
pub const JOB_FIT_HISTORY_CAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub graduation_year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub organization: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Immutable snapshot of a score calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryEntry {
    pub scores: ScoreBreakdown,
    pub calculated_at: DateTime<Utc>,
}

/// Parse result of the most recent resume upload. Replaced wholesale on every upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSnapshot {
    pub raw_text: String,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub parsed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

/// One persisted skill-gap analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_focus: Option<String>,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub recommended_learning: Vec<String>,
    pub summary: String,
    pub readiness_score: u32,
    pub analyzed_at: DateTime<Utc>,
}

/// One persisted job-fit prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitAssessment {
    pub role: String,
    pub suitability: u32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Free-form biographical fields submitted by a candidate. Every list replaces the
/// stored list on update; an empty list clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

/// The candidate aggregate. Owns every nested record; nothing is shared across profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub scores: Option<ScoreBreakdown>,
    pub score_history: Vec<ScoreHistoryEntry>,
    pub resume_snapshot: Option<ResumeSnapshot>,
    pub skill_gap_history: Vec<SkillGapEntry>,
    pub job_fit_assessments: Vec<JobFitAssessment>,
}

impl CandidateProfile {
    pub fn from_fields(fields: ProfileFields) -> Self {
        let mut profile = Self::default();
        profile.apply_fields(fields);
        profile
    }

    /// Replaces the biographical fields wholesale. No merge semantics.
    pub fn apply_fields(&mut self, fields: ProfileFields) {
        self.phone = fields.phone;
        self.education = fields.education;
        self.skills = fields.skills;
        self.projects = fields.projects;
        self.experience = fields.experience;
    }

    /// Sets the current breakdown and appends it to the bounded history.
    pub fn record_score(&mut self, scores: ScoreBreakdown, calculated_at: DateTime<Utc>) {
        self.scores = Some(scores);
        push_bounded(
            &mut self.score_history,
            ScoreHistoryEntry {
                scores,
                calculated_at,
            },
            SCORE_HISTORY_CAP,
        );
    }

    pub fn record_skill_gap(&mut self, entry: SkillGapEntry) {
        push_bounded(&mut self.skill_gap_history, entry, SKILL_GAP_HISTORY_CAP);
    }

    pub fn record_job_fit(&mut self, assessment: JobFitAssessment) {
        push_bounded(&mut self.job_fit_assessments, assessment, JOB_FIT_HISTORY_CAP);
    }

    pub fn overall_score(&self) -> Option<f64> {
        self.scores.as_ref().map(ScoreBreakdown::overall)
    }

    /// Timestamp of the most recent score-history entry.
    pub fn latest_score_at(&self) -> Option<DateTime<Utc>> {
        self.score_history.last().map(|e| e.calculated_at)
    }

    /// Role of the most recent job-fit assessment, ignoring blank roles.
    pub fn latest_job_fit_role(&self) -> Option<&str> {
        self.job_fit_assessments
            .last()
            .map(|a| a.role.as_str())
            .filter(|r| !r.trim().is_empty())
    }
}

/// A profile joined with the identity that owns it.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRecord {
    pub user: User,
    pub profile: CandidateProfile,
}

/// Appends `item`, then drops entries from the front until `list.len() <= cap`.
pub fn push_bounded<T>(list: &mut Vec<T>, item: T, cap: usize) {
    list.push(item);
    if list.len() > cap {
        let overflow = list.len() - cap;
        list.drain(..overflow);
    }
}
