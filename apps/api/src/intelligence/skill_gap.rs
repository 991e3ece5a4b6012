//! Skill Gap Analyzer — compares a candidate's skill inventory with a role's target set.
//!
//! Algorithm:
//! 1. Inventory = normalized union of declared skills, resume-detected skills and
//!    experience role titles.
//! 2. Target set = role-library skills ∪ custom requirements ∪ default skills, in that
//!    insertion order, collapsing duplicates by normalized name.
//! 3. Each target is matching when present in the inventory, missing otherwise.
//! 4. readiness = round(matching / |target| × 100), or 50 for an empty target set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intelligence::catalog::{
    normalize, remediation_action, role_skills, DEFAULT_TARGET_SKILLS,
};
use crate::models::profile::{CandidateProfile, SkillGapEntry};

const ROADMAP_LIMIT: usize = 5;
const EMPTY_TARGET_READINESS: u32 = 50;

/// A missing skill paired with its remediation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub skill: String,
    pub action: String,
}

/// Full result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_focus: Option<String>,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub recommended_learning: Vec<String>,
    pub summary: String,
    pub analyzed_at: DateTime<Utc>,
    pub readiness_score: u32,
    pub recommended_roadmap: Vec<RoadmapStep>,
}

impl From<&SkillGapAnalysis> for SkillGapEntry {
    fn from(analysis: &SkillGapAnalysis) -> Self {
        SkillGapEntry {
            role_focus: analysis.role_focus.clone(),
            missing_skills: analysis.missing_skills.clone(),
            matching_skills: analysis.matching_skills.clone(),
            recommended_learning: analysis.recommended_learning.clone(),
            summary: analysis.summary.clone(),
            readiness_score: analysis.readiness_score,
            analyzed_at: analysis.analyzed_at,
        }
    }
}

/// Runs the gap analysis. Unknown or absent roles fall back to the default-only
/// target set; nothing here fails.
pub fn analyze_skill_gaps(
    profile: &CandidateProfile,
    role_focus: Option<&str>,
    custom_requirements: &[String],
) -> SkillGapAnalysis {
    let role_focus = role_focus.filter(|r| !r.trim().is_empty());
    let inventory = build_inventory(profile);
    let targets = build_target_set(role_focus, custom_requirements);

    let (matching_skills, missing_skills): (Vec<String>, Vec<String>) = targets
        .iter()
        .cloned()
        .partition(|skill| inventory.contains(&normalize(skill)));

    let readiness_score = if targets.is_empty() {
        EMPTY_TARGET_READINESS
    } else {
        ((matching_skills.len() as f64 / targets.len() as f64) * 100.0).round() as u32
    };

    let recommended_learning = missing_skills
        .iter()
        .map(|skill| {
            remediation_action(skill)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Practice {skill} with a focused mini-project."))
        })
        .collect();

    let recommended_roadmap = missing_skills
        .iter()
        .take(ROADMAP_LIMIT)
        .map(|skill| RoadmapStep {
            skill: skill.clone(),
            action: remediation_action(skill)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Schedule deliberate practice sessions for {skill}.")),
        })
        .collect();

    let summary = match role_focus {
        Some(role) => format!(
            "Compared with a {role} expectations, {} strengths detected and {} priority gaps remain.",
            matching_skills.len(),
            missing_skills.len()
        ),
        None => format!(
            "Identified {} gaps against the core competency map.",
            missing_skills.len()
        ),
    };

    SkillGapAnalysis {
        role_focus: role_focus.map(str::to_string),
        missing_skills,
        matching_skills,
        recommended_learning,
        summary,
        analyzed_at: Utc::now(),
        readiness_score,
        recommended_roadmap,
    }
}

/// Normalized skills the candidate signals: declared, resume-detected and role titles.
fn build_inventory(profile: &CandidateProfile) -> HashSet<String> {
    let declared = profile.skills.iter().map(String::as_str);
    let detected = profile
        .resume_snapshot
        .iter()
        .flat_map(|snapshot| snapshot.skills.iter().map(String::as_str));
    let roles = profile.experience.iter().map(|e| e.role.as_str());

    declared
        .chain(detected)
        .chain(roles)
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ordered, duplicate-free target skills. Blank entries are skipped.
fn build_target_set(role_focus: Option<&str>, custom_requirements: &[String]) -> Vec<String> {
    let from_role = role_focus.map(role_skills).unwrap_or(&[]);

    let candidates = from_role
        .iter()
        .copied()
        .chain(custom_requirements.iter().map(String::as_str))
        .chain(DEFAULT_TARGET_SKILLS.iter().copied());

    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for skill in candidates {
        let skill = skill.trim();
        if skill.is_empty() {
            continue;
        }
        if seen.insert(normalize(skill)) {
            targets.push(skill.to_string());
        }
    }
    targets
}
