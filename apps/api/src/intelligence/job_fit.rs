//! Job Fit Predictor — blends competency score, skill coverage and tenure into a
//! single suitability percentage.
//!
//! suitability = clamp(round(0.55·base + 0.35·skill_match + 0.10·tenure), 0, 100)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intelligence::skill_gap::{analyze_skill_gaps, SkillGapAnalysis};
use crate::models::profile::{CandidateProfile, JobFitAssessment};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuitabilityWeights {
    pub base_score: f64,
    pub skill_match: f64,
    pub tenure: f64,
}

pub const SUITABILITY_WEIGHTS: SuitabilityWeights = SuitabilityWeights {
    base_score: 0.55,
    skill_match: 0.35,
    tenure: 0.10,
};

/// Base score used when the candidate has never been scored.
const DEFAULT_BASE_SCORE: f64 = 60.0;
const TENURE_POINTS_PER_ROLE: f64 = 3.0;
const TENURE_CAP: f64 = 15.0;
const NO_GAPS_SKILL_MATCH: f64 = 95.0;
const MAX_GAP_PENALTY: f64 = 60.0;
const RECOMMENDATION_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitPrediction {
    pub role: String,
    pub suitability: u32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
    pub rationale: String,
    pub readiness_score: u32,
    /// The gap analysis the prediction was derived from.
    pub referenced_skill_gap: SkillGapAnalysis,
}

impl From<&JobFitPrediction> for JobFitAssessment {
    fn from(prediction: &JobFitPrediction) -> Self {
        JobFitAssessment {
            role: prediction.role.clone(),
            suitability: prediction.suitability,
            matching_skills: prediction.matching_skills.clone(),
            missing_skills: prediction.missing_skills.clone(),
            recommendations: prediction.recommendations.clone(),
            analyzed_at: prediction.analyzed_at,
        }
    }
}

pub fn predict_job_fit(
    profile: &CandidateProfile,
    role: &str,
    custom_requirements: &[String],
) -> JobFitPrediction {
    let gap = analyze_skill_gaps(profile, Some(role), custom_requirements);

    let base_score = profile.overall_score().unwrap_or(DEFAULT_BASE_SCORE);
    let tenure_boost = tenure_boost(profile.experience.len());
    let skill_match = skill_match_score(gap.missing_skills.len(), gap.matching_skills.len());

    let blended = SUITABILITY_WEIGHTS.base_score * base_score
        + SUITABILITY_WEIGHTS.skill_match * skill_match
        + SUITABILITY_WEIGHTS.tenure * tenure_boost;
    let suitability = blended.round().clamp(0.0, 100.0) as u32;

    let recommendations = gap
        .recommended_learning
        .iter()
        .take(RECOMMENDATION_LIMIT)
        .cloned()
        .collect();

    let rationale = format!(
        "Combined readiness score of {}% with competency average {} produces {}% role fit.",
        gap.readiness_score, base_score, suitability
    );

    JobFitPrediction {
        role: role.to_string(),
        suitability,
        matching_skills: gap.matching_skills.clone(),
        missing_skills: gap.missing_skills.clone(),
        recommendations,
        analyzed_at: Utc::now(),
        rationale,
        readiness_score: gap.readiness_score,
        referenced_skill_gap: gap,
    }
}

/// 3 points per experience entry, capped at 15.
fn tenure_boost(experience_count: usize) -> f64 {
    (experience_count as f64 * TENURE_POINTS_PER_ROLE).min(TENURE_CAP)
}

/// 95 with no gaps; otherwise 100 minus the missed fraction (as a percentage, with a
/// +1 in the denominator), the penalty capped at 60.
fn skill_match_score(missing: usize, matching: usize) -> f64 {
    if missing == 0 {
        return NO_GAPS_SKILL_MATCH;
    }
    let missed_fraction = missing as f64 / (missing + matching + 1) as f64;
    100.0 - (missed_fraction * 100.0).min(MAX_GAP_PENALTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Experience;
    use crate::scoring::engine::{calculate_score, RawScores};
    use chrono::Utc;

    fn make_experience(count: usize) -> Vec<Experience> {
        (0..count)
            .map(|i| Experience {
                organization: format!("Org {i}"),
                role: format!("Engineer {i}"),
                duration: None,
                summary: None,
            })
            .collect()
    }

    fn make_scored_profile(value: f64) -> CandidateProfile {
        let mut profile = CandidateProfile::default();
        profile.record_score(
            calculate_score(&RawScores {
                technical: value,
                cognitive: value,
                behavioral: value,
                communication: value,
            }),
            Utc::now(),
        );
        profile
    }

    #[test]
    fn test_tenure_boost_caps_at_15() {
        assert_eq!(tenure_boost(0), 0.0);
        assert_eq!(tenure_boost(2), 6.0);
        assert_eq!(tenure_boost(5), 15.0);
        assert_eq!(tenure_boost(12), 15.0);
    }

    #[test]
    fn test_skill_match_without_gaps_is_95() {
        assert_eq!(skill_match_score(0, 0), 95.0);
        assert_eq!(skill_match_score(0, 10), 95.0);
    }

    #[test]
    fn test_skill_match_penalty_is_capped() {
        // 12 / 13 ≈ 92% → capped at 60 → 40
        assert_eq!(skill_match_score(12, 0), 40.0);
        // 1 / (1 + 2 + 1) = 25% → 75
        assert_eq!(skill_match_score(1, 2), 75.0);
    }

    #[test]
    fn test_unscored_profile_uses_default_base() {
        // Generalist: defaults only, all missing. skill_match = 100 - min(3/4*100, 60) = 40
        // 0.55*60 + 0.35*40 + 0 = 33 + 14 = 47
        let prediction = predict_job_fit(&CandidateProfile::default(), "Generalist", &[]);
        assert_eq!(prediction.suitability, 47);
        assert_eq!(prediction.readiness_score, 0);
        assert!(prediction.rationale.contains("competency average 60"));
        assert!(prediction.rationale.contains("47% role fit"));
    }

    #[test]
    fn test_fully_matched_scored_profile() {
        let mut profile = make_scored_profile(100.0);
        profile.skills = vec![
            "communication".to_string(),
            "teamwork".to_string(),
            "continuous learning".to_string(),
        ];
        profile.experience = make_experience(6);
        // 0.55*100 + 0.35*95 + 0.10*15 = 55 + 33.25 + 1.5 = 89.75 → 90
        let prediction = predict_job_fit(&profile, "Generalist", &[]);
        assert_eq!(prediction.suitability, 90);
        assert!(prediction.missing_skills.is_empty());
        assert!(prediction.recommendations.is_empty());
        assert_eq!(prediction.readiness_score, 100);
    }

    #[test]
    fn test_zero_score_profile_stays_in_range() {
        let profile = make_scored_profile(0.0);
        let prediction = predict_job_fit(&profile, "frontend developer", &[]);
        // 0 + 0.35*40 + 0 = 14
        assert_eq!(prediction.suitability, 14);
        assert!(prediction.suitability <= 100);
    }

    #[test]
    fn test_recommendations_capped_at_five() {
        let prediction = predict_job_fit(&CandidateProfile::default(), "frontend developer", &[]);
        assert_eq!(prediction.missing_skills.len(), 12);
        assert_eq!(prediction.recommendations.len(), 5);
        assert_eq!(
            prediction.recommendations,
            prediction.referenced_skill_gap.recommended_learning[..5].to_vec()
        );
    }

    #[test]
    fn test_prediction_mirrors_gap_lists() {
        let mut profile = make_scored_profile(70.0);
        profile.skills = vec!["python".to_string(), "sql".to_string()];
        let custom = vec!["dbt".to_string()];
        let prediction = predict_job_fit(&profile, "data engineer", &custom);

        let gap = &prediction.referenced_skill_gap;
        assert_eq!(prediction.matching_skills, gap.matching_skills);
        assert_eq!(prediction.missing_skills, gap.missing_skills);
        assert_eq!(prediction.readiness_score, gap.readiness_score);
        assert_eq!(gap.role_focus.as_deref(), Some("data engineer"));
        assert!(prediction.missing_skills.contains(&"dbt".to_string()));
    }

    #[test]
    fn test_suitability_always_in_range() {
        for value in [0.0, 35.0, 60.0, 100.0] {
            for exp in [0, 1, 5, 20] {
                let mut profile = make_scored_profile(value);
                profile.experience = make_experience(exp);
                for role in ["", "Generalist", "backend developer", "fullstack engineer"] {
                    let prediction = predict_job_fit(&profile, role, &[]);
                    assert!(prediction.suitability <= 100);
                }
            }
        }
    }

    #[test]
    fn test_assessment_conversion() {
        let prediction = predict_job_fit(&CandidateProfile::default(), "backend developer", &[]);
        let assessment = JobFitAssessment::from(&prediction);
        assert_eq!(assessment.role, "backend developer");
        assert_eq!(assessment.suitability, prediction.suitability);
        assert_eq!(assessment.recommendations.len(), 5);
    }
}
