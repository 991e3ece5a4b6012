use serde::{Deserialize, Serialize};

use crate::scoring::engine::ScoreBreakdown;

const STRENGTH_THRESHOLD: f64 = 80.0;
const WEAKNESS_THRESHOLD: f64 = 60.0;

pub const NO_SCORES_FOCUS: &str = "No scores available yet. Capture a score to unlock insights.";
const NO_STRENGTHS: &str = "Developing baseline strengths. Continue consistent effort.";
const NO_WEAKNESSES: &str = "No critical weak areas detected at the moment.";
const NO_FOCUS_AREAS: &str = "Maintain current performance and seek stretch assignments.";

/// Narrative buckets derived from a score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub focus_areas: Vec<String>,
}

/// Buckets each competency: ≥80 is a strength, <60 is a weakness with a matching
/// focus area, anything in between contributes nothing. Empty buckets receive a
/// fixed generic message.
pub fn generate_insights(scores: Option<&ScoreBreakdown>) -> InsightSummary {
    let Some(scores) = scores else {
        return InsightSummary {
            strengths: vec![],
            weaknesses: vec![],
            focus_areas: vec![NO_SCORES_FOCUS.to_string()],
        };
    };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut focus_areas = Vec::new();

    for (label, value) in scores.competencies() {
        if value >= STRENGTH_THRESHOLD {
            strengths.push(format!("{label} competency is a strong area ({value})"));
        } else if value < WEAKNESS_THRESHOLD {
            weaknesses.push(format!("{label} competency needs improvement ({value})"));
            focus_areas.push(format!(
                "Improve {label} skills via targeted practice and mentoring."
            ));
        }
    }

    if strengths.is_empty() {
        strengths.push(NO_STRENGTHS.to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push(NO_WEAKNESSES.to_string());
    }
    if focus_areas.is_empty() {
        focus_areas.push(NO_FOCUS_AREAS.to_string());
    }

    InsightSummary {
        strengths,
        weaknesses,
        focus_areas,
    }
}
