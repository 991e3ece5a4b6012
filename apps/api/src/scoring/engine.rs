//! Scoring Engine — turns four raw competency sub-scores into a weighted overall score.

use serde::{Deserialize, Serialize};

/// Canonical competency weights. Sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompetencyWeights {
    pub technical: f64,
    pub cognitive: f64,
    pub behavioral: f64,
    pub communication: f64,
}

pub const DEFAULT_WEIGHTS: CompetencyWeights = CompetencyWeights {
    technical: 0.40,
    cognitive: 0.25,
    behavioral: 0.20,
    communication: 0.15,
};

/// Raw sub-scores as submitted by an assessor. Values may be out of range or NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    pub technical: f64,
    pub cognitive: f64,
    pub behavioral: f64,
    pub communication: f64,
}

/// Clamped sub-scores plus the derived overall score.
///
/// `overall` is only ever computed from the four sub-scores; deserializing a stored
/// breakdown recomputes it rather than trusting the persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScores")]
pub struct ScoreBreakdown {
    technical: f64,
    cognitive: f64,
    behavioral: f64,
    communication: f64,
    overall: f64,
}

impl ScoreBreakdown {
    pub fn technical(&self) -> f64 {
        self.technical
    }

    pub fn cognitive(&self) -> f64 {
        self.cognitive
    }

    pub fn behavioral(&self) -> f64 {
        self.behavioral
    }

    pub fn communication(&self) -> f64 {
        self.communication
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Sub-scores in display order, paired with their competency label.
    pub fn competencies(&self) -> [(&'static str, f64); 4] {
        [
            ("Technical", self.technical),
            ("Cognitive", self.cognitive),
            ("Behavioral", self.behavioral),
            ("Communication", self.communication),
        ]
    }
}

impl From<RawScores> for ScoreBreakdown {
    fn from(raw: RawScores) -> Self {
        calculate_score(&raw)
    }
}

/// Clamps every sub-score to [0, 100] (NaN → 0) and computes
/// `overall = round2(0.40*technical + 0.25*cognitive + 0.20*behavioral + 0.15*communication)`.
pub fn calculate_score(raw: &RawScores) -> ScoreBreakdown {
    let technical = clamp_score(raw.technical);
    let cognitive = clamp_score(raw.cognitive);
    let behavioral = clamp_score(raw.behavioral);
    let communication = clamp_score(raw.communication);

    let weighted = technical * DEFAULT_WEIGHTS.technical
        + cognitive * DEFAULT_WEIGHTS.cognitive
        + behavioral * DEFAULT_WEIGHTS.behavioral
        + communication * DEFAULT_WEIGHTS.communication;

    ScoreBreakdown {
        technical,
        cognitive,
        behavioral,
        communication,
        overall: round2(weighted).clamp(0.0, 100.0),
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
