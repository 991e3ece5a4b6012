//! Ranking Aggregator — runs the job-fit predictor over a candidate collection.
//!
//! `build_ranking` sorts by suitability (stable, descending). `compare_candidates`
//! keeps retrieval order and predicts each candidate against their own most recent
//! assessed role. The two intentionally differ.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::intelligence::job_fit::{predict_job_fit, JobFitPrediction};
use crate::models::profile::CandidateRecord;

pub const DEFAULT_ROLE: &str = "Generalist";

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub candidate_id: Uuid,
    pub name: String,
    pub email: String,
    /// Account role of the candidate (not the target role).
    pub role: String,
    pub overall_score: Option<f64>,
    pub job_fit: JobFitPrediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_score_date: Option<DateTime<Utc>>,
}

/// Predicts every candidate among the first `limit` against `role` (default
/// "Generalist") and sorts by suitability, highest first. Ties keep input order.
pub fn build_ranking(
    candidates: &[CandidateRecord],
    role: Option<&str>,
    limit: usize,
) -> Vec<RankedCandidate> {
    let role = resolve_role(role);

    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .take(limit)
        .map(|candidate| summarize(candidate, role))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.job_fit.suitability.cmp(&a.job_fit.suitability));
    ranked
}

/// One entry per candidate, in the given order, each predicted against the role of
/// their latest job-fit assessment. No re-sorting.
pub fn compare_candidates(candidates: &[CandidateRecord]) -> Vec<RankedCandidate> {
    candidates
        .iter()
        .map(|candidate| {
            let role = resolve_role(candidate.profile.latest_job_fit_role());
            summarize(candidate, role)
        })
        .collect()
}

fn resolve_role(role: Option<&str>) -> &str {
    role.filter(|r| !r.trim().is_empty()).unwrap_or(DEFAULT_ROLE)
}

fn summarize(candidate: &CandidateRecord, role: &str) -> RankedCandidate {
    let CandidateRecord { user, profile } = candidate;
    RankedCandidate {
        candidate_id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        overall_score: profile.overall_score(),
        job_fit: predict_job_fit(profile, role, &[]),
        recent_score_date: profile.latest_score_at(),
    }
}
