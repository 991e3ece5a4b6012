use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::candidates::{load_candidate, repository, update_candidate};
use crate::errors::AppError;
use crate::intelligence::job_fit::{predict_job_fit, JobFitPrediction};
use crate::intelligence::ranking::{build_ranking, compare_candidates, RankedCandidate};
use crate::intelligence::skill_gap::{analyze_skill_gaps, SkillGapAnalysis};
use crate::models::profile::{JobFitAssessment, SkillGapEntry};
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SkillGapRequest {
    #[serde(default)]
    pub role_focus: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFitRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// `limit` stays a string so a non-numeric value can fall back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct RankingQuery {
    pub role: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    pub ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub candidate: User,
    pub analysis: SkillGapAnalysis,
}

#[derive(Debug, Serialize)]
pub struct JobFitResponse {
    pub candidate: User,
    pub prediction: JobFitPrediction,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub ranking: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub comparison: Vec<RankedCandidate>,
}

/// POST /api/v1/candidates/:candidate_id/skill-gaps
pub async fn handle_skill_gaps(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    body: Option<Json<SkillGapRequest>>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let (candidate, analysis) = update_candidate(&state.db, candidate_id, |candidate| {
        let analysis = analyze_skill_gaps(
            &candidate.profile,
            req.role_focus.as_deref(),
            &req.requirements,
        );
        candidate
            .profile
            .record_skill_gap(SkillGapEntry::from(&analysis));
        Ok(analysis)
    })
    .await?;

    info!(
        "Skill gap analysis for {candidate_id}: readiness {}%",
        analysis.readiness_score
    );

    Ok(Json(SkillGapResponse {
        candidate: candidate.user,
        analysis,
    }))
}

/// POST /api/v1/candidates/:candidate_id/job-fit
pub async fn handle_job_fit(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(req): Json<JobFitRequest>,
) -> Result<Json<JobFitResponse>, AppError> {
    let role = required_role(req.role.as_deref())?;

    let (candidate, prediction) = update_candidate(&state.db, candidate_id, |candidate| {
        let prediction = predict_job_fit(&candidate.profile, role, &req.requirements);
        candidate
            .profile
            .record_job_fit(JobFitAssessment::from(&prediction));
        Ok(prediction)
    })
    .await?;

    info!(
        "Job fit for {candidate_id} as '{role}': {}%",
        prediction.suitability
    );

    Ok(Json(JobFitResponse {
        candidate: candidate.user,
        prediction,
    }))
}

/// GET /api/v1/recruiter/ranking
pub async fn handle_ranking(
    State(state): State<AppState>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, AppError> {
    let limit = parse_limit(params.limit.as_deref(), state.config.ranking_default_limit);
    let candidates = repository::list_recent_candidates(&state.db, limit).await?;
    let ranking = build_ranking(&candidates, params.role.as_deref(), limit);
    Ok(Json(RankingResponse { ranking }))
}

/// GET /api/v1/recruiter/matches
pub async fn handle_matches(
    State(state): State<AppState>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<MatchesResponse>, AppError> {
    let role = required_role(params.role.as_deref())?;
    let limit = parse_limit(params.limit.as_deref(), state.config.matches_default_limit);
    let candidates = repository::list_recent_candidates(&state.db, limit).await?;
    let matches = build_ranking(&candidates, Some(role), limit);
    Ok(Json(MatchesResponse { matches }))
}

/// GET /api/v1/recruiter/compare?ids=a,b
pub async fn handle_compare(
    State(state): State<AppState>,
    Query(params): Query<CompareQuery>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let ids = parse_candidate_ids(params.ids.as_deref().unwrap_or_default())?;
    let candidates = repository::find_candidates(&state.db, &ids).await?;
    Ok(Json(ComparisonResponse {
        comparison: compare_candidates(&candidates),
    }))
}

/// GET /api/v1/recruiter/candidates/:candidate_id/job-fit
/// Same prediction as the candidate-side endpoint, but nothing is persisted.
pub async fn handle_candidate_job_fit(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(params): Query<RoleQuery>,
) -> Result<Json<JobFitResponse>, AppError> {
    let role = required_role(params.role.as_deref())?;
    let candidate = load_candidate(&state, candidate_id).await?;
    let prediction = predict_job_fit(&candidate.profile, role, &[]);
    Ok(Json(JobFitResponse {
        candidate: candidate.user,
        prediction,
    }))
}

fn required_role(role: Option<&str>) -> Result<&str, AppError> {
    role.map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("Role is required".to_string()))
}

/// Positive integers only; anything else is the default.
fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(default)
}

/// Comma-separated, trimmed, blanks dropped. None left, or a malformed id, is a 400.
fn parse_candidate_ids(raw: &str) -> Result<Vec<Uuid>, AppError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|_| AppError::Validation(format!("Invalid candidate id: {id}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(AppError::Validation(
            "Provide candidate ids via ids query parameter".to_string(),
        ));
    }
    Ok(ids)
}
