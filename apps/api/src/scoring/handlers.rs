use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::candidates::{load_candidate, update_candidate};
use crate::errors::AppError;
use crate::models::profile::ScoreHistoryEntry;
use crate::models::user::User;
use crate::scoring::engine::{calculate_score, RawScores, ScoreBreakdown};
use crate::scoring::enhanced_insights;
use crate::scoring::insights::{generate_insights, InsightSummary};
use crate::state::AppState;

const MISSING_SCORES: &str = "All score fields (0-100) are required";

#[derive(Debug, Serialize)]
pub struct ScoreCalculationResponse {
    pub candidate: User,
    pub scores: ScoreBreakdown,
    pub history_count: usize,
    pub insights: InsightSummary,
}

#[derive(Debug, Serialize)]
pub struct ScoreReadResponse {
    pub candidate: User,
    pub scores: Option<ScoreBreakdown>,
    pub insights: InsightSummary,
}

#[derive(Debug, Serialize)]
pub struct ScoreHistoryResponse {
    pub candidate_id: Uuid,
    pub history: Vec<ScoreHistoryEntry>,
}

/// POST /api/v1/scores/:candidate_id
pub async fn handle_calculate_score(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<ScoreCalculationResponse>, AppError> {
    let raw = parse_raw_scores(&body)?;
    let scores = calculate_score(&raw);

    let (candidate, ()) = update_candidate(&state.db, candidate_id, |candidate| {
        candidate.profile.record_score(scores, Utc::now());
        Ok(())
    })
    .await?;

    info!(
        "Scored candidate {candidate_id}: overall {}",
        scores.overall()
    );

    Ok(Json(ScoreCalculationResponse {
        history_count: candidate.profile.score_history.len(),
        insights: generate_insights(Some(&scores)),
        candidate: candidate.user,
        scores,
    }))
}

/// GET /api/v1/scores/:candidate_id
pub async fn handle_get_score(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<ScoreReadResponse>, AppError> {
    let candidate = load_candidate(&state, candidate_id).await?;
    let scores = candidate.profile.scores;
    let insights = enhanced_insights(state.ai.as_ref(), scores.as_ref()).await;

    Ok(Json(ScoreReadResponse {
        candidate: candidate.user,
        scores,
        insights,
    }))
}

/// GET /api/v1/scores/:candidate_id/history
pub async fn handle_score_history(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<ScoreHistoryResponse>, AppError> {
    let candidate = load_candidate(&state, candidate_id).await?;
    Ok(Json(ScoreHistoryResponse {
        candidate_id,
        history: candidate.profile.score_history,
    }))
}

/// All four sub-scores must be present and numeric. Range is not checked here;
/// the engine clamps.
pub fn parse_raw_scores(body: &Value) -> Result<RawScores, AppError> {
    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| AppError::Validation(MISSING_SCORES.to_string()))
    };

    Ok(RawScores {
        technical: field("technical")?,
        cognitive: field("cognitive")?,
        behavioral: field("behavioral")?,
        communication: field("communication")?,
    })
}
