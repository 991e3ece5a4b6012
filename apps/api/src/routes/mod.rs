pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::intelligence::handlers as intelligence;
use crate::resume::handlers as resume;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate profiles
        .route(
            "/api/v1/candidates/:candidate_id",
            get(candidates::handle_get_candidate),
        )
        .route(
            "/api/v1/candidates/:candidate_id/profile",
            post(candidates::handle_create_profile).put(candidates::handle_update_profile),
        )
        .route(
            "/api/v1/candidates/:candidate_id/resume",
            post(resume::handle_upload_resume)
                .layer(DefaultBodyLimit::max(resume::MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/candidates/:candidate_id/skill-gaps",
            post(intelligence::handle_skill_gaps),
        )
        .route(
            "/api/v1/candidates/:candidate_id/job-fit",
            post(intelligence::handle_job_fit),
        )
        // Scores
        .route(
            "/api/v1/scores/:candidate_id",
            get(scoring::handle_get_score).post(scoring::handle_calculate_score),
        )
        .route(
            "/api/v1/scores/:candidate_id/history",
            get(scoring::handle_score_history),
        )
        // Recruiter views
        .route("/api/v1/recruiter/ranking", get(intelligence::handle_ranking))
        .route("/api/v1/recruiter/matches", get(intelligence::handle_matches))
        .route("/api/v1/recruiter/compare", get(intelligence::handle_compare))
        .route(
            "/api/v1/recruiter/candidates/:candidate_id/job-fit",
            get(intelligence::handle_candidate_job_fit),
        )
        .with_state(state)
}
