use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

use crate::candidates::{load_candidate, repository};
use crate::errors::AppError;
use crate::models::profile::{CandidateProfile, CandidateRecord, ProfileFields};
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: ProfileFields,
}

/// POST /api/v1/candidates/:candidate_id/profile
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<CandidateRecord>), AppError> {
    let mut tx = state.db.begin().await?;

    let user = repository::find_user(&mut *tx, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let profile = CandidateProfile::from_fields(req.fields);
    if !repository::insert_profile(&mut *tx, candidate_id, &profile).await? {
        return Err(AppError::Validation(
            "Profile already exists. Use update instead.".to_string(),
        ));
    }

    let user = apply_identity(&mut *tx, user, req.name.as_deref(), req.email.as_deref()).await?;
    tx.commit().await?;

    info!("Created profile for candidate {candidate_id}");
    Ok((StatusCode::CREATED, Json(CandidateRecord { user, profile })))
}

/// PUT /api/v1/candidates/:candidate_id/profile
/// Biographical lists are replaced wholesale; omitted lists become empty.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<CandidateRecord>, AppError> {
    let mut tx = state.db.begin().await?;

    let CandidateRecord { user, mut profile } =
        repository::find_candidate_for_update(&mut *tx, candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))?;

    let user = apply_identity(&mut *tx, user, req.name.as_deref(), req.email.as_deref()).await?;
    profile.apply_fields(req.fields);
    repository::save_profile(&mut *tx, candidate_id, &profile).await?;
    tx.commit().await?;

    Ok(Json(CandidateRecord { user, profile }))
}

/// GET /api/v1/candidates/:candidate_id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<CandidateRecord>, AppError> {
    Ok(Json(load_candidate(&state, candidate_id).await?))
}

/// Applies optional name/email changes. Blank values are ignored; an email owned by
/// another user is a conflict, including one claimed by a concurrent request.
async fn apply_identity(
    conn: &mut PgConnection,
    user: User,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<User, AppError> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let email = email.map(str::trim).filter(|e| !e.is_empty());

    if name.is_none() && email.is_none() {
        return Ok(user);
    }

    if let Some(email) = email {
        if repository::email_in_use(&mut *conn, email, user.id).await? {
            return Err(email_conflict());
        }
    }

    repository::update_user_identity(&mut *conn, user.id, name, email)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => email_conflict(),
            other => other.into(),
        })
}

fn email_conflict() -> AppError {
    AppError::Conflict("Email already in use".to_string())
}
