use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::candidates::repository;
use crate::errors::AppError;
use crate::models::profile::{CandidateProfile, ResumeSnapshot};
use crate::resume::extractor::ResumeFields;
use crate::resume::parse_resume;
use crate::resume::text::DocumentHint;
use crate::state::AppState;

/// Multipart field carrying the document.
pub const RESUME_FIELD: &str = "resume";
pub const MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub snapshot: ResumeSnapshot,
    pub autofill: ResumeFields,
    pub profile: CandidateProfile,
}

/// POST /api/v1/candidates/:candidate_id/resume
/// Overwrites the resume snapshot, creating the profile when the candidate has none.
/// Every other part of the stored profile is left as is.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let (content, hint) = read_resume_field(multipart).await?;

    let parsed = parse_resume(
        state.text_extractor.as_ref(),
        &state.resume_parser,
        content,
        &hint,
    )
    .await?;

    repository::find_user(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let profile =
        repository::upsert_resume_snapshot(&state.db, candidate_id, &parsed.snapshot).await?;

    info!(
        "Parsed resume for candidate {candidate_id}: {} skills, {} experience entries",
        parsed.autofill.skills.len(),
        parsed.autofill.experience.len()
    );

    Ok(Json(ResumeUploadResponse {
        snapshot: parsed.snapshot,
        autofill: parsed.autofill,
        profile,
    }))
}

async fn read_resume_field(mut multipart: Multipart) -> Result<(Bytes, DocumentHint), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let hint = DocumentHint {
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
        };
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read resume file: {e}")))?;

        if content.is_empty() {
            return Err(AppError::Validation("Resume file is empty".to_string()));
        }
        return Ok((content, hint));
    }

    Err(AppError::Validation("Resume file is required".to_string()))
}
