// Candidate profiles: creation, wholesale field updates and lookup.

pub mod handlers;
pub mod repository;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::CandidateRecord;
use crate::state::AppState;

fn profile_not_found() -> AppError {
    AppError::NotFound("Candidate profile not found".to_string())
}

/// Loads a candidate or fails with 404. Shared by every per-candidate read.
pub async fn load_candidate(state: &AppState, candidate_id: Uuid) -> Result<CandidateRecord, AppError> {
    repository::find_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(profile_not_found)
}

/// Locks the profile row, lets `mutate` change the record, then saves and commits.
/// Concurrent writers on the same candidate queue behind the lock, so none of their
/// appends are lost. An error from `mutate` rolls the transaction back.
pub async fn update_candidate<T, F>(
    db: &PgPool,
    candidate_id: Uuid,
    mutate: F,
) -> Result<(CandidateRecord, T), AppError>
where
    F: FnOnce(&mut CandidateRecord) -> Result<T, AppError> + Send,
    T: Send,
{
    let mut tx = db.begin().await?;

    let mut candidate = repository::find_candidate_for_update(&mut *tx, candidate_id)
        .await?
        .ok_or_else(profile_not_found)?;
    let output = mutate(&mut candidate)?;

    if !repository::save_profile(&mut *tx, candidate_id, &candidate.profile).await? {
        return Err(profile_not_found());
    }
    tx.commit().await?;

    Ok((candidate, output))
}
