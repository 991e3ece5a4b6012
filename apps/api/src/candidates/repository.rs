//! Candidate persistence. One row per profile; the whole aggregate lives in a JSONB column.
//!
//! Read-modify-write callers lock the row first ([`find_candidate_for_update`] inside a
//! transaction) and then replace the document. Resume upload only touches its own key.

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::profile::{CandidateProfile, CandidateRecord, ResumeSnapshot};
use crate::models::user::User;

const CANDIDATE_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.role, u.created_at, p.profile
    FROM candidate_profiles p
    JOIN users u ON u.id = p.user_id
"#;

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    profile: Json<CandidateProfile>,
}

impl From<CandidateRow> for CandidateRecord {
    fn from(row: CandidateRow) -> Self {
        CandidateRecord {
            user: User {
                id: row.id,
                name: row.name,
                email: row.email,
                role: row.role,
                created_at: row.created_at,
            },
            profile: row.profile.0,
        }
    }
}

pub async fn find_user<'e, E>(executor: E, user_id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as("SELECT id, name, email, role, created_at FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// True when another user already owns `email`.
pub async fn email_in_use<'e, E>(executor: E, email: &str, except: Uuid) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)")
        .bind(email)
        .bind(except)
        .fetch_one(executor)
        .await
}

/// Updates display name and/or email. `None` keeps the stored value.
/// A concurrent claim on the same email surfaces as a unique violation.
pub async fn update_user_identity<'e, E>(
    executor: E,
    user_id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<User, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as(
        r#"
        UPDATE users
        SET name = COALESCE($2, name), email = COALESCE($3, email)
        WHERE id = $1
        RETURNING id, name, email, role, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .fetch_one(executor)
    .await
}

/// Inserts a fresh profile. Returns false when the candidate already has one.
pub async fn insert_profile<'e, E>(
    executor: E,
    user_id: Uuid,
    profile: &CandidateProfile,
) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO candidate_profiles (user_id, profile) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(Json(profile))
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Replaces the stored document. Returns false when no profile row exists.
pub async fn save_profile<'e, E>(
    executor: E,
    user_id: Uuid,
    profile: &CandidateProfile,
) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE candidate_profiles SET profile = $2, updated_at = now() WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(Json(profile))
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Writes only the `resume_snapshot` key, creating the profile when missing.
/// Scores and histories recorded concurrently are left alone.
pub async fn upsert_resume_snapshot(
    pool: &PgPool,
    user_id: Uuid,
    snapshot: &ResumeSnapshot,
) -> Result<CandidateProfile, sqlx::Error> {
    let profile: Json<CandidateProfile> = sqlx::query_scalar(
        r#"
        INSERT INTO candidate_profiles (user_id, profile)
        VALUES ($1, jsonb_build_object('resume_snapshot', $2::jsonb))
        ON CONFLICT (user_id) DO UPDATE
        SET profile = jsonb_set(candidate_profiles.profile, '{resume_snapshot}', $2::jsonb),
            updated_at = now()
        RETURNING profile
        "#,
    )
    .bind(user_id)
    .bind(Json(snapshot))
    .fetch_one(pool)
    .await?;
    Ok(profile.0)
}

pub async fn find_candidate(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CandidateRecord>, sqlx::Error> {
    let sql = format!("{CANDIDATE_SELECT} WHERE p.user_id = $1");
    let row: Option<CandidateRow> = sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(CandidateRecord::from))
}

/// Same as [`find_candidate`] but holds the profile row lock until the transaction ends.
pub async fn find_candidate_for_update(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Option<CandidateRecord>, sqlx::Error> {
    let sql = format!("{CANDIDATE_SELECT} WHERE p.user_id = $1 FOR UPDATE OF p");
    let row: Option<CandidateRow> = sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(CandidateRecord::from))
}

/// Most recently updated profiles first.
pub async fn list_recent_candidates(
    pool: &PgPool,
    limit: usize,
) -> Result<Vec<CandidateRecord>, sqlx::Error> {
    let sql = format!("{CANDIDATE_SELECT} ORDER BY p.updated_at DESC LIMIT $1");
    let rows: Vec<CandidateRow> = sqlx::query_as(&sql)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(CandidateRecord::from).collect())
}

/// Profiles for `ids`, returned in the order the ids were given. Unknown ids are skipped.
pub async fn find_candidates(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<CandidateRecord>, sqlx::Error> {
    let sql = format!(
        "{CANDIDATE_SELECT} WHERE p.user_id = ANY($1) ORDER BY array_position($1::uuid[], p.user_id)"
    );
    let rows: Vec<CandidateRow> = sqlx::query_as(&sql).bind(ids).fetch_all(pool).await?;
    Ok(rows.into_iter().map(CandidateRecord::from).collect())
}
