//! Axum route handlers for the Scoring API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::resume_parser::{extract_resume_text, is_pdf};
use crate::scoring::decision::CreditTier;
use crate::scoring::pipeline::ScoreOutcome;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub decision_tier: u32,
    pub tier: CreditTier,
    pub status: &'static str,
}

impl From<ScoreOutcome> for ScoreResponse {
    fn from(outcome: ScoreOutcome) -> Self {
        Self {
            score: outcome.score,
            decision_tier: outcome.tier.limit(),
            tier: outcome.tier,
            status: "success",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/score
///
/// Scores a profile whose résumé has already been converted to text.
pub async fn handle_score_json(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(profile) = payload?;
    let outcome = state.pipeline.score(&profile).await?;
    Ok(Json(outcome.into()))
}

/// POST /score
///
/// Multipart form: `github_username`, `gpa`, `internships` and a `resume` PDF.
pub async fn handle_score_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScoreResponse>, AppError> {
    let mut github_username = None;
    let mut gpa = None;
    let mut internships = None;
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "github_username" => github_username = Some(read_text(field, &name).await?),
            "gpa" => {
                let raw = read_text(field, &name).await?;
                gpa = Some(raw.trim().parse::<f64>().map_err(|_| {
                    AppError::Validation(format!("gpa must be a number, got '{raw}'"))
                })?);
            }
            "internships" => {
                let raw = read_text(field, &name).await?;
                internships = Some(raw.trim().parse::<u32>().map_err(|_| {
                    AppError::Validation(format!(
                        "internships must be a non-negative integer, got '{raw}'"
                    ))
                })?);
            }
            "resume" => {
                if !is_pdf(field.content_type(), field.file_name()) {
                    return Err(AppError::Validation(
                        "Only PDF resumes are supported".to_string(),
                    ));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                resume = Some(data);
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let resume = resume.ok_or_else(|| missing("resume"))?;
    let resume_text = extract_resume_text(resume).await?;

    let profile = Profile {
        github_username: github_username.ok_or_else(|| missing("github_username"))?,
        gpa: gpa.ok_or_else(|| missing("gpa"))?,
        internships: internships.ok_or_else(|| missing("internships"))?,
        resume_text,
    };

    let outcome = state.pipeline.score(&profile).await?;
    Ok(Json(outcome.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("Missing required field '{field}'"))
}
