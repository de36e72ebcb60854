//! Axum route handler for résumé upload.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extractor::RolePrediction;
use crate::extraction::pdf::extract_pdf_text;
use crate::matching::matcher::MatchedJob;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub success: bool,
    pub data: ResumeMatchData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMatchData {
    pub extracted_skills: Vec<String>,
    pub experience: f64,
    pub education: String,
    pub predicted_role: RolePrediction,
    pub matched_jobs: Vec<MatchedJob>,
}

/// POST /api/v1/resume/upload (multipart)
///
/// PDF -> text -> skills -> role prediction -> ranked job matches.
pub async fn handle_resume_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("resume");
        if is_file {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            file_bytes = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let resume_text = extract_pdf_text(bytes).await?;
    info!("Extracted {} chars of resume text", resume_text.len());

    let profile = state
        .extractor
        .extract_profile(&resume_text)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    let predicted_role = state
        .extractor
        .predict_role(&resume_text, &profile.skills, profile.experience)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let matched_jobs = state.matcher.match_jobs(&profile.skills).await;
    info!(
        "Matched {} jobs for {} extracted skills",
        matched_jobs.len(),
        profile.skills.len()
    );

    Ok(Json(ResumeUploadResponse {
        success: true,
        data: ResumeMatchData {
            extracted_skills: profile.skills,
            experience: profile.experience,
            education: profile.education,
            predicted_role,
            matched_jobs,
        },
    }))
}
