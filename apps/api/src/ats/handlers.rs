//! Axum route handlers for local (non-LLM) ATS scoring.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::ats::report::{render_text_report, score_match, MatchReport};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct LocalScoreRequest {
    #[serde(default)]
    pub resume_text: String,
    pub job_description: String,
}

impl LocalScoreRequest {
    fn score(&self) -> Result<MatchReport, AppError> {
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "job_description cannot be empty".to_string(),
            ));
        }

        let report = score_match(&self.resume_text, &self.job_description);
        info!(
            "Local ATS score: {}/100 ({:?}), {} of {} job keywords matched, {} missing",
            report.score(),
            report.tier(),
            report.matched_keywords().len(),
            report.job_keyword_count(),
            report.all_missing_keywords().len()
        );
        Ok(report)
    }
}

/// POST /api/v1/ats/local-score
///
/// Scores resume text against a job description without calling the LLM.
pub async fn handle_local_score(
    Json(request): Json<LocalScoreRequest>,
) -> Result<Json<MatchReport>, AppError> {
    Ok(Json(request.score()?))
}

/// POST /api/v1/ats/local-score/report
///
/// Same scoring, returned as a downloadable plain-text report.
pub async fn handle_local_report(
    Json(request): Json<LocalScoreRequest>,
) -> Result<Response, AppError> {
    let report = request.score()?;
    let text = render_text_report(&report, Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ats-report.txt\"",
            ),
        ],
        text,
    )
        .into_response())
}
