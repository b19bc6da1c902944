pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers as ats;
use crate::extract::{handle_extract_pdf, MAX_PDF_BYTES};
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Local ATS scoring (no LLM)
        .route("/api/v1/ats/local-score", post(ats::handle_local_score))
        .route(
            "/api/v1/ats/local-score/report",
            post(ats::handle_local_report),
        )
        // LLM-backed generation
        .route(
            "/api/v1/parse-job-description",
            post(generation::handle_parse_jd),
        )
        .route(
            "/api/v1/parse-resume-to-profile",
            post(generation::handle_parse_resume),
        )
        .route("/api/v1/tailor-resume", post(generation::handle_tailor_resume))
        .route("/api/v1/ats-score", post(generation::handle_ats_report))
        .route("/api/v1/cover-letter", post(generation::handle_cover_letter))
        // Uploads
        .route(
            "/api/v1/extract-pdf",
            post(handle_extract_pdf).layer(DefaultBodyLimit::max(MAX_PDF_BYTES)),
        )
        .with_state(state)
}
