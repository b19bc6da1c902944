//! Axum route handlers for the LLM-backed generation endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::generation::jd_parser::{parse_jd, parse_model_json};
use crate::generation::profile_parser::{parse_profile, ParsedProfile, ProfileOptions};
use crate::generation::prompts::{
    ATS_REPORT_PROMPT_TEMPLATE, COVER_LETTER_PROMPT_TEMPLATE, TAILOR_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{
    collapse_whitespace, fill_template, to_prompt_json, JSON_ONLY_INSTRUCTION,
};
use crate::llm_client::{DispatchError, LlmError};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseJdRequest {
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub parsed_resume_data: String,
    #[serde(default)]
    pub options: ProfileOptions,
}

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub profile: ParsedProfile,
}

#[derive(Debug, Deserialize)]
pub struct TailorResumeRequest {
    pub job_description: String,
    #[serde(default)]
    pub profile: Value,
}

#[derive(Debug, Deserialize)]
pub struct AtsReportRequest {
    pub job_description: String,
    #[serde(default)]
    pub resume_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub job_description: String,
    #[serde(default)]
    pub resume_data: Value,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_present(value: &Value, field: &str) -> Result<(), AppError> {
    if value.is_null() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Clients send either `{ "resume": {...} }` wrappers or the resume itself.
fn unwrap_resume(resume_data: &Value) -> &Value {
    match resume_data.get("resume") {
        Some(inner) if !inner.is_null() => inner,
        _ => resume_data,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/parse-job-description
pub async fn handle_parse_jd(
    State(state): State<AppState>,
    Json(request): Json<ParseJdRequest>,
) -> Result<Json<Value>, AppError> {
    let parsed = parse_jd(&request.raw_text, &state.dispatcher).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/parse-resume-to-profile
///
/// Returns the cleaned profile for preview; nothing is persisted.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let profile = parse_profile(
        &request.parsed_resume_data,
        &request.options,
        &state.dispatcher,
    )
    .await?;
    Ok(Json(ParseResumeResponse { profile }))
}

/// POST /api/v1/tailor-resume
///
/// Produces a tailored resume JSON from the candidate profile and a JD.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(request): Json<TailorResumeRequest>,
) -> Result<Json<Value>, AppError> {
    require_job_description(&request.job_description)?;
    require_present(&request.profile, "profile")?;

    let profile = to_prompt_json(&request.profile);
    let prompt = fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("profile", profile.as_str()),
            ("job_description", request.job_description.trim()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let text = state.dispatcher.generate(&prompt).await?;
    let resume = parse_model_json(&text, "Resume tailoring")?;
    info!("Tailored resume generated");
    Ok(Json(resume))
}

/// POST /api/v1/ats-score
///
/// LLM-graded ATS analysis. See `/api/v1/ats/local-score` for the local scorer.
pub async fn handle_ats_report(
    State(state): State<AppState>,
    Json(request): Json<AtsReportRequest>,
) -> Result<Json<Value>, AppError> {
    require_job_description(&request.job_description)?;
    require_present(&request.resume_data, "resume_data")?;

    let resume = to_prompt_json(&request.resume_data);
    let prompt = fill_template(
        ATS_REPORT_PROMPT_TEMPLATE,
        &[
            ("job_description", request.job_description.trim()),
            ("resume", resume.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let text = state.dispatcher.generate(&prompt).await?;
    let report = parse_model_json(&text, "ATS analysis")?;
    Ok(Json(report))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require_job_description(&request.job_description)?;
    require_present(&request.resume_data, "resume_data")?;

    let profile = unwrap_resume(&request.resume_data).to_string();
    let prompt = collapse_whitespace(&fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("job_description", request.job_description.as_str()),
            ("profile", profile.as_str()),
            ("tone", request.tone.as_str()),
        ],
    ));

    let text = state.dispatcher.generate(&prompt).await?;
    let cover_letter = text.trim().to_string();
    if cover_letter.is_empty() {
        return Err(DispatchError::Llm(LlmError::EmptyContent).into());
    }

    info!("Cover letter generated ({} chars)", cover_letter.len());
    Ok(Json(CoverLetterResponse { cover_letter }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::AttemptOutcome;
    use crate::routes::build_router;
    use crate::state::test_support::state_with_script;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn success(text: &str) -> Result<AttemptOutcome, LlmError> {
        Ok(AttemptOutcome::Success(text.to_string()))
    }

    #[test]
    fn test_unwrap_resume_prefers_nested_resume() {
        let wrapped = json!({"id": 1, "resume": {"name": "Jane"}});
        assert_eq!(unwrap_resume(&wrapped), &json!({"name": "Jane"}));

        let direct = json!({"name": "Jane"});
        assert_eq!(unwrap_resume(&direct), &direct);
    }

    #[tokio::test]
    async fn test_parse_jd_returns_model_json() {
        let (state, backend) =
            state_with_script(&["key-a"], vec![success("```json\n{\"title\": \"Rust Engineer\"}\n```")]);

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/parse-job-description",
                json!({ "raw_text": "Rust Engineer\n\nMust have Tokio" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Rust Engineer");
        assert!(backend.prompts()[0].contains("Rust Engineer Must have Tokio"));
    }

    #[tokio::test]
    async fn test_parse_jd_empty_text_makes_no_call() {
        let (state, backend) = state_with_script(&["key-a"], vec![]);
        let (status, body) = send(
            build_router(state),
            post_json("/api/v1/parse-job-description", json!({ "raw_text": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_resume_returns_cleaned_profile() {
        let model_answer = json!({
            "name": " Jane Doe ",
            "email": "jane@example.com",
            "phone": "+49 123",
            "location": "Berlin",
            "skills": [
                {"skill": "Rust", "level": "Expert"},
                {"skill": "RUST", "level": "Beginner"},
                {"skill": "Go", "level": "Wizard"},
                {"skill": "SQL"}
            ],
            "experience": [
                {"title": "Engineer", "company": "Acme"},
                {"title": "Intern", "company": "Initech"}
            ]
        });
        let (state, backend) = state_with_script(
            &["key-a"],
            vec![success(&format!("```json\n{model_answer}\n```"))],
        );

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/parse-resume-to-profile",
                json!({
                    "parsed_resume_data": "Jane Doe\n\n  Rust   Engineer",
                    "options": {"max_skills": 2, "max_experience": 1, "include_personal_info": false}
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let profile = &body["profile"];
        assert_eq!(profile["name"], "Jane Doe");
        assert_eq!(profile["email"], Value::Null);
        assert_eq!(profile["phone"], Value::Null);
        assert_eq!(profile["location"], Value::Null);
        assert_eq!(profile["skills"].as_array().unwrap().len(), 2);
        assert_eq!(profile["skills"][0]["skill"], "Rust");
        assert_eq!(profile["skills"][1]["skill"], "Go");
        assert_eq!(profile["skills"][1]["level"], "Intermediate");
        assert_eq!(profile["experience"].as_array().unwrap().len(), 1);
        assert!(backend.prompts()[0].contains("Jane Doe Rust Engineer"));
    }

    #[tokio::test]
    async fn test_parse_resume_rejects_oversized_text() {
        let (state, backend) = state_with_script(&["key-a"], vec![]);
        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/parse-resume-to-profile",
                json!({ "parsed_resume_data": "a".repeat(50_001) }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_resume_rejects_empty_text() {
        let (state, backend) = state_with_script(&["key-a"], vec![]);
        let (status, _) = send(
            build_router(state),
            post_json(
                "/api/v1/parse-resume-to-profile",
                json!({ "parsed_resume_data": "   " }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_model_json_is_unprocessable() {
        let (state, _) = state_with_script(&["key-a"], vec![success("I cannot help with that.")]);
        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/tailor-resume",
                json!({ "job_description": "Rust", "profile": {"name": "Jane"} }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_tailor_requires_profile() {
        let (state, backend) = state_with_script(&["key-a"], vec![]);
        let (status, _) = send(
            build_router(state),
            post_json("/api/v1/tailor-resume", json!({ "job_description": "Rust" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ats_report_fails_over_to_second_key() {
        let (state, backend) = state_with_script(
            &["key-a", "key-b"],
            vec![
                Ok(AttemptOutcome::RateLimited),
                success("{\"overall_fit_score_percentage\": 72}"),
            ],
        );

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/ats-score",
                json!({ "job_description": "Rust Kafka", "resume_data": {"skills": ["Rust"]} }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overall_fit_score_percentage"], 72);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_pool_exhaustion_maps_to_rate_limited() {
        let (state, _) = state_with_script(
            &["key-a", "key-b"],
            vec![Ok(AttemptOutcome::RateLimited), Ok(AttemptOutcome::Unavailable)],
        );

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/ats-score",
                json!({ "job_description": "Rust", "resume_data": {"skills": []} }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn test_missing_credentials_map_to_misconfigured() {
        let (state, backend) = state_with_script(&[], vec![]);
        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/cover-letter",
                json!({ "job_description": "Rust", "resume_data": {"name": "Jane"} }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "GENERATION_MISCONFIGURED");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_retryable_status_maps_to_bad_gateway() {
        let (state, backend) = state_with_script(
            &["key-a", "key-b"],
            vec![Ok(AttemptOutcome::OtherError {
                status: 400,
                body: "API key not valid".to_string(),
            })],
        );

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/cover-letter",
                json!({ "job_description": "Rust", "resume_data": {"name": "Jane"} }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_user_text_placeholders_are_not_expanded() {
        let (state, backend) = state_with_script(&["key-a"], vec![success("Dear team,")]);

        let (status, _) = send(
            build_router(state),
            post_json(
                "/api/v1/cover-letter",
                json!({
                    "job_description": "Platform Engineer at Acme",
                    "resume_data": {"summary": "Loves {job_description} templates"},
                    "tone": "warm {profile}"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let prompt = &backend.prompts()[0];
        assert_eq!(prompt.matches("Platform Engineer at Acme").count(), 1);
        assert!(prompt.contains("Loves {job_description} templates"));
        assert!(prompt.contains("Tone: warm {profile}"));
    }

    #[tokio::test]
    async fn test_tailor_prompt_keeps_profile_text_literal() {
        let (state, backend) = state_with_script(&["key-a"], vec![success("{}")]);

        let (status, _) = send(
            build_router(state),
            post_json(
                "/api/v1/tailor-resume",
                json!({
                    "job_description": "Rust Engineer",
                    "profile": {"summary": "see {job_description} and {json_only}"}
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let prompt = &backend.prompts()[0];
        assert!(prompt.contains("see {job_description} and {json_only}"));
        assert_eq!(prompt.matches("Rust Engineer").count(), 1);
        assert_eq!(prompt.matches("valid JSON only").count(), 1);
    }

    #[tokio::test]
    async fn test_cover_letter_defaults_tone_and_unwraps_resume() {
        let (state, backend) =
            state_with_script(&["key-a"], vec![success("  Dear Hiring Manager,\n\nHello.  ")]);

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/cover-letter",
                json!({
                    "job_description": "Backend   Engineer",
                    "resume_data": {"id": 9, "resume": {"name": "Jane Doe"}}
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cover_letter"], "Dear Hiring Manager,\n\nHello.");

        let prompt = &backend.prompts()[0];
        assert!(prompt.contains("Tone: professional"));
        assert!(prompt.contains("Jane Doe"));
        assert!(!prompt.contains("\"id\""));
        assert!(prompt.contains("Backend Engineer"));
        assert!(!prompt.contains('\n'));
    }
}
