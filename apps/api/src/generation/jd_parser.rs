//! JD Parser: turns a raw job description into a structured JSON object via the LLM.

use serde_json::Value;

use crate::errors::AppError;
use crate::generation::prompts::JD_PARSE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{collapse_whitespace, fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{strip_json_fences, Dispatcher};

/// Upper bound on accepted job description or resume text length, in characters.
pub const MAX_JD_CHARS: usize = 50_000;

/// Rejects empty or oversized free-text input named `field`.
pub fn validate_input_text(field: &str, text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    if text.chars().count() > MAX_JD_CHARS {
        return Err(AppError::Validation(format!(
            "{field} is too long (max {MAX_JD_CHARS} characters)"
        )));
    }
    Ok(())
}

pub fn validate_jd_text(raw_text: &str) -> Result<(), AppError> {
    validate_input_text("raw_text", raw_text)
}

pub fn build_jd_prompt(raw_text: &str) -> String {
    let jd_text = collapse_whitespace(raw_text);
    fill_template(
        JD_PARSE_PROMPT_TEMPLATE,
        &[
            ("jd_text", jd_text.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Parses a job description and returns the model's JSON object.
pub async fn parse_jd(raw_text: &str, dispatcher: &Dispatcher) -> Result<Value, AppError> {
    validate_jd_text(raw_text)?;
    let text = dispatcher.generate(&build_jd_prompt(raw_text)).await?;
    parse_model_json(&text, "JD parsing")
}

/// Parses model output as JSON, tolerating markdown code fences.
pub fn parse_model_json(text: &str, what: &str) -> Result<Value, AppError> {
    serde_json::from_str(strip_json_fences(text)).map_err(|e| {
        AppError::UnprocessableEntity(format!("{what} returned invalid JSON: {e}"))
    })
}
