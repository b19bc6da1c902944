//! Profile Parser: turns extracted resume text into a cleaned candidate profile.
//!
//! The model's answer is loosely shaped, so it is read as `serde_json::Value`
//! and normalized field by field into [`ParsedProfile`]. Everything after the
//! LLM call is deterministic.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::generation::jd_parser::{parse_model_json, validate_input_text};
use crate::generation::prompts::RESUME_PARSE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{collapse_whitespace, fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::Dispatcher;

pub const SKILL_CATEGORIES: &[&str] = &["Soft Skill", "Hard Skill", "Technical Skill"];
pub const SKILL_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced", "Expert"];
pub const DEFAULT_SKILL_LEVEL: &str = "Intermediate";
pub const DEFAULT_LANGUAGE_LEVEL: &str = "Conversational";
pub const UNKNOWN_NAME: &str = "Unknown";

// ────────────────────────────────────────────────────────────────────────────
// Profile types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<Skill>,
    pub certifications: Vec<Certification>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub links: Links,
    pub languages: Vec<Language>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub skill: String,
    pub category: Option<String>,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub credential_id: String,
    pub credential_url: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Education {
    pub field: String,
    pub degree: String,
    pub description: String,
    pub institution: String,
    pub location: String,
    pub duration: String,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Links {
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub language: String,
    pub level: String,
}

/// Post-processing switches supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileOptions {
    #[serde(default)]
    pub include_personal_info: Option<bool>,
    #[serde(default)]
    pub max_skills: Option<usize>,
    #[serde(default)]
    pub max_experience: Option<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Field readers
// ────────────────────────────────────────────────────────────────────────────

/// Trimmed string, or `""` when absent or not a string.
fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed string, or `None` when absent, blank or not a string.
fn optional_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    Some(text(obj, key)).filter(|s| !s.is_empty())
}

/// Trimmed non-blank strings of an array field.
fn text_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Object entries of an array field whose `required` key is a non-blank string.
fn entries<'a>(
    root: &'a Map<String, Value>,
    field: &str,
    required: &'a str,
) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    root.get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .filter(move |entry| !text(entry, required).is_empty())
}

fn one_of(value: String, allowed: &[&str]) -> Option<String> {
    allowed
        .iter()
        .find(|candidate| **candidate == value)
        .map(|candidate| candidate.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Cleaning
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes raw model output into a [`ParsedProfile`].
///
/// Every string is trimmed, entries missing their identifying field are
/// dropped, skill categories and levels are restricted to the known sets,
/// and skills are deduplicated case-insensitively keeping the first.
pub fn clean_profile(raw: &Value) -> ParsedProfile {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);

    let mut seen_skills = HashSet::new();
    let skills = entries(root, "skills", "skill")
        .map(|entry| Skill {
            skill: text(entry, "skill"),
            category: one_of(text(entry, "category"), SKILL_CATEGORIES),
            level: one_of(text(entry, "level"), SKILL_LEVELS)
                .unwrap_or_else(|| DEFAULT_SKILL_LEVEL.to_string()),
        })
        .filter(|skill| seen_skills.insert(skill.skill.to_lowercase()))
        .collect();

    let certifications = entries(root, "certifications", "name")
        .map(|entry| Certification {
            name: text(entry, "name"),
            issuer: text(entry, "issuer"),
            issue_date: text(entry, "issue_date"),
            expiry_date: text(entry, "expiry_date"),
            credential_id: text(entry, "credential_id"),
            credential_url: text(entry, "credential_url"),
            year: text(entry, "year"),
        })
        .collect();

    let experience = entries(root, "experience", "title")
        .map(|entry| Experience {
            title: text(entry, "title"),
            company: text(entry, "company"),
            duration: text(entry, "duration"),
            location: text(entry, "location"),
            responsibilities: text_list(entry, "responsibilities"),
        })
        .collect();

    let education = entries(root, "education", "institution")
        .map(|entry| Education {
            field: text(entry, "field"),
            degree: text(entry, "degree"),
            description: text(entry, "description"),
            institution: text(entry, "institution"),
            location: text(entry, "location"),
            duration: text(entry, "duration"),
            gpa: entry.get("gpa").and_then(Value::as_f64),
        })
        .collect();

    let projects = root
        .get("projects")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(|entry| Project {
            name: optional_text(entry, "name"),
            description: optional_text(entry, "description"),
            technologies: text_list(entry, "technologies"),
            link: optional_text(entry, "link"),
        })
        .filter(|project| project.name.is_some() || project.description.is_some())
        .collect();

    let links = root
        .get("links")
        .and_then(Value::as_object)
        .map(|links| Links {
            linkedin: optional_text(links, "linkedin"),
            portfolio: optional_text(links, "portfolio"),
            github: optional_text(links, "github"),
        })
        .unwrap_or_default();

    let languages = entries(root, "languages", "language")
        .map(|entry| Language {
            language: text(entry, "language"),
            level: optional_text(entry, "level")
                .unwrap_or_else(|| DEFAULT_LANGUAGE_LEVEL.to_string()),
        })
        .collect();

    ParsedProfile {
        name: optional_text(root, "name").unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        email: optional_text(root, "email"),
        phone: optional_text(root, "phone"),
        location: optional_text(root, "location"),
        summary: optional_text(root, "summary"),
        skills,
        certifications,
        experience,
        education,
        projects,
        links,
        languages,
    }
}

/// Applies caller options to a cleaned profile.
///
/// A limit of zero is treated as "no limit".
pub fn apply_options(profile: &mut ParsedProfile, options: &ProfileOptions) {
    if let Some(max) = options.max_skills.filter(|&n| n > 0) {
        profile.skills.truncate(max);
    }
    if let Some(max) = options.max_experience.filter(|&n| n > 0) {
        profile.experience.truncate(max);
    }
    if options.include_personal_info == Some(false) {
        profile.email = None;
        profile.phone = None;
        profile.location = None;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub fn build_profile_prompt(resume_text: &str) -> String {
    let resume_text = collapse_whitespace(resume_text);
    fill_template(
        RESUME_PARSE_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Parses resume text into a cleaned profile via the LLM.
pub async fn parse_profile(
    resume_text: &str,
    options: &ProfileOptions,
    dispatcher: &Dispatcher,
) -> Result<ParsedProfile, AppError> {
    validate_input_text("parsed_resume_data", resume_text)?;

    let text = dispatcher.generate(&build_profile_prompt(resume_text)).await?;
    let raw = parse_model_json(&text, "Resume parsing")?;

    let mut profile = clean_profile(&raw);
    apply_options(&mut profile, options);

    info!(
        "Resume parsed: {} skills, {} experience entries",
        profile.skills.len(),
        profile.experience.len()
    );
    Ok(profile)
}
