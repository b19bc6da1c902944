//! Match report: compares job-description keywords against resume keywords
//! and derives a 0–100 score with tiered advice.
//!
//! Algorithm:
//! 1. J = ordered keywords of the job description, R = keyword set of the resume
//! 2. matched = J ∩ R (J order), missing = J \ R (J order)
//! 3. score = round(|matched| / |J| × 100), or 0 when J is empty
//! 4. summary and recommendations come from the score tier

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ats::keywords::extract_keywords;

/// Missing keywords shown in the report body. The full list stays available.
const MISSING_DISPLAY_LIMIT: usize = 10;
/// Keywords turned into strength / improvement sentences.
const ADVICE_LIMIT: usize = 8;

const NO_STRENGTHS: &str = "No key skills detected from the job description.";
const FULL_COVERAGE: &str =
    "Great keyword coverage! Your resume addresses the key terms in the job description.";

// ────────────────────────────────────────────────────────────────────────────
// Score tiers
// ────────────────────────────────────────────────────────────────────────────

/// Score bracket. Lower bounds are inclusive: 30 is `Fair`, 60 is `Good`, 80 is `Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Low,
    Fair,
    Good,
    Excellent,
}

impl MatchTier {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            MatchTier::Excellent
        } else if score >= 60 {
            MatchTier::Good
        } else if score >= 30 {
            MatchTier::Fair
        } else {
            MatchTier::Low
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            MatchTier::Low => {
                "Low match. Your resume needs substantial revision to meet the job requirements."
            }
            MatchTier::Fair => {
                "Fair match. Consider significant updates to better align with the job description."
            }
            MatchTier::Good => {
                "Good match with room for improvement. Focus on incorporating missing keywords."
            }
            MatchTier::Excellent => {
                "Excellent match! Your resume strongly aligns with the job requirements."
            }
        }
    }

    /// Advice moves from structural rewrites (low) to polish (excellent).
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            MatchTier::Low => &[
                "Restructure your resume around the core requirements of the job description.",
                "Highlight your technical skills in a dedicated skills section.",
                "Adopt the terminology used in the job description wherever it honestly applies.",
            ],
            MatchTier::Fair => &[
                "Add the specific keywords from the job description that match your background.",
                "Quantify your achievements with concrete numbers and outcomes.",
                "Emphasize the projects most relevant to this role.",
            ],
            MatchTier::Good => &[
                "Fine-tune your resume by working in the missing keywords.",
                "Align your experience section more closely with the listed requirements.",
            ],
            MatchTier::Excellent => &[
                "Make minor optimizations to wording and formatting.",
                "Quantify your impact further where possible.",
            ],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MatchReport
// ────────────────────────────────────────────────────────────────────────────

/// Result of one scoring run. Built fresh per call and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    score: u8,
    tier: MatchTier,
    matched_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    all_missing_keywords: Vec<String>,
    job_keyword_count: usize,
    strengths: Vec<String>,
    improvements: Vec<String>,
    recommendations: Vec<String>,
    summary: String,
}

impl MatchReport {
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn tier(&self) -> MatchTier {
        self.tier
    }

    pub fn matched_keywords(&self) -> &[String] {
        &self.matched_keywords
    }

    /// First ten missing keywords, in job-description order.
    pub fn missing_keywords(&self) -> &[String] {
        &self.missing_keywords
    }

    /// Every missing keyword, untruncated.
    pub fn all_missing_keywords(&self) -> &[String] {
        &self.all_missing_keywords
    }

    pub fn job_keyword_count(&self) -> usize {
        self.job_keyword_count
    }

    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    pub fn improvements(&self) -> &[String] {
        &self.improvements
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Scores `resume_text` against `job_description_text`.
///
/// Deterministic and total: degenerate input yields a zero score, never an error.
pub fn score_match(resume_text: &str, job_description_text: &str) -> MatchReport {
    let job_keywords = extract_keywords(job_description_text);
    let resume_keywords: HashSet<String> = extract_keywords(resume_text).into_iter().collect();

    let (matched_keywords, all_missing_keywords): (Vec<String>, Vec<String>) = job_keywords
        .iter()
        .cloned()
        .partition(|kw| resume_keywords.contains(kw));

    let job_keyword_count = job_keywords.len();
    let score = compute_score(matched_keywords.len(), job_keyword_count);
    let tier = MatchTier::from_score(score);

    let missing_keywords: Vec<String> = all_missing_keywords
        .iter()
        .take(MISSING_DISPLAY_LIMIT)
        .cloned()
        .collect();

    let strengths = build_strengths(&matched_keywords);
    let improvements = build_improvements(&missing_keywords);

    MatchReport {
        score,
        tier,
        matched_keywords,
        missing_keywords,
        all_missing_keywords,
        job_keyword_count,
        strengths,
        improvements,
        recommendations: tier
            .recommendations()
            .iter()
            .map(|r| r.to_string())
            .collect(),
        summary: tier.summary().to_string(),
    }
}

fn compute_score(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = matched as f64 / total as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

fn build_strengths(matched: &[String]) -> Vec<String> {
    if matched.is_empty() {
        return vec![NO_STRENGTHS.to_string()];
    }
    matched
        .iter()
        .take(ADVICE_LIMIT)
        .map(|kw| format!("Strong match on \"{kw}\", which the job description asks for."))
        .collect()
}

fn build_improvements(missing: &[String]) -> Vec<String> {
    if missing.is_empty() {
        return vec![FULL_COVERAGE.to_string()];
    }
    missing
        .iter()
        .take(ADVICE_LIMIT)
        .map(|kw| format!("Consider adding \"{kw}\" if it reflects your experience."))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the downloadable plain-text version of a report.
pub fn render_text_report(report: &MatchReport, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "ATS COMPATIBILITY REPORT");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out);
    let _ = writeln!(out, "ATS SCORE: {}/100", report.score());
    let _ = writeln!(out);

    push_section(&mut out, "SUMMARY", &[report.summary()]);
    push_section(&mut out, "STRENGTHS", report.strengths());
    push_section(&mut out, "AREAS FOR IMPROVEMENT", report.improvements());
    push_section(&mut out, "RECOMMENDATIONS", report.recommendations());

    let _ = writeln!(out, "MATCHED KEYWORDS");
    let _ = writeln!(out, "{}", join_or_none(report.matched_keywords()));
    let _ = writeln!(out);
    let _ = writeln!(out, "MISSING KEYWORDS");
    let _ = writeln!(out, "{}", join_or_none(report.missing_keywords()));

    out
}

fn push_section<S: AsRef<str>>(out: &mut String, title: &str, lines: &[S]) {
    let _ = writeln!(out, "{title}");
    for line in lines {
        let _ = writeln!(out, "- {}", line.as_ref());
    }
    let _ = writeln!(out);
}

fn join_or_none(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "None".to_string()
    } else {
        keywords.join(", ")
    }
}
