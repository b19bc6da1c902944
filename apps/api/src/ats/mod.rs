// Local ATS compatibility scoring.
// Pure keyword matching between resume text and a job description; no LLM call.

pub mod handlers;
pub mod keywords;
pub mod report;
