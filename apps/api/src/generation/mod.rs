// LLM-backed endpoints: JD parsing, resume-to-profile parsing, resume tailoring,
// ATS report, cover letter.
// All LLM calls go through llm_client::Dispatcher, no direct API calls here.
// Model output schemas are not modeled; JSON answers are passed through as-is,
// except parsed profiles, which are cleaned into `ParsedProfile`.

pub mod handlers;
pub mod jd_parser;
pub mod profile_parser;
pub mod prompts;
