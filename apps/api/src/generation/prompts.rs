// All LLM prompt templates for the generation endpoints.
// Placeholders are `{name}` and are filled with `fill_template` before sending.

/// JD parsing prompt. Replace `{jd_text}` before sending.
pub const JD_PARSE_PROMPT_TEMPLATE: &str = r#"You are a specialized job description parser. Extract information from the job description below and return a JSON object with this structure:
{
  "title": "The job title/position name",
  "company": "Company name if mentioned, otherwise null",
  "location": "Job location if specified, otherwise null",
  "employment_type": "full-time, part-time, contract, internship, etc. or null",
  "experience_level": "entry, mid, senior, lead, executive, etc. or null",
  "salary_range": "Salary information if mentioned, otherwise null",
  "required_skills": ["Technical skills, tools, languages, certifications that are mandatory"],
  "preferred_skills": ["Nice-to-have skills, preferred qualifications"],
  "responsibilities": ["Main job duties and responsibilities"],
  "qualifications": ["Education, experience, and other requirements"],
  "benefits": ["Compensation, benefits, perks mentioned"],
  "department": "Department/team if mentioned, otherwise null"
}

EXTRACTION RULES:
1. Extract the actual skills, tools and technologies mentioned (e.g. "Python", "AWS", "5+ years experience").
2. For responsibilities, extract concrete tasks and duties, not vague statements.
3. Separate required from preferred skills: "must have", "required", "essential" vs "nice to have", "preferred", "bonus".
4. Include years of experience in skill descriptions when specified.
5. If information is not available, use null for strings or [] for arrays.

JOB DESCRIPTION:
{jd_text}

{json_only}"#;

/// Tailored resume prompt. Replace `{profile}` and `{job_description}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer.
Given this candidate profile:
{profile}

And this job description:
{job_description}

Generate a tailored resume as a JSON object with this structure:
{
  "name": "Full Name",
  "email": "Email Address",
  "phone": "Phone Number (if available)",
  "location": "City, Country (if available)",
  "summary": "Tailored professional summary",
  "skills": ["Relevant skills as presented in the profile"],
  "languages": ["Languages spoken, if present in the profile"],
  "certifications": [{"name": "Certification name", "issuer": "Issuing organization", "year": "Year obtained"}],
  "experience": [{"title": "Job title", "company": "Company name", "duration": "Employment duration", "location": "City, Country", "responsibilities": ["Key responsibilities and achievements"]}],
  "education": [{"degree": "Degree title", "institution": "University or school", "location": "City, Country", "year": "Graduation year"}],
  "projects": [{"title": "Project title", "description": "Brief description", "technologies": ["Tech used"], "outcome": "Result or impact"}],
  "links": {"linkedin": "LinkedIn URL", "portfolio": "Portfolio URL", "github": "GitHub URL"}
}
Use a professional tone. Prioritize relevance, match job keywords, use strong action verbs, and quantify achievements where the profile supports it. Never invent employers, dates or credentials.

{json_only}"#;

/// ATS analysis prompt. Replace `{job_description}` and `{resume}`.
pub const ATS_REPORT_PROMPT_TEMPLATE: &str = r#"Analyze the JOB_DESCRIPTION and CANDIDATE_RESUME below using the TAILOR ATS framework:
Target keywords, Achieved impact, Industry relevance, Length of experience, Optimized formatting, Role alignment.

Return a JSON object with:
- "candidate_name", "job_title"
- "overall_fit_score_percentage" (0-100) and "overall_recommendation"
- "tailor_analysis" with one object per framework dimension, each holding a "score_percentage", the supporting evidence lists (for target keywords: "matched_keywords" and "missing_keywords") and a concise "explanation"
- "red_flags" (array of strings) and "notes"

JOB_DESCRIPTION:
{job_description}

CANDIDATE_RESUME:
{resume}

{json_only}"#;

/// Cover letter prompt. Replace `{job_description}`, `{profile}` and `{tone}`.
/// Whitespace is collapsed before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are a communications expert and career strategist who writes high-impact, ATS-optimized cover letters.
Craft a compelling, personalized cover letter tailored to the job description below:
{job_description}

Based on this candidate's resume/profile data:
{profile}

Tone: {tone}

Guidelines:
- Start with a strong, personalized opening.
- Highlight the most relevant achievements with quantifiable results.
- Reflect personality and alignment with the role.
- End with a clear, confident call to action.
- Keep it concise (3-4 paragraphs).
- Sound natural and avoid generic language.

Return only the plain text of the final cover letter, no extra formatting or markdown."#;

/// Resume-to-profile prompt. Replace `{resume_text}`.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured data from the resume below and return a JSON object with this structure:
{
  "name": "Full name",
  "email": "Email or null",
  "phone": "Phone or null",
  "location": "Address or null",
  "summary": "Professional summary or null",
  "skills": [{"skill": "Name", "category": "Soft Skill | Hard Skill | Technical Skill | null", "level": "Beginner | Intermediate | Advanced | Expert"}],
  "certifications": [{"name": "Name", "issuer": "Organization", "issue_date": "Date or ''", "expiry_date": "Date or ''", "credential_id": "ID or ''", "credential_url": "URL or ''", "year": "Year or ''"}],
  "experience": [{"title": "Job title", "company": "Company", "duration": "e.g. Jan 2020 - Present", "location": "Location or ''", "responsibilities": ["Tasks and achievements"]}],
  "education": [{"field": "Field of study", "degree": "Degree", "description": "Optional or ''", "institution": "School", "location": "Location or ''", "duration": "e.g. 2016-2020", "gpa": "number or null"}],
  "projects": [{"name": "Name or null", "description": "Description or null", "technologies": ["Tech used"], "link": "URL or null"}],
  "links": {"linkedin": "URL or null", "portfolio": "URL or null", "github": "URL or null"},
  "languages": [{"language": "Name", "level": "Proficiency"}]
}

RULES:
1. Categorize skills as Technical (tools, code), Hard (measurable) or Soft (personal).
2. Preserve date formats as written.
3. Infer skill levels, defaulting to "Intermediate".
4. Include social and project links.
5. Use null, empty strings or [] where information is missing.

RESUME DATA:
{resume_text}

{json_only}"#;
