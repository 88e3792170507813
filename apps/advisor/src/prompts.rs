// Prompt templates for the resume critique.

/// Initial analysis template. Replace `{resume_text}` before sending.
pub const RESUME_ANALYSIS_TEMPLATE: &str = "\
You are a seasoned career advisor and resume expert. Analyze the resume provided below and perform the following tasks:
1. Identify the candidate's key skills and competencies.
2. Highlight the strengths and areas for improvement in the resume.
3. Provide actionable suggestions for formatting, content, and clarity enhancements.

Resume:
{resume_text}

Please provide your analysis in a clear and concise manner.";

/// Builds the first message of a session from the extracted resume text.
/// The text is embedded verbatim; an empty resume yields an empty slot.
pub fn build_initial_prompt(resume_text: &str) -> String {
    RESUME_ANALYSIS_TEMPLATE.replacen("{resume_text}", resume_text, 1)
}
