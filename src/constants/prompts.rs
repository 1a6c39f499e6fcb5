use crate::models::domain::DifficultyLevel;

/// Characters of uploaded material passed into the explanation prompt.
pub const CONTEXT_PROMPT_CHARS: usize = 2000;

/// Characters of the explanation passed into the summary and quiz prompts.
pub const EXPLANATION_PROMPT_CHARS: usize = 3000;

pub const JSON_ONLY_INSTRUCTION: &str = "Return valid JSON only, no additional text";

pub fn explanation_framing(level: DifficultyLevel) -> &'static str {
    match level {
        DifficultyLevel::Beginner => "Explain this topic in very simple terms, as if teaching a complete beginner. Use everyday examples and avoid jargon.",
        DifficultyLevel::Intermediate => "Explain this topic with moderate detail, assuming some foundational knowledge. Include relevant examples and concepts.",
        DifficultyLevel::Advanced => "Provide an in-depth, technical explanation. Include advanced concepts, nuances, and technical terminology.",
    }
}

pub fn quiz_framing(level: DifficultyLevel) -> &'static str {
    match level {
        DifficultyLevel::Beginner => "Use plain language and focus on the core ideas a newcomer must understand.",
        DifficultyLevel::Intermediate => "Ask questions that apply the concepts to concrete examples and situations.",
        DifficultyLevel::Advanced => "Probe nuances, edge cases and precise technical terminology.",
    }
}

pub const SUMMARY_REQUIREMENTS: &str = "The summary should:
- Be 3-5 bullet points
- Highlight the most important concepts
- Be easy to remember and review

Format as bullet points using markdown.";

pub const QUIZ_REQUIREMENTS: &str = "Make sure:
- Questions test understanding, not just memorization
- Every question has exactly 4 options labelled \"A)\" to \"D)\" in order
- \"correct_answer\" is a single letter: A, B, C or D
- All options are plausible
- Explanations are helpful for learning";

pub const IMPROVEMENT_REQUIREMENTS: &str =
    "Suggest how the explanation or learning materials could be improved based on this feedback.
Be specific and constructive.";
