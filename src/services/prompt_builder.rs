use std::num::NonZeroU32;

use once_cell::sync::Lazy;

use crate::{
    constants::prompts::{
        explanation_framing, quiz_framing, CONTEXT_PROMPT_CHARS, EXPLANATION_PROMPT_CHARS,
        IMPROVEMENT_REQUIREMENTS, JSON_ONLY_INSTRUCTION, QUIZ_REQUIREMENTS, SUMMARY_REQUIREMENTS,
    },
    models::{domain::DifficultyLevel, dto::quiz_payload::RawQuizPayload},
};

pub const DEFAULT_QUESTION_COUNT: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

static QUIZ_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(RawQuizPayload);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

static QUIZ_EXAMPLE: Lazy<String> =
    Lazy::new(|| serde_json::to_string_pretty(&RawQuizPayload::example()).unwrap_or_default());

/// Everything needed to ask the model for one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty_level: DifficultyLevel,
    pub source_explanation: String,
    pub question_count: NonZeroU32,
}

impl QuizRequest {
    pub fn new(topic: &str, difficulty_level: DifficultyLevel, source_explanation: &str) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty_level,
            source_explanation: source_explanation.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn with_question_count(mut self, question_count: NonZeroU32) -> Self {
        self.question_count = question_count;
        self
    }
}

/// Hard cut to the first `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn build_quiz_prompt(request: &QuizRequest) -> String {
    let level = request.difficulty_level;
    format!(
        "Based on this explanation of {topic}, create a {count}-question multiple choice quiz.

Explanation:
{explanation}

Create questions appropriate for a {level} level learner. {framing}

Return the quiz as a single JSON object that conforms to this JSON schema:
{schema}

Example of the exact format:
{example}

{requirements}
- {json_only}
",
        topic = request.topic,
        count = request.question_count,
        explanation = truncate_chars(&request.source_explanation, EXPLANATION_PROMPT_CHARS),
        level = level,
        framing = quiz_framing(level),
        schema = QUIZ_SCHEMA.as_str(),
        example = QUIZ_EXAMPLE.as_str(),
        requirements = QUIZ_REQUIREMENTS,
        json_only = JSON_ONLY_INSTRUCTION,
    )
}

pub fn build_explanation_prompt(topic: &str, level: DifficultyLevel, context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("Additional Context: {}\n\n", truncate_chars(c, CONTEXT_PROMPT_CHARS)))
        .unwrap_or_default();

    format!(
        "{framing}

Topic: {topic}

{context}Provide a clear, well-structured explanation that is appropriate for a {level} level learner.
Use paragraphs, examples, and make it engaging and easy to understand.
",
        framing = explanation_framing(level),
    )
}

pub fn build_summary_prompt(topic: &str, explanation: &str, level: DifficultyLevel) -> String {
    format!(
        "Based on this explanation of {topic}, create a concise summary that captures the key points.

Explanation:
{explanation}

Create a summary appropriate for a {level} level learner.
{SUMMARY_REQUIREMENTS}
",
        explanation = truncate_chars(explanation, EXPLANATION_PROMPT_CHARS),
    )
}

pub fn build_improvement_prompt(topic: &str, feedback: &str) -> String {
    format!(
        "A user studied the topic: {topic}
They provided this feedback: {feedback}

{IMPROVEMENT_REQUIREMENTS}
"
    )
}
