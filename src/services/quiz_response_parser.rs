use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    models::domain::quiz::{QuestionRejection, Quiz, QuizQuestion},
    services::model_service::ModelError,
};

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("FENCED_JSON is a valid regex pattern")
});

/// Turns raw model output into a quiz. Never fails: undecodable text becomes
/// the fallback quiz and malformed entries are dropped.
pub fn parse_quiz_response(raw_text: &str, topic: &str) -> Quiz {
    let candidate = extract_candidate(raw_text);

    let document: Value = match serde_json::from_str(&candidate) {
        Ok(document) => document,
        Err(err) => {
            log::warn!("Quiz payload for '{}' is not valid JSON: {}", topic, err);
            return Quiz::fallback(topic, err);
        }
    };

    let entries = match document.get("questions") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            log::warn!("Quiz payload for '{}' has a non-array 'questions' field", topic);
            return Quiz::fallback(topic, "Invalid quiz format: 'questions' is not a list");
        }
        None => {
            log::warn!("Quiz payload for '{}' is missing 'questions'", topic);
            return Quiz::fallback(topic, "Invalid quiz format: missing 'questions' key");
        }
    };

    let mut questions = Vec::with_capacity(entries.len());
    let mut rejected = 0;
    for (index, entry) in entries.iter().enumerate() {
        match validate_entry(entry) {
            Ok(question) => questions.push(question),
            Err(reason) => {
                rejected += 1;
                log::warn!("Dropping quiz question {} for '{}': {}", index, topic, reason);
            }
        }
    }

    if questions.is_empty() && rejected > 0 {
        log::warn!("Every quiz question for '{}' was rejected", topic);
        return Quiz::fallback(
            topic,
            format!("no valid questions in payload ({} rejected)", rejected),
        );
    }

    Quiz::new(questions)
}

/// Routes a model call outcome to the parser or the invocation fallback.
pub fn resolve_quiz(outcome: Result<String, ModelError>, topic: &str) -> Quiz {
    match outcome {
        Ok(raw_text) => parse_quiz_response(&raw_text, topic),
        Err(err) => {
            log::error!("Quiz generation for '{}' failed: {}", topic, err);
            Quiz::from_invocation_failure(err)
        }
    }
}

fn extract_candidate(raw_text: &str) -> String {
    let candidate = FENCED_JSON
        .captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw_text);

    candidate
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn validate_entry(entry: &Value) -> Result<QuizQuestion, QuestionRejection> {
    let fields = entry.as_object().ok_or(QuestionRejection::NotAnObject)?;

    let question = match fields.get("question") {
        Some(Value::String(text)) => text.as_str(),
        Some(_) => return Err(QuestionRejection::WrongFieldType("question")),
        None => return Err(QuestionRejection::MissingQuestionText),
    };

    let options = string_list(fields, "options")?;

    let correct_answer = match fields.get("correct_answer") {
        Some(Value::String(letter)) => letter.as_str(),
        Some(_) => return Err(QuestionRejection::WrongFieldType("correct_answer")),
        None => return Err(QuestionRejection::InvalidCorrectAnswer(String::new())),
    };

    let rationale = match fields.get("explanation") {
        Some(Value::String(text)) => text.as_str(),
        Some(Value::Null) | None => "",
        Some(_) => return Err(QuestionRejection::WrongFieldType("explanation")),
    };

    QuizQuestion::try_new(question, options, correct_answer, rationale)
}

fn string_list(
    fields: &Map<String, Value>,
    key: &'static str,
) -> Result<Vec<String>, QuestionRejection> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(QuestionRejection::WrongFieldType(key))
            })
            .collect(),
        Some(_) => Err(QuestionRejection::WrongFieldType(key)),
        None => Err(QuestionRejection::WrongOptionCount(0)),
    }
}
