use std::fmt;

use async_graphql::{Enum, Object, SimpleObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPTIONS_PER_QUESTION: usize = 4;

pub const MALFORMED_PAYLOAD_PREFIX: &str = "Quiz generation encountered an error";
pub const INVOCATION_FAILED_PREFIX: &str = "Error generating quiz";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Enum)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; OPTIONS_PER_QUESTION] =
        [OptionLetter::A, OptionLetter::B, OptionLetter::C, OptionLetter::D];

    pub fn as_char(&self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
        }
    }

    /// Exact, case-sensitive match on a single letter.
    pub fn from_exact(value: &str) -> Option<Self> {
        match value {
            "A" => Some(OptionLetter::A),
            "B" => Some(OptionLetter::B),
            "C" => Some(OptionLetter::C),
            "D" => Some(OptionLetter::D),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The "A)" style label options are prefixed with.
    pub fn label(&self) -> String {
        format!("{})", self.as_char())
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionRejection {
    #[error("question text is missing or blank")]
    MissingQuestionText,

    #[error("expected 4 options, found {0}")]
    WrongOptionCount(usize),

    #[error("option {index} is labelled '{found}' but should be '{expected}'")]
    MislabelledOption {
        index: usize,
        expected: OptionLetter,
        found: char,
    },

    #[error("correct answer '{0}' is not one of A, B, C, D")]
    InvalidCorrectAnswer(String),

    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("field '{0}' has the wrong type")]
    WrongFieldType(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    question_text: String,
    options: Vec<String>,
    correct_answer_letter: OptionLetter,
    rationale: String,
}

impl QuizQuestion {
    /// Validates a candidate question. Unlabelled options get their positional
    /// label; options labelled with another letter are rejected.
    pub fn try_new(
        question_text: &str,
        options: Vec<String>,
        correct_answer: &str,
        rationale: &str,
    ) -> Result<Self, QuestionRejection> {
        let question_text = question_text.trim();
        if question_text.is_empty() {
            return Err(QuestionRejection::MissingQuestionText);
        }

        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionRejection::WrongOptionCount(options.len()));
        }

        let options = options
            .into_iter()
            .zip(OptionLetter::ALL)
            .enumerate()
            .map(|(index, (option, letter))| label_option(index, option.trim(), letter))
            .collect::<Result<Vec<_>, _>>()?;

        let correct_answer_letter = normalize_answer_letter(correct_answer)
            .ok_or_else(|| QuestionRejection::InvalidCorrectAnswer(correct_answer.to_string()))?;

        Ok(Self {
            question_text: question_text.to_string(),
            options,
            correct_answer_letter,
            rationale: rationale.trim().to_string(),
        })
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer_letter(&self) -> OptionLetter {
        self.correct_answer_letter
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }
}

/// Clients see the question and its options only. The answer key and
/// rationale come back in `GradeResult` once answers are submitted.
#[Object]
impl QuizQuestion {
    #[graphql(name = "questionText")]
    async fn resolve_question_text(&self) -> String {
        self.question_text.clone()
    }

    #[graphql(name = "options")]
    async fn resolve_options(&self) -> Vec<String> {
        self.options.clone()
    }
}

fn label_option(
    index: usize,
    option: &str,
    letter: OptionLetter,
) -> Result<String, QuestionRejection> {
    let mut chars = option.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(')')) if first.is_ascii_alphabetic() => {
            if first.to_ascii_uppercase() == letter.as_char() {
                Ok(format!("{} {}", letter.label(), chars.as_str().trim_start()))
            } else {
                Err(QuestionRejection::MislabelledOption {
                    index,
                    expected: letter,
                    found: first,
                })
            }
        }
        _ => Ok(format!("{} {}", letter.label(), option)),
    }
}

/// Accepts "B", " b ", "B)" for the answer key the model emits.
fn normalize_answer_letter(value: &str) -> Option<OptionLetter> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix(')').unwrap_or(trimmed).trim();
    OptionLetter::from_exact(&trimmed.to_ascii_uppercase())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
pub enum GenerationErrorKind {
    /// The model answered, but not with a usable quiz payload.
    MalformedPayload,
    /// The model call itself failed; no text was produced.
    InvocationFailed,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_error: Option<GenerationError>,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            generation_error: None,
        }
    }

    /// Placeholder quiz returned when the model reply cannot be decoded.
    pub fn fallback(topic: &str, detail: impl fmt::Display) -> Self {
        let question = QuizQuestion {
            question_text: format!("What is the main concept of {}?", topic),
            options: vec![
                "A) See explanation for details".to_string(),
                "B) Review the material above".to_string(),
                "C) Check the summary".to_string(),
                "D) All of the above".to_string(),
            ],
            correct_answer_letter: OptionLetter::D,
            rationale: "Please review the explanation and summary above.".to_string(),
        };

        Self {
            questions: vec![question],
            generation_error: Some(GenerationError {
                kind: GenerationErrorKind::MalformedPayload,
                message: format!("{}: {}", MALFORMED_PAYLOAD_PREFIX, detail),
            }),
        }
    }

    pub fn from_invocation_failure(reason: impl fmt::Display) -> Self {
        Self {
            questions: Vec::new(),
            generation_error: Some(GenerationError {
                kind: GenerationErrorKind::InvocationFailed,
                message: format!("{}: {}", INVOCATION_FAILED_PREFIX, reason),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn error_kind(&self) -> Option<GenerationErrorKind> {
        self.generation_error.as_ref().map(|e| e.kind)
    }
}
