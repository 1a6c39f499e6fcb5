use crate::models::domain::{
    grade::{AnswerSubmission, GradeResult, PerformanceBand, QuestionGrade},
    quiz::Quiz,
};

/// Scores a submission against a quiz.
///
/// Submitted letters are trimmed and ASCII upper-cased once, then compared
/// exactly with the answer key, so `" b "` matches `B` but `"B)"` and the
/// full option text do not. Unanswered questions count as incorrect.
pub fn grade(quiz: &Quiz, submission: &AnswerSubmission) -> GradeResult {
    let per_question: Vec<QuestionGrade> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let submitted_letter = submission.get(index).map(normalize_letter);
            let correct_letter = question.correct_answer_letter();
            let correct = submitted_letter
                .as_deref()
                .is_some_and(|letter| letter == correct_letter.to_string());

            QuestionGrade {
                index,
                correct,
                submitted_letter,
                correct_letter,
                rationale: question.rationale().to_string(),
            }
        })
        .collect();

    let total_count = per_question.len();
    let correct_count = per_question.iter().filter(|g| g.correct).count();
    let score_percent = if total_count == 0 {
        0.0
    } else {
        100.0 * correct_count as f64 / total_count as f64
    };

    GradeResult {
        per_question,
        correct_count,
        total_count,
        score_percent,
        band: PerformanceBand::from_score(score_percent),
    }
}

fn normalize_letter(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
