//! Prompt templates sent to the generation model

use std::ops::RangeInclusive;

/// Question counts accepted for multiple-choice generation
pub const QUESTION_RANGE: RangeInclusive<u8> = 1..=5;

/// Build the multiple-choice question prompt for `text`.
///
/// The model is asked for `num_questions` questions with four options each,
/// laid out in a fixed `Question N:` / `A)`..`D)` format and without a trailing
/// answer list.
pub fn multiple_choice_prompt(num_questions: u8, text: &str) -> String {
    format!(
        "Generate {num_questions} multiple-choice questions based on the following text.\n\
         Each question should have four answer options labeled A, B, C, and D.\n\
         Do NOT repeat the answer options in a separate list.\n\
         Format like this:\n\
         Question 1: <question text>\n\
         A) option 1\n\
         B) option 2\n\
         C) option 3\n\
         D) option 4\n\
         \n\
         Text:\n{text}"
    )
}
