use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub struct GradingService;

impl GradingService {
    /// Scores one submission against prefetched lookups.
    ///
    /// `quiz_questions` holds the ids of the questions belonging to the
    /// quiz; `correct_answers` maps each question to its single correct
    /// answer row. Pairs naming a question outside the quiz are skipped
    /// rather than failing the submission, but every submitted pair
    /// counts toward the total: a partial submission is graded as a
    /// partial quiz.
    ///
    /// Returns `(score, total_questions)` with `0 <= score <= total` by
    /// construction.
    pub fn score_submission(
        submitted: &HashMap<Uuid, Uuid>,
        quiz_questions: &HashSet<Uuid>,
        correct_answers: &HashMap<Uuid, Uuid>,
    ) -> (i32, i32) {
        let total = submitted.len() as i32;
        let mut score = 0;

        for (question_id, answer_id) in submitted {
            if !quiz_questions.contains(question_id) {
                continue;
            }
            // Correct iff the selected row is the correct answer of this
            // question; an answer id belonging to another question can
            // never match.
            if correct_answers.get(question_id) == Some(answer_id) {
                score += 1;
            }
        }

        (score, total)
    }
}
