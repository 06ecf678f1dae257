use crate::error::{Error, Result};
use crate::models::question::{McqOption, ValidatedQuestion};
use serde_json::Value as JsonValue;

const MCQ_OPTION_COUNT: usize = 4;

/// Validates the model's raw text against the quiz schema.
///
/// The response is fully untrusted: nothing is read before it is
/// checked, and any single violation rejects the entire batch. On
/// success the returned questions satisfy every structural invariant
/// (exactly 4 options per MCQ, exactly one correct, boolean TF flag).
pub fn validate_generated_quiz(raw: &str, expected_count: usize) -> Result<Vec<ValidatedQuestion>> {
    let root: JsonValue = serde_json::from_str(raw)
        .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let questions = root
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or_else(|| Error::MalformedResponse("missing 'questions' array".to_string()))?;

    if questions.len() != expected_count {
        return Err(Error::QuestionCountMismatch {
            expected: expected_count,
            actual: questions.len(),
        });
    }

    let mut validated = Vec::with_capacity(questions.len());
    for (idx, question) in questions.iter().enumerate() {
        validated.push(validate_question(question, idx + 1)?);
    }

    Ok(validated)
}

fn validate_question(value: &JsonValue, number: usize) -> Result<ValidatedQuestion> {
    let question_type = value
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::MalformedResponse(format!("question {} is missing 'type'", number)))?;

    let question_text = value
        .get("question_text")
        .and_then(|v| v.as_str())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            Error::MalformedResponse(format!("question {} is missing 'question_text'", number))
        })?
        .to_string();

    match question_type {
        "mcq" => {
            let options = value
                .get("options")
                .and_then(|v| v.as_array())
                .ok_or_else(|| {
                    Error::MalformedResponse(format!("question {} is missing 'options'", number))
                })?;

            if options.len() != MCQ_OPTION_COUNT {
                return Err(Error::MalformedResponse(format!(
                    "question {} must have exactly {} options, got {}",
                    number,
                    MCQ_OPTION_COUNT,
                    options.len()
                )));
            }

            let mut parsed = Vec::with_capacity(MCQ_OPTION_COUNT);
            for option in options {
                let text = option.get("text").and_then(|v| v.as_str());
                let is_correct = option.get("is_correct").and_then(|v| v.as_bool());
                match (text, is_correct) {
                    (Some(text), Some(is_correct)) => parsed.push(McqOption {
                        text: text.to_string(),
                        is_correct,
                    }),
                    _ => {
                        return Err(Error::MalformedResponse(format!(
                            "question {} has an invalid option structure",
                            number
                        )))
                    }
                }
            }

            let correct = parsed.iter().filter(|o| o.is_correct).count();
            if correct != 1 {
                return Err(Error::MalformedResponse(format!(
                    "question {} must have exactly one correct option, got {}",
                    number, correct
                )));
            }

            Ok(ValidatedQuestion::Mcq {
                question_text,
                options: parsed,
            })
        }
        "tf" => {
            let answer = value
                .get("is_correct")
                .and_then(|v| v.as_bool())
                .ok_or_else(|| {
                    Error::MalformedResponse(format!(
                        "question {} must have a boolean 'is_correct' field",
                        number
                    ))
                })?;

            Ok(ValidatedQuestion::Tf {
                question_text,
                answer,
            })
        }
        other => Err(Error::InvalidQuestionType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mcq(correct_index: usize) -> JsonValue {
        json!({
            "type": "mcq",
            "question_text": "Pick one",
            "options": (0..4).map(|i| json!({
                "text": format!("option {}", i),
                "is_correct": i == correct_index
            })).collect::<Vec<_>>()
        })
    }

    fn tf(answer: bool) -> JsonValue {
        json!({ "type": "tf", "question_text": "A statement.", "is_correct": answer })
    }

    fn raw(questions: Vec<JsonValue>) -> String {
        json!({ "questions": questions }).to_string()
    }

    #[test]
    fn valid_batch_passes() {
        let batch = validate_generated_quiz(&raw(vec![mcq(2), tf(true), tf(false)]), 3).unwrap();
        assert_eq!(batch.len(), 3);
        match &batch[0] {
            ValidatedQuestion::Mcq { options, .. } => {
                assert_eq!(options.len(), 4);
                assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);
                assert!(options[2].is_correct);
            }
            other => panic!("expected mcq, got {:?}", other),
        }
        assert_eq!(
            batch[1],
            ValidatedQuestion::Tf {
                question_text: "A statement.".to_string(),
                answer: true
            }
        );
    }

    #[test]
    fn syntactically_broken_json_is_malformed() {
        let err = validate_generated_quiz("{not json", 1).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn missing_questions_array_is_malformed() {
        for raw in [r#"{}"#, r#"{"questions": "oops"}"#, r#"[1, 2]"#] {
            let err = validate_generated_quiz(raw, 1).unwrap_err();
            assert!(matches!(err, Error::MalformedResponse(_)), "raw: {}", raw);
        }
    }

    #[test]
    fn under_and_over_generation_are_both_rejected() {
        let err = validate_generated_quiz(&raw(vec![tf(true)]), 2).unwrap_err();
        assert!(matches!(
            err,
            Error::QuestionCountMismatch { expected: 2, actual: 1 }
        ));

        let err = validate_generated_quiz(&raw(vec![tf(true), tf(false), mcq(0)]), 2).unwrap_err();
        assert!(matches!(
            err,
            Error::QuestionCountMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn mcq_with_wrong_option_count_rejects_whole_batch() {
        let mut bad = mcq(0);
        bad["options"].as_array_mut().unwrap().pop();
        let err = validate_generated_quiz(&raw(vec![tf(true), bad]), 2).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn mcq_with_zero_or_two_correct_is_rejected() {
        let mut none_correct = mcq(0);
        none_correct["options"][0]["is_correct"] = json!(false);
        let err = validate_generated_quiz(&raw(vec![none_correct]), 1).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let mut two_correct = mcq(0);
        two_correct["options"][1]["is_correct"] = json!(true);
        let err = validate_generated_quiz(&raw(vec![two_correct]), 1).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn tf_without_boolean_flag_is_rejected() {
        let bad = json!({ "type": "tf", "question_text": "Hmm", "is_correct": "yes" });
        let err = validate_generated_quiz(&raw(vec![bad]), 1).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn unknown_type_is_its_own_category() {
        let bad = json!({ "type": "essay", "question_text": "Discuss." });
        let err = validate_generated_quiz(&raw(vec![bad]), 1).unwrap_err();
        match err {
            Error::InvalidQuestionType(t) => assert_eq!(t, "essay"),
            other => panic!("expected InvalidQuestionType, got {:?}", other),
        }
    }

    #[test]
    fn rejection_is_idempotent() {
        let input = raw(vec![tf(true)]);
        let first = validate_generated_quiz(&input, 5).unwrap_err();
        let second = validate_generated_quiz(&input, 5).unwrap_err();
        assert_eq!(
            std::mem::discriminant(&first),
            std::mem::discriminant(&second)
        );
    }
}
