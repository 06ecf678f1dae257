use crate::dto::quiz_dto::Difficulty;
use crate::services::generation_options::ResolvedOptions;

/// Lesson bodies are cut to this many characters before prompting to
/// bound cost and latency. The cut is a plain prefix so the prompt for
/// a given lesson never varies between calls.
pub const MAX_LESSON_CHARS: usize = 15_000;

pub fn truncate_lesson(text: &str) -> &str {
    match text.char_indices().nth(MAX_LESSON_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn difficulty_rubric(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => {
            "Write questions that check recall and basic comprehension: \
             key terms, definitions, and plainly stated facts from the lesson."
        }
        Difficulty::Medium => {
            "Write questions that require applying and analyzing the material: \
             moderately complex scenarios where concepts and their relationships \
             must be understood, not just remembered."
        }
        Difficulty::Hard => {
            "Write demanding questions that require synthesis and evaluation: \
             combining ideas across the lesson, weighing alternatives, and \
             applying concepts to unfamiliar situations."
        }
    }
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

fn type_requirements(opts: &ResolvedOptions) -> String {
    match (opts.mcq_count, opts.tf_count) {
        (mcq, 0) => format!("- {} multiple-choice questions (mcq) with 4 options each", mcq),
        (0, tf) => format!("- {} true/false questions (tf)", tf),
        (mcq, tf) => format!(
            "- {} multiple-choice questions (mcq) with 4 options each\n- {} true/false questions (tf)",
            mcq, tf
        ),
    }
}

const SCHEMA_EXAMPLE: &str = r#"{
  "questions": [
    {
      "type": "mcq",
      "question_text": "What is the capital of France?",
      "options": [
        {"text": "Paris", "is_correct": true},
        {"text": "London", "is_correct": false},
        {"text": "Berlin", "is_correct": false},
        {"text": "Madrid", "is_correct": false}
      ]
    },
    {
      "type": "tf",
      "question_text": "The sky is blue.",
      "is_correct": true
    }
  ]
}"#;

/// Deterministically renders the generation prompt. Pure: identical
/// inputs always produce the identical string.
pub fn compile_prompt(lesson_text: &str, opts: &ResolvedOptions) -> String {
    format!(
        "You are an expert quiz generation assistant for a university.\n\
         Based on the following lesson text, generate exactly {count} quiz questions.\n\
         \n\
         QUESTION REQUIREMENTS:\n\
         {types}\n\
         \n\
         DIFFICULTY LEVEL: {difficulty}\n\
         {rubric}\n\
         \n\
         LESSON TEXT:\n\
         \"{lesson}\"\n\
         \n\
         IMPORTANT RULES:\n\
         1. Generate EXACTLY {count} questions total\n\
         2. Each multiple-choice question must have exactly 4 options\n\
         3. Only ONE option may be marked correct for a multiple-choice question\n\
         4. Questions must be answerable from the lesson content alone\n\
         5. Vary the topics to cover different aspects of the lesson\n\
         6. Make questions clear and unambiguous\n\
         \n\
         Respond with ONLY a valid JSON object, no additional text.\n\
         The JSON format must be:\n\
         {schema}",
        count = opts.question_count,
        types = type_requirements(opts),
        difficulty = difficulty_label(opts.difficulty),
        rubric = difficulty_rubric(opts.difficulty),
        lesson = truncate_lesson(lesson_text),
        schema = SCHEMA_EXAMPLE,
    )
}

/// Renders the study-reviewer prompt. Pure, like [`compile_prompt`];
/// the model is asked for markdown rather than the quiz JSON schema.
pub fn compile_reviewer_prompt(lesson_text: &str) -> String {
    format!(
        "You are a helpful study assistant.\n\
         Based on the following lesson text, generate a clear and concise \
         reviewer for a university student.\n\
         \n\
         LESSON TEXT:\n\
         \"{lesson}\"\n\
         \n\
         IMPORTANT: Respond with ONLY the reviewer text, formatted using **Markdown**.\n\
         Use headings (##), bold text (**bold**), and bullet points (*) for clarity.",
        lesson = truncate_lesson(lesson_text),
    )
}
