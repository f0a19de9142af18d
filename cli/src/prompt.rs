//! Terminal rendering of a question and parsing of one typed line.

use std::fmt::Write as _;
use surveyor_core::answer::AnswerInput;
use surveyor_core::model::{Question, QuestionKind};

pub const NO_LABEL: &str = "No Label Found";
pub const UNSUPPORTED_TYPE: &str = "Unsupported type";

pub const SKIP_COMMAND: &str = ":skip";
pub const QUIT_COMMAND: &str = ":quit";

/// What one line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Answer(AnswerInput),
    Skip,
    Quit,
    /// Input that cannot be turned into an answer, with the reason.
    Rejected(String),
}

/// The question block printed before reading a line.
pub fn render(question: &Question, position: usize, total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "[{}/{}] {}",
        position + 1,
        total,
        question.label().unwrap_or(NO_LABEL)
    );

    match &question.kind {
        QuestionKind::TextInput => {
            let _ = writeln!(out, "  (text)");
        }
        QuestionKind::NumberInput => {
            let _ = writeln!(out, "  (number)");
        }
        QuestionKind::Radio => {
            for (i, choice) in question.options.iter().enumerate() {
                let _ = writeln!(out, "  {}) {}", i + 1, choice.value);
            }
            let _ = writeln!(out, "  (pick one number)");
        }
        QuestionKind::MultipleChoice => {
            for (i, choice) in question.options.iter().enumerate() {
                let _ = writeln!(out, "  [{}] {}", i + 1, choice.value);
            }
            let _ = writeln!(out, "  (pick one or more numbers, comma separated)");
        }
        QuestionKind::Other(_) => {
            let _ = writeln!(out, "  {UNSUPPORTED_TYPE}");
        }
    }

    let action = if question.is_last() { "Submit" } else { "Next" };
    let _ = write!(out, "Enter to {action}");
    if question.can_skip() {
        let _ = write!(out, ", {SKIP_COMMAND} to skip");
    }
    let _ = write!(out, ", {QUIT_COMMAND} to exit");
    out
}

/// Turn one typed line into a command for `question`.
pub fn parse(question: &Question, line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        SKIP_COMMAND => return Command::Skip,
        QUIT_COMMAND => return Command::Quit,
        _ => {}
    }

    let mut input = AnswerInput::for_question(question);
    match &question.kind {
        QuestionKind::Radio => match pick(question, trimmed) {
            Ok(value) => input.select(value),
            Err(reason) => return Command::Rejected(reason),
        },
        QuestionKind::MultipleChoice => {
            for part in trimmed.split(',').filter(|p| !p.trim().is_empty()) {
                match pick(question, part.trim()) {
                    Ok(value) if !input.is_selected(&value) => input.toggle(&value),
                    Ok(_) => {}
                    Err(reason) => return Command::Rejected(reason),
                }
            }
        }
        QuestionKind::Other(_) => return Command::Rejected(UNSUPPORTED_TYPE.to_string()),
        QuestionKind::TextInput | QuestionKind::NumberInput => {
            // Free text is taken as typed, without the line ending.
            input.set_text(line.trim_end_matches(['\r', '\n']));
        }
    }
    Command::Answer(input)
}

/// Map a 1-based option number to its value.
fn pick(question: &Question, raw: &str) -> Result<String, String> {
    let count = question.options.len();
    if count == 0 {
        return Err("This question has no options.".to_string());
    }
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options.get(i))
        .map(|choice| choice.value.clone())
        .ok_or_else(|| format!("Choose a number between 1 and {count}."))
}
