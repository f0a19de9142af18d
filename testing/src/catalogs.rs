//! Catalog fixtures.

use surveyor_core::model::{Catalog, Question, QuestionKind, Target};

pub fn text(id: &str) -> Question {
    Question::new(id, QuestionKind::TextInput).with_label(format!("Question {id}"))
}

pub fn number(id: &str) -> Question {
    Question::new(id, QuestionKind::NumberInput).with_label(format!("Question {id}"))
}

pub fn radio(id: &str, options: &[&str]) -> Question {
    Question::new(id, QuestionKind::Radio)
        .with_label(format!("Question {id}"))
        .with_options(options.iter().copied())
}

pub fn multi(id: &str, options: &[&str]) -> Question {
    Question::new(id, QuestionKind::MultipleChoice)
        .with_label(format!("Question {id}"))
        .with_options(options.iter().copied())
}

/// `Q1 → Q2 → submit`, neither skippable.
pub fn two_step() -> Catalog {
    Catalog::new(vec![
        text("Q1").refer_to(Target::question("Q2")),
        text("Q2").refer_to(Target::Submit),
    ])
}

/// A single question whose `referTo` is itself.
pub fn self_loop() -> Catalog {
    Catalog::new(vec![text("Q1").refer_to(Target::question("Q1"))])
}

/// `Q1` points at a question that does not exist.
pub fn dangling() -> Catalog {
    Catalog::new(vec![
        text("Q1").refer_to(Target::question("Q404")),
        text("Q2"),
    ])
}

/// A branching form covering every supported kind:
///
/// ```text
/// name ─▶ age ─▶ colour ─▶ pets ─▶ submit
///          └─skip─▶ pets      └─skip─▶ submit
/// ```
pub fn branching() -> Catalog {
    Catalog::new(vec![
        text("name")
            .with_pattern("[A-Za-z ]+")
            .refer_to(Target::question("age")),
        number("age")
            .with_pattern("[0-9]{1,3}")
            .refer_to(Target::question("colour"))
            .skip_to(Target::question("pets")),
        radio("colour", &["Red", "Green", "Blue"]).refer_to(Target::question("pets")),
        multi("pets", &["Cat", "Dog", "Fish"])
            .refer_to(Target::Submit)
            .skip_to(Target::Submit),
    ])
}

pub fn empty() -> Catalog {
    Catalog::default()
}
