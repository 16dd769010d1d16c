//! Renderer-independent prompts.
//!
//! A [`Prompter`] answers one [`Prompt`] at a time. `Ok(None)` means the user
//! gave no answer at all (Esc, Ctrl-C, closed input), which callers treat as
//! cancel. An empty selection or empty text is a real answer.

use std::{fmt, sync::Arc};

use crate::error::{Error, Result};

/// A line in a select or multi-select prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    /// Dimmed text shown after the label.
    pub hint: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Checks a text answer; `Err` carries the message shown to the user.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(&str) -> std::result::Result<(), String> + Send + Sync>);

impl Validator {
    pub fn new(f: impl Fn(&str) -> std::result::Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Rejects blank input with `message`.
    pub fn required(message: &'static str) -> Self {
        Self::new(move |input| {
            if input.trim().is_empty() {
                Err(message.to_string())
            } else {
                Ok(())
            }
        })
    }

    pub fn check(&self, input: &str) -> std::result::Result<(), String> {
        (self.0)(input)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

#[derive(Debug, Clone)]
pub enum Prompt {
    Select {
        message: String,
        choices: Vec<Choice>,
        default: usize,
    },
    MultiSelect {
        message: String,
        choices: Vec<Choice>,
        /// Indices checked initially.
        defaults: Vec<usize>,
    },
    Confirm {
        message: String,
        default: bool,
    },
    Text {
        message: String,
        initial: Option<String>,
        validate: Option<Validator>,
    },
}

impl Prompt {
    pub fn message(&self) -> &str {
        match self {
            Self::Select { message, .. }
            | Self::MultiSelect { message, .. }
            | Self::Confirm { message, .. }
            | Self::Text { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Index(usize),
    Indices(Vec<usize>),
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLevel {
    Info,
    Success,
    Warn,
    Error,
    Muted,
}

pub trait Prompter {
    fn ask(&mut self, prompt: &Prompt) -> Result<Option<Answer>>;

    /// Show a line of feedback between prompts.
    fn note(&mut self, level: NoteLevel, text: &str);

    fn select(
        &mut self,
        message: &str,
        choices: Vec<Choice>,
        default: usize,
    ) -> Result<Option<usize>> {
        let prompt = Prompt::Select {
            message: message.to_string(),
            choices,
            default,
        };
        match self.ask(&prompt)? {
            None => Ok(None),
            Some(Answer::Index(index)) => Ok(Some(index)),
            Some(_) => Err(unexpected(&prompt)),
        }
    }

    fn multi_select(
        &mut self,
        message: &str,
        choices: Vec<Choice>,
        defaults: Vec<usize>,
    ) -> Result<Option<Vec<usize>>> {
        let prompt = Prompt::MultiSelect {
            message: message.to_string(),
            choices,
            defaults,
        };
        match self.ask(&prompt)? {
            None => Ok(None),
            Some(Answer::Indices(indices)) => Ok(Some(indices)),
            Some(_) => Err(unexpected(&prompt)),
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>> {
        let prompt = Prompt::Confirm {
            message: message.to_string(),
            default,
        };
        match self.ask(&prompt)? {
            None => Ok(None),
            Some(Answer::Bool(value)) => Ok(Some(value)),
            Some(_) => Err(unexpected(&prompt)),
        }
    }

    fn text(
        &mut self,
        message: &str,
        initial: Option<String>,
        validate: Option<Validator>,
    ) -> Result<Option<String>> {
        let prompt = Prompt::Text {
            message: message.to_string(),
            initial,
            validate,
        };
        match self.ask(&prompt)? {
            None => Ok(None),
            Some(Answer::Text(text)) => Ok(Some(text)),
            Some(_) => Err(unexpected(&prompt)),
        }
    }
}

fn unexpected(prompt: &Prompt) -> Error {
    Error::UnexpectedAnswer {
        prompt: prompt.message().to_string(),
    }
}

/// Replays canned answers and records everything asked and noted.
#[cfg(any(test, feature = "testing"))]
pub mod scripted {
    use std::collections::VecDeque;

    use super::*;

    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<Option<Answer>>,
        pub asked: Vec<Prompt>,
        pub notes: Vec<(NoteLevel, String)>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: impl IntoIterator<Item = Option<Answer>>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Self::default()
            }
        }

        /// Labels offered by the most recent select prompt.
        pub fn last_labels(&self) -> Vec<String> {
            self.asked
                .iter()
                .rev()
                .find_map(|p| match p {
                    Prompt::Select { choices, .. } | Prompt::MultiSelect { choices, .. } => {
                        Some(choices.iter().map(|c| c.label.clone()).collect())
                    },
                    _ => None,
                })
                .unwrap_or_default()
        }

        pub fn noted(&self, needle: &str) -> bool {
            self.notes.iter().any(|(_, text)| text.contains(needle))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, prompt: &Prompt) -> Result<Option<Answer>> {
            self.asked.push(prompt.clone());
            let answer = self.answers.pop_front().flatten();
            if let (Some(Answer::Text(text)), Prompt::Text {
                validate: Some(validator),
                ..
            }) = (&answer, prompt)
                && let Err(message) = validator.check(text)
            {
                self.notes.push((NoteLevel::Error, message));
                return Ok(None);
            }
            Ok(answer)
        }

        fn note(&mut self, level: NoteLevel, text: &str) {
            self.notes.push((level, text.to_string()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, scripted::ScriptedPrompter};

    #[test]
    fn helpers_unwrap_matching_answers() {
        let mut p = ScriptedPrompter::new([
            Some(Answer::Index(2)),
            Some(Answer::Indices(vec![0, 1])),
            Some(Answer::Bool(false)),
            Some(Answer::Text(String::new())),
            None,
        ]);
        assert_eq!(p.select("pick", vec![Choice::new("a")], 0).unwrap(), Some(2));
        assert_eq!(
            p.multi_select("many", vec![], vec![]).unwrap(),
            Some(vec![0, 1])
        );
        assert_eq!(p.confirm("sure?", true).unwrap(), Some(false));
        assert_eq!(p.text("name", None, None).unwrap(), Some(String::new()));
        assert_eq!(p.confirm("again?", true).unwrap(), None);
    }

    #[test]
    fn mismatched_answer_is_an_error() {
        let mut p = ScriptedPrompter::new([Some(Answer::Bool(true))]);
        let err = p.select("pick", vec![], 0).unwrap_err();
        assert!(matches!(err, Error::UnexpectedAnswer { prompt } if prompt == "pick"));
    }

    #[test]
    fn required_validator_rejects_blank() {
        let v = Validator::required("URL is required");
        assert_eq!(v.check("  "), Err("URL is required".to_string()));
        assert!(v.check("https://x").is_ok());
        assert_eq!(format!("{v:?}"), "Validator(..)");
    }

    #[test]
    fn choice_builder() {
        let c = Choice::new("pdf").with_hint("PDF tools");
        assert_eq!(c.hint.as_deref(), Some("PDF tools"));
    }
}
