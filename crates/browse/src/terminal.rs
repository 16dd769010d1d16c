//! dialoguer-backed [`Prompter`] for interactive terminals.

use {
    colored::Colorize,
    dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme},
};

use crate::{
    error::{Error, Result},
    prompt::{Answer, Choice, NoteLevel, Prompt, Prompter},
};

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

fn render(choice: &Choice) -> String {
    match &choice.hint {
        Some(hint) => format!("{} {}", choice.label, format!("- {hint}").dimmed()),
        None => choice.label.clone(),
    }
}

/// An interrupted read is "no answer", not a failure.
fn interrupted_as_none<T>(result: dialoguer::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(Error::Prompt(e)),
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &Prompt) -> Result<Option<Answer>> {
        let answer = match prompt {
            Prompt::Select {
                message,
                choices,
                default,
            } => {
                let items: Vec<String> = choices.iter().map(render).collect();
                interrupted_as_none(
                    Select::with_theme(&self.theme)
                        .with_prompt(message.as_str())
                        .items(&items)
                        .default((*default).min(items.len().saturating_sub(1)))
                        .max_length(20)
                        .interact_opt(),
                )?
                .flatten()
                .map(Answer::Index)
            },
            Prompt::MultiSelect {
                message,
                choices,
                defaults,
            } => {
                let items: Vec<String> = choices.iter().map(render).collect();
                let checked: Vec<bool> = (0..items.len()).map(|i| defaults.contains(&i)).collect();
                interrupted_as_none(
                    MultiSelect::with_theme(&self.theme)
                        .with_prompt(message.as_str())
                        .items(&items)
                        .defaults(&checked)
                        .interact_opt(),
                )?
                .flatten()
                .map(Answer::Indices)
            },
            Prompt::Confirm { message, default } => interrupted_as_none(
                Confirm::with_theme(&self.theme)
                    .with_prompt(message.as_str())
                    .default(*default)
                    .interact_opt(),
            )?
            .flatten()
            .map(Answer::Bool),
            Prompt::Text {
                message,
                initial,
                validate,
            } => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(message.as_str())
                    .allow_empty(validate.is_none());
                if let Some(initial) = initial {
                    input = input.with_initial_text(initial.as_str());
                }
                if let Some(validator) = validate.clone() {
                    input = input.validate_with(move |text: &String| validator.check(text));
                }
                interrupted_as_none(input.interact_text())?.map(Answer::Text)
            },
        };
        Ok(answer)
    }

    fn note(&mut self, level: NoteLevel, text: &str) {
        let line = match level {
            NoteLevel::Info => text.blue(),
            NoteLevel::Success => text.green(),
            NoteLevel::Warn => text.yellow(),
            NoteLevel::Error => text.red(),
            NoteLevel::Muted => text.dimmed(),
        };
        println!("{line}");
    }
}
