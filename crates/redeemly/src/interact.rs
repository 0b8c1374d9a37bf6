//! Terminal-backed `Operator`: dialoguer prompts on stdin, notices on stderr.

use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;

use redeemly_core::{CoreError, IntegerPrompt, NoticeKind, Operator};

const CANCEL_WORDS: [&str; 3] = ["c", "cancel", "q"];

#[derive(Debug, Clone, Copy)]
pub struct TerminalOperator {
    interactive: bool,
    yes: bool,
    quiet: bool,
    color: bool,
}

impl TerminalOperator {
    pub fn new(interactive: bool, yes: bool, quiet: bool, color: bool) -> Self {
        Self {
            interactive,
            yes,
            quiet,
            color,
        }
    }
}

fn interaction_err(e: impl std::fmt::Display) -> CoreError {
    CoreError::Interaction {
        message: e.to_string(),
    }
}

impl Operator for TerminalOperator {
    fn prompt_integer(&mut self, prompt: &IntegerPrompt) -> Result<Option<u32>, CoreError> {
        if !self.interactive {
            return Err(interaction_err(format!(
                "{}: input is not a terminal",
                prompt.title
            )));
        }

        eprintln!("{}", heading(&prompt.title, NoticeKind::Info, self.color));
        let range = format!("{}-{}", prompt.min, prompt.max);
        let answer: String = Input::new()
            .with_prompt(format!("{} ({range}, 'c' to cancel)", prompt.message))
            .default(prompt.default.to_string())
            .validate_with(|input: &String| -> Result<(), String> {
                let input = input.trim();
                if CANCEL_WORDS.contains(&input) {
                    return Ok(());
                }
                match input.parse::<u32>() {
                    Ok(value) if prompt.accepts(value) => Ok(()),
                    _ => Err(format!("enter a whole number in {range}")),
                }
            })
            .interact_text()
            .map_err(interaction_err)?;

        let answer = answer.trim();
        if CANCEL_WORDS.contains(&answer) {
            return Ok(None);
        }
        answer.parse().map(Some).map_err(interaction_err)
    }

    fn notify(&mut self, kind: NoticeKind, title: &str, message: &str) {
        if self.quiet && kind == NoticeKind::Info {
            return;
        }
        eprintln!("{} {message}", heading(title, kind, self.color));
    }

    fn confirm(&mut self, title: &str, message: &str) -> Result<bool, CoreError> {
        if self.yes {
            return Ok(true);
        }
        if !self.interactive {
            return Err(interaction_err(format!("{title}: input is not a terminal")));
        }
        Confirm::new()
            .with_prompt(format!("{title}: {message}"))
            .default(false)
            .interact()
            .map_err(interaction_err)
    }
}

fn heading(title: &str, kind: NoticeKind, color: bool) -> String {
    let marker = match kind {
        NoticeKind::Info => "●",
        NoticeKind::Warning => "▲",
        NoticeKind::Error => "✗",
    };
    let text = format!("{marker} {title}:");
    if !color {
        return text;
    }
    match kind {
        NoticeKind::Info => text.cyan().bold().to_string(),
        NoticeKind::Warning => text.yellow().bold().to_string(),
        NoticeKind::Error => text.red().bold().to_string(),
    }
}
