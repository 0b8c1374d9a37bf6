// ── Operator collaborator ──
//
// The person at the counter, reached through whatever host drives the core
// (terminal prompts in the CLI, scripted doubles in tests). The core never
// renders anything itself; it asks and tells through this trait.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Severity of a notice shown to the operator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Parameters of a bounded integer prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerPrompt {
    pub title: String,
    pub message: String,
    pub default: u32,
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl IntegerPrompt {
    /// Whether `value` is inside the range and on a step boundary.
    pub fn accepts(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
            && (self.step <= 1 || (value - self.min) % self.step == 0)
    }
}

pub trait Operator {
    /// Ask for an integer. `Ok(None)` means the operator cancelled.
    fn prompt_integer(&mut self, prompt: &IntegerPrompt) -> Result<Option<u32>, CoreError>;

    /// Show an outcome. Fire-and-forget: never changes control flow.
    fn notify(&mut self, kind: NoticeKind, title: &str, message: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, title: &str, message: &str) -> Result<bool, CoreError>;
}
