//! Interactive input abstraction.
//!
//! Every stage receives a [`Prompter`] instead of reading stdin directly,
//! so the whole workflow can be driven by scripted answers in tests.

use crate::error::Result;

/// Source of user answers plus a sink for informational output.
pub trait Prompter {
    /// Shows `prompt` and reads one line, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Like [`Prompter::read_line`] but the answer is not echoed.
    fn read_secret(&mut self, prompt: &str) -> Result<String>;

    /// Prints an informational line.
    fn note(&mut self, text: &str);
}

/// Asks for a value, substituting `default` when the answer is blank.
///
/// The prompt is rendered as `"<label> [<default>]: "`.
pub fn ask_with_default(prompter: &mut dyn Prompter, label: &str, default: &str) -> Result<String> {
    let answer = prompter.read_line(&format!("{} [{}]: ", label, default))?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Yes/no question where only an explicit yes counts.
pub fn confirm(prompter: &mut dyn Prompter, question: &str) -> Result<bool> {
    let answer = prompter.read_line(&format!("{} (y/n): ", question))?;
    Ok(is_yes(&answer))
}

/// Yes/no question where anything except an explicit no counts as yes.
pub fn confirm_default_yes(prompter: &mut dyn Prompter, question: &str) -> Result<bool> {
    let answer = prompter.read_line(&format!("{} (y/n) [y]: ", question))?;
    Ok(!is_no(&answer))
}

// Only the single letter counts; "yes" or " y" are not a yes.
fn is_yes(answer: &str) -> bool {
    answer.to_lowercase() == "y"
}

fn is_no(answer: &str) -> bool {
    answer.to_lowercase() == "n"
}
