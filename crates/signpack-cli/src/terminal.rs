//! Terminal-backed prompter and keytool progress display.

use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use async_trait::async_trait;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use signpack_core::signing::{GenerationRequest, KeyGenerator};
use signpack_core::{Prompter, Result, SignpackError};

/// Where a secret answer is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecretInput {
    /// Hidden input through the stdout terminal.
    Stdout,
    /// Hidden input through the stderr terminal, for `signpack | tee log`.
    Stderr,
    /// Plain stdin line.
    Line,
}

/// `Term::read_secure_line` returns an empty string when its own stream is
/// not a tty, so hidden input needs both stdin and that stream on a terminal.
fn secret_input(stdin_tty: bool, stdout_tty: bool, stderr_tty: bool) -> SecretInput {
    match (stdin_tty, stdout_tty, stderr_tty) {
        (false, _, _) => SecretInput::Line,
        (true, true, _) => SecretInput::Stdout,
        (true, false, true) => SecretInput::Stderr,
        (true, false, false) => SecretInput::Line,
    }
}

/// Reads answers from stdin; secrets are read without echo on a terminal.
pub struct TerminalPrompter {
    stdout: Term,
    stderr: Term,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    fn show(&self, prompt: &str) -> Result<()> {
        print!("{}", prompt);
        io::stdout().flush().map_err(SignpackError::Prompt)
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.show(prompt)?;

        let mut input = String::new();
        let bytes_read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(SignpackError::Prompt)?;

        // Handle EOF (Ctrl+D on Unix, Ctrl+Z on Windows)
        if bytes_read == 0 {
            println!();
            return Err(SignpackError::InputClosed);
        }

        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        let input = secret_input(
            io::stdin().is_terminal(),
            self.stdout.is_term(),
            self.stderr.is_term(),
        );
        tracing::debug!("Reading secret via {:?}", input);

        match input {
            SecretInput::Stdout => {
                self.show(prompt)?;
                self.stdout.read_secure_line().map_err(SignpackError::Prompt)
            }
            SecretInput::Stderr => {
                // stdout is captured, so the prompt goes where the user sees it
                self.stderr.write_str(prompt).map_err(SignpackError::Prompt)?;
                self.stderr.read_secure_line().map_err(SignpackError::Prompt)
            }
            SecretInput::Line => self.read_line(prompt),
        }
    }

    fn note(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Shows a spinner while the wrapped generator runs.
pub struct SpinningGenerator<G> {
    inner: G,
}

impl<G> SpinningGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: KeyGenerator> KeyGenerator for SpinningGenerator<G> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.yellow} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Running {}...", request.settings.keytool));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let result = self.inner.generate(request).await;
        spinner.finish_and_clear();

        result
    }
}
