//! Test utilities for driving the signing workflow without a terminal or JDK.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, SignpackError};
use crate::prompt::Prompter;
use crate::signing::{GenerationRequest, KeyGenerator};

/// Bytes [`RecordingGenerator`] writes as the keystore (JKS magic + padding).
pub const FAKE_KEYSTORE: &[u8] = &[0xFE, 0xED, 0xFE, 0xED, 0x00, 0x00, 0x00, 0x02, 0x9A, 0xFF];

/// Answers prompts from a fixed script, in order.
///
/// Line and secret prompts consume from the same queue. Running out of
/// answers behaves like a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    secret_prompts: Vec<String>,
    notes: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Every prompt shown, secret or not, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Only the prompts shown through [`Prompter::read_secret`].
    pub fn secret_prompts(&self) -> &[String] {
        &self.secret_prompts
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Number of scripted answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(SignpackError::InputClosed)
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        self.secret_prompts.push(prompt.to_string());
        self.next_answer(prompt)
    }

    fn note(&mut self, text: &str) {
        self.notes.push(text.to_string());
    }
}

/// [`KeyGenerator`] that records requests instead of running keytool.
///
/// On success it writes [`FAKE_KEYSTORE`] to the requested path so later
/// stages have a real file to encode.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    requests: Mutex<Vec<GenerationRequest>>,
    failure: Option<(i32, String)>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that fails like keytool exiting with `status`.
    pub fn failing(status: i32, stderr: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some((status, stderr.to_string())),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyGenerator for RecordingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some((status, stderr)) = &self.failure {
            return Err(SignpackError::Keytool {
                status: Some(*status),
                stderr: stderr.clone(),
            });
        }

        let path = request.working_dir.join(&request.keystore);
        tokio::fs::write(&path, FAKE_KEYSTORE)
            .await
            .map_err(|e| SignpackError::io(format!("Failed to write {}", path.display()), e))?;

        Ok(format!("Storing {}", request.keystore.display()))
    }
}
