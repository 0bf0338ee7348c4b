//! Keystore generation through the JDK `keytool` CLI.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, SignpackError};
use crate::layout::KeyGenSettings;
use crate::signing::DistinguishedName;

/// Everything needed to create one keystore.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Directory the generator runs in; `keystore` is relative to it.
    pub working_dir: PathBuf,
    pub keystore: PathBuf,
    pub alias: String,
    /// Used for both the store and the key entry.
    pub password: String,
    pub dname: DistinguishedName,
    pub settings: KeyGenSettings,
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("working_dir", &self.working_dir)
            .field("keystore", &self.keystore)
            .field("alias", &self.alias)
            .field("password", &"<redacted>")
            .field("dname", &self.dname.to_string())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Creates a keystore on disk.
#[async_trait]
pub trait KeyGenerator: Send + Sync {
    /// Generates the keystore described by `request`, returning captured stdout.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// [`KeyGenerator`] backed by the `keytool` executable.
#[derive(Debug, Clone, Default)]
pub struct Keytool;

/// Builds the `keytool -genkey` argument vector.
///
/// Arguments are passed directly to the process, never through a shell, so
/// passwords and subject fields need no quoting.
pub fn genkey_args(request: &GenerationRequest) -> Vec<String> {
    let settings = &request.settings;
    vec![
        "-genkey".to_string(),
        "-v".to_string(),
        "-keystore".to_string(),
        request.keystore.display().to_string(),
        "-keyalg".to_string(),
        settings.key_algorithm.clone(),
        "-keysize".to_string(),
        settings.key_size.to_string(),
        "-validity".to_string(),
        settings.validity_days.to_string(),
        "-alias".to_string(),
        request.alias.clone(),
        "-storepass".to_string(),
        request.password.clone(),
        "-keypass".to_string(),
        request.password.clone(),
        "-dname".to_string(),
        request.dname.to_string(),
    ]
}

#[async_trait]
impl KeyGenerator for Keytool {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let program = &request.settings.keytool;

        tracing::debug!(
            "Running {} -genkey for {} (alias {})",
            program,
            request.keystore.display(),
            request.alias
        );

        let output = Command::new(program)
            .args(genkey_args(request))
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| SignpackError::KeytoolSpawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            tracing::debug!("keytool failed: {}", stderr.trim());
            return Err(SignpackError::Keytool {
                status: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!("keytool output: {}", stdout.trim());

        Ok(stdout)
    }
}
