//! Optional configuration file loading and resolution.
//!
//! Settings come from `signpack.huml` in the working directory (or the file
//! named by `--config` / `SIGNPACK_CONFIG`), with priority order:
//! CLI flags and environment variables > config file > defaults.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use signpack_core::{KeyGenSettings, SigningLayout};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is named.
pub const CONFIG_FILE_NAME: &str = "signpack.huml";

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Keystore path, relative to the working directory.
    pub keystore: Option<PathBuf>,
    /// Directory for `signing.properties` and the base64 files.
    pub output_dir: Option<PathBuf>,
    pub keytool: Option<String>,
    pub key_algorithm: Option<String>,
    pub key_size: Option<u32>,
    pub validity_days: Option<u32>,
}

/// Resolved configuration after applying priority rules.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub layout: SigningLayout,
    pub settings: KeyGenSettings,
}

/// Load configuration from a config file.
///
/// An explicitly named file must exist. Without one, `signpack.huml` in
/// `dir` is used if present, and `Ok(None)` is returned otherwise.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Option<FileConfig>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = dir.join(CONFIG_FILE_NAME);
            if !default.exists() {
                return Ok(None);
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid config in {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());

    Ok(Some(config))
}

/// Parse and validate HUML config content.
pub fn parse_config(content: &str) -> Result<FileConfig> {
    let config: FileConfig = huml_rs::serde::from_str(content).context("Invalid HUML")?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject values keytool or the filesystem layout cannot work with.
fn validate_config(config: &FileConfig) -> Result<()> {
    let non_empty = [
        ("keytool", config.keytool.as_deref()),
        ("key_algorithm", config.key_algorithm.as_deref()),
    ];
    for (key, value) in non_empty {
        if value.is_some_and(|v| v.trim().is_empty()) {
            bail!("'{}' must not be empty", key);
        }
    }

    if config.keystore.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
        bail!("'keystore' must not be empty");
    }

    if config.key_size == Some(0) {
        bail!("'key_size' must be greater than zero");
    }
    if config.validity_days == Some(0) {
        bail!("'validity_days' must be greater than zero");
    }

    Ok(())
}

/// Resolve configuration by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags / environment (`--keytool`, `SIGNPACK_KEYTOOL`)
/// 2. Config file
/// 3. Hardcoded defaults (`my-release-key.jks`, `sign/`, `keytool`, RSA 2048, 10000 days)
pub fn resolve_config(
    dir: &Path,
    keytool_flag: Option<&str>,
    file_config: Option<FileConfig>,
) -> Result<ResolvedConfig> {
    let mut layout = SigningLayout::new(dir);
    let mut settings = KeyGenSettings::default();

    // Apply config file (lowest priority)
    if let Some(config) = file_config {
        if let Some(keystore) = config.keystore {
            layout.keystore = keystore;
        }
        if let Some(output_dir) = config.output_dir {
            layout.output_dir = output_dir;
        }
        if let Some(keytool) = config.keytool {
            settings.keytool = keytool;
        }
        if let Some(key_algorithm) = config.key_algorithm {
            settings.key_algorithm = key_algorithm;
        }
        if let Some(key_size) = config.key_size {
            settings.key_size = key_size;
        }
        if let Some(validity_days) = config.validity_days {
            settings.validity_days = validity_days;
        }
    }

    // Apply CLI flags (highest priority)
    if let Some(keytool) = keytool_flag {
        if keytool.trim().is_empty() {
            bail!("--keytool must not be empty");
        }
        settings.keytool = keytool.to_string();
    }

    Ok(ResolvedConfig { layout, settings })
}
