//! Base64 packaging of the keystore and properties for CI secrets.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use crate::error::{Result, SignpackError};
use crate::layout::{KEYSTORE_BASE64_FILE, PROPERTIES_BASE64_FILE};

/// Secret name the encoded properties file is meant for.
pub const PROPERTIES_SECRET: &str = "SIGNING_PROPERTIES";
/// Secret name the encoded keystore is meant for.
pub const KEYSTORE_SECRET: &str = "SIGN_KEY";

/// One encoded file and the CI secret it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    pub secret_name: &'static str,
    pub source: PathBuf,
    pub path: PathBuf,
}

/// The two files produced by [`write_secret_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretArtifacts {
    pub properties: EncodedArtifact,
    pub keystore: EncodedArtifact,
}

impl SecretArtifacts {
    pub fn iter(&self) -> impl Iterator<Item = &EncodedArtifact> {
        [&self.properties, &self.keystore].into_iter()
    }
}

/// Standard base64 with padding and no line wrapping.
pub fn encode_bytes(data: &[u8]) -> String {
    BASE64.encode(data)
}

async fn read_source(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| SignpackError::io(format!("Failed to read {}", path.display()), e))
}

async fn write_encoded(dest: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SignpackError::io(format!("Failed to create {}", parent.display()), e))?;
    }

    tokio::fs::write(dest, encode_bytes(data))
        .await
        .map_err(|e| SignpackError::io(format!("Failed to write {}", dest.display()), e))?;

    tracing::debug!("Wrote {} ({} source bytes)", dest.display(), data.len());

    Ok(())
}

/// Reads `source` completely and writes its base64 encoding to `dest`.
pub async fn encode_file(source: &Path, dest: &Path) -> Result<()> {
    let data = read_source(source).await?;
    write_encoded(dest, &data).await
}

/// Encodes the properties file and the keystore into `out_dir`.
///
/// Both sources are read before anything is written; a write failure part
/// way through leaves earlier outputs on disk.
pub async fn write_secret_artifacts(
    keystore: &Path,
    properties: &Path,
    out_dir: &Path,
) -> Result<SecretArtifacts> {
    let properties_data = read_source(properties).await?;
    let keystore_data = read_source(keystore).await?;

    let artifacts = SecretArtifacts {
        properties: EncodedArtifact {
            secret_name: PROPERTIES_SECRET,
            source: properties.to_path_buf(),
            path: out_dir.join(PROPERTIES_BASE64_FILE),
        },
        keystore: EncodedArtifact {
            secret_name: KEYSTORE_SECRET,
            source: keystore.to_path_buf(),
            path: out_dir.join(KEYSTORE_BASE64_FILE),
        },
    };

    write_encoded(&artifacts.properties.path, &properties_data).await?;
    write_encoded(&artifacts.keystore.path, &keystore_data).await?;

    Ok(artifacts)
}
