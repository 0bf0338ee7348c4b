//! File locations and keytool generation parameters.

use std::path::PathBuf;

use serde::Deserialize;

/// Default keystore file name, relative to the working directory.
pub const DEFAULT_KEYSTORE: &str = "my-release-key.jks";
/// Default directory receiving the properties and base64 files.
pub const DEFAULT_OUTPUT_DIR: &str = "sign";

pub const PROPERTIES_FILE: &str = "signing.properties";
pub const PROPERTIES_BASE64_FILE: &str = "properties_base64.txt";
pub const KEYSTORE_BASE64_FILE: &str = "key_base64.txt";

/// Where the keystore and the generated files live.
///
/// `keystore` and `output_dir` are kept relative to `root` so the path
/// recorded in `signing.properties` stays portable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningLayout {
    pub root: PathBuf,
    pub keystore: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for SigningLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SigningLayout {
    /// Default layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            keystore: PathBuf::from(DEFAULT_KEYSTORE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Absolute (root-joined) path of the keystore.
    pub fn keystore_file(&self) -> PathBuf {
        self.root.join(&self.keystore)
    }

    /// Keystore path as written into `keystore.path=`.
    pub fn keystore_reference(&self) -> String {
        self.keystore.display().to_string()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn properties_file(&self) -> PathBuf {
        self.output_dir().join(PROPERTIES_FILE)
    }

    pub fn properties_base64_file(&self) -> PathBuf {
        self.output_dir().join(PROPERTIES_BASE64_FILE)
    }

    pub fn keystore_base64_file(&self) -> PathBuf {
        self.output_dir().join(KEYSTORE_BASE64_FILE)
    }
}

/// Parameters passed to `keytool -genkey`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyGenSettings {
    /// Program to execute, looked up on `PATH` unless it contains a separator.
    pub keytool: String,
    pub key_algorithm: String,
    pub key_size: u32,
    pub validity_days: u32,
}

impl Default for KeyGenSettings {
    fn default() -> Self {
        Self {
            keytool: "keytool".to_string(),
            key_algorithm: "RSA".to_string(),
            key_size: 2048,
            validity_days: 10000,
        }
    }
}
