//! Keystore credentials and format detection.

use std::fmt;
use std::path::PathBuf;

/// Container format of a keystore file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystoreKind {
    Jks,
    Pkcs12,
}

impl KeystoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreKind::Jks => "jks",
            KeystoreKind::Pkcs12 => "pkcs12",
        }
    }
}

impl fmt::Display for KeystoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detects the keystore kind from its magic bytes.
///
/// JKS files start with `0xFEEDFEED`; everything else is treated as PKCS12
/// (an ASN.1 SEQUENCE, which recent keytool versions emit even for `.jks`).
pub fn detect_keystore_kind(data: &[u8]) -> KeystoreKind {
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        KeystoreKind::Jks
    } else {
        KeystoreKind::Pkcs12
    }
}

/// Keystore location plus the credentials needed to use it.
#[derive(Clone, PartialEq, Eq)]
pub struct KeystoreCredentials {
    /// Keystore path relative to the layout root.
    pub path: PathBuf,
    pub password: String,
    pub alias: String,
    /// Whether keytool created the keystore during this run.
    pub generated: bool,
}

impl fmt::Debug for KeystoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreCredentials")
            .field("path", &self.path)
            .field("password", &"<redacted>")
            .field("alias", &self.alias)
            .field("generated", &self.generated)
            .finish()
    }
}
