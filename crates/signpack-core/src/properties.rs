//! `signing.properties` generation.
//!
//! The file is read by the Gradle build script, which picks up every
//! `keystore.*` key to configure the release signing config.

use std::fmt;
use std::path::Path;

use crate::error::{Result, SignpackError};
use crate::prompt::{Prompter, ask_with_default, confirm_default_yes};
use crate::signing::DEFAULT_ALIAS;

pub const KEY_PATH: &str = "keystore.path";
pub const KEY_PASSWORD: &str = "keystore.pwd";
pub const KEY_ALIAS: &str = "keystore.alias";
pub const KEY_ALIAS_PASSWORD: &str = "keystore.alias_pwd";

/// The four values Gradle needs to sign a release build.
///
/// Passwords are kept (and written) in plain text.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningProperties {
    pub keystore_path: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

impl fmt::Debug for SigningProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningProperties")
            .field("keystore_path", &self.keystore_path)
            .field("keystore_password", &"<redacted>")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"<redacted>")
            .finish()
    }
}

impl SigningProperties {
    /// Renders the four `key=value` lines, each newline-terminated.
    pub fn render(&self) -> String {
        format!(
            "{}={}\n\
             {}={}\n\
             {}={}\n\
             {}={}\n",
            KEY_PATH,
            self.keystore_path,
            KEY_PASSWORD,
            self.keystore_password,
            KEY_ALIAS,
            self.key_alias,
            KEY_ALIAS_PASSWORD,
            self.key_password,
        )
    }

    /// Parses a properties file, splitting each line on its first `=`.
    ///
    /// Blank lines and `#` comments are skipped and unknown keys ignored;
    /// all four `keystore.*` keys must be present.
    pub fn parse(content: &str) -> Result<Self> {
        let mut keystore_path = None;
        let mut keystore_password = None;
        let mut key_alias = None;
        let mut key_password = None;

        for line in content.lines() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(SignpackError::MalformedProperties(format!(
                    "line without '=': {}",
                    line
                )));
            };

            let slot = match key.trim() {
                KEY_PATH => &mut keystore_path,
                KEY_PASSWORD => &mut keystore_password,
                KEY_ALIAS => &mut key_alias,
                KEY_ALIAS_PASSWORD => &mut key_password,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }

        let require = |value: Option<String>, key: &str| {
            value.ok_or_else(|| SignpackError::MalformedProperties(format!("missing {}", key)))
        };

        Ok(Self {
            keystore_path: require(keystore_path, KEY_PATH)?,
            keystore_password: require(keystore_password, KEY_PASSWORD)?,
            key_alias: require(key_alias, KEY_ALIAS)?,
            key_password: require(key_password, KEY_ALIAS_PASSWORD)?,
        })
    }
}

/// Collects the properties, reusing credentials from provisioning when given.
///
/// The alias password defaults to the keystore password unless the user
/// answers no.
pub fn collect_signing_properties(
    prompter: &mut dyn Prompter,
    keystore_path: &str,
    keystore_password: Option<String>,
    key_alias: Option<String>,
) -> Result<SigningProperties> {
    prompter.note("");
    prompter.note("===== Creating signing configuration =====");

    let keystore_password = match keystore_password {
        Some(password) => password,
        None => prompter.read_secret("Keystore password: ")?,
    };

    let key_alias = match key_alias {
        Some(alias) => {
            prompter.note(&format!("Using key alias: {}", alias));
            alias
        }
        None => ask_with_default(prompter, "Key alias", DEFAULT_ALIAS)?,
    };

    let same = confirm_default_yes(
        prompter,
        "Is the key password the same as the keystore password?",
    )?;
    let key_password = if same {
        keystore_password.clone()
    } else {
        prompter.read_secret("Key password: ")?
    };

    Ok(SigningProperties {
        keystore_path: keystore_path.to_string(),
        keystore_password,
        key_alias,
        key_password,
    })
}

/// Writes `properties` to `path`, replacing any existing file.
///
/// Parent directories are created as needed. On Unix the file is restricted
/// to the owner since it contains passwords.
pub async fn write_signing_properties(path: &Path, properties: &SigningProperties) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SignpackError::io(format!("Failed to create {}", parent.display()), e))?;
    }

    tokio::fs::write(path, properties.render())
        .await
        .map_err(|e| SignpackError::io(format!("Failed to write {}", path.display()), e))?;

    set_secure_permissions(path).await?;

    tracing::debug!("Wrote signing properties to {}", path.display());

    Ok(())
}

/// Set file permissions to 0600 (owner read/write only)
#[cfg(unix)]
async fn set_secure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| {
            SignpackError::io(format!("Failed to set permissions on {}", path.display()), e)
        })
}

#[cfg(not(unix))]
async fn set_secure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedPrompter;

    fn sample() -> SigningProperties {
        SigningProperties {
            keystore_path: "my-release-key.jks".to_string(),
            keystore_password: "p1".to_string(),
            key_alias: "a1".to_string(),
            key_password: "p1".to_string(),
        }
    }

    #[test]
    fn test_render_exact_format() {
        assert_eq!(
            sample().render(),
            "keystore.path=my-release-key.jks\nkeystore.pwd=p1\nkeystore.alias=a1\nkeystore.alias_pwd=p1\n"
        );
    }

    #[test]
    fn test_parse_rendered_values() {
        let properties = SigningProperties {
            keystore_password: "pa=ss word".to_string(),
            key_password: "k#1".to_string(),
            ..sample()
        };
        assert_eq!(SigningProperties::parse(&properties.render()).unwrap(), properties);
    }

    #[test]
    fn test_parse_skips_comments_and_unknown_keys() {
        let content = "# signing\n\nkeystore.path=k.jks\nother=1\nkeystore.pwd=x\nkeystore.alias=a\nkeystore.alias_pwd=y\n";
        let properties = SigningProperties::parse(content).unwrap();
        assert_eq!(properties.keystore_path, "k.jks");
        assert_eq!(properties.key_password, "y");
    }

    #[test]
    fn test_parse_missing_key() {
        let err = SigningProperties::parse("keystore.path=k.jks\n").unwrap_err();
        assert!(err.to_string().contains("missing keystore.pwd"));
    }

    #[test]
    fn test_parse_line_without_separator() {
        let err = SigningProperties::parse("keystore.path\n").unwrap_err();
        assert!(matches!(err, SignpackError::MalformedProperties(_)));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let debug = format!("{:?}", sample());
        assert!(!debug.contains("p1"));
        assert!(debug.contains("a1"));
    }

    #[test]
    fn test_collect_reuses_credentials() {
        let mut prompter = ScriptedPrompter::new([""]);
        let properties = collect_signing_properties(
            &mut prompter,
            "my-release-key.jks",
            Some("p1".to_string()),
            Some("a1".to_string()),
        )
        .unwrap();

        assert_eq!(properties, sample());
        assert_eq!(
            prompter.prompts(),
            ["Is the key password the same as the keystore password? (y/n) [y]: "]
        );
        assert!(prompter.notes().iter().any(|n| n == "Using key alias: a1"));
    }

    #[test]
    fn test_collect_prompts_when_credentials_absent() {
        let mut prompter = ScriptedPrompter::new(["p9", "", "n", "k9"]);
        let properties =
            collect_signing_properties(&mut prompter, "my-release-key.jks", None, None).unwrap();

        assert_eq!(properties.keystore_password, "p9");
        assert_eq!(properties.key_alias, DEFAULT_ALIAS);
        assert_eq!(properties.key_password, "k9");
        assert_eq!(prompter.secret_prompts(), ["Keystore password: ", "Key password: "]);
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sign/signing.properties");

        write_signing_properties(&path, &sample()).await.unwrap();
        let updated = SigningProperties {
            key_alias: "a2".to_string(),
            ..sample()
        };
        write_signing_properties(&path, &updated).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(SigningProperties::parse(&content).unwrap(), updated);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signing.properties");
        write_signing_properties(&path, &sample()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
