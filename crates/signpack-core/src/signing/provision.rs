//! Ensures a signing keystore exists.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::error::Result;
use crate::layout::{KeyGenSettings, SigningLayout};
use crate::prompt::{Prompter, ask_with_default, confirm};
use crate::signing::{
    DistinguishedName, GenerationRequest, KeyGenerator, KeystoreCredentials, detect_keystore_kind,
};

/// Alias offered when the user leaves the alias prompt blank.
pub const DEFAULT_ALIAS: &str = "my-alias";

/// Reads the leading bytes kind detection looks at.
async fn read_magic(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut magic = Vec::with_capacity(4);
    file.take(4).read_to_end(&mut magic).await?;
    Ok(magic)
}

/// Reuses the keystore at `layout.keystore_file()` or generates a new one.
///
/// An existing keystore is only replaced after an explicit yes. When it is
/// kept, the password and alias the user types are returned as-is without
/// being checked against the keystore.
pub async fn provision_keystore(
    prompter: &mut dyn Prompter,
    generator: &dyn KeyGenerator,
    layout: &SigningLayout,
    settings: &KeyGenSettings,
) -> Result<KeystoreCredentials> {
    prompter.note("===== Creating signing key =====");

    let keystore_file = layout.keystore_file();
    let reference = layout.keystore_reference();

    if keystore_file.exists() {
        let overwrite = confirm(prompter, &format!("{} already exists, overwrite?", reference))?;
        if !overwrite {
            match read_magic(&keystore_file).await {
                Ok(magic) => {
                    let kind = detect_keystore_kind(&magic);
                    prompter.note(&format!("Using existing {} ({})", reference, kind));
                }
                Err(e) => {
                    tracing::warn!("Could not read {}: {}", keystore_file.display(), e);
                    prompter.note(&format!("Using existing {}", reference));
                }
            }

            let password = prompter.read_secret("Existing keystore password: ")?;
            let alias = ask_with_default(prompter, "Existing key alias", DEFAULT_ALIAS)?;

            tracing::info!("Reusing keystore {}", keystore_file.display());

            return Ok(KeystoreCredentials {
                path: layout.keystore.clone(),
                password,
                alias,
                generated: false,
            });
        }
    }

    let password = prompter.read_secret("Keystore password: ")?;
    let alias = ask_with_default(prompter, "Key alias", DEFAULT_ALIAS)?;

    prompter.note("");
    prompter.note("Certificate details:");
    let dname = DistinguishedName::prompt(prompter)?;

    let request = GenerationRequest {
        working_dir: layout.root.clone(),
        keystore: layout.keystore.clone(),
        alias,
        password,
        dname,
        settings: settings.clone(),
    };

    prompter.note("");
    prompter.note("Generating key, please wait...");
    generator.generate(&request).await?;
    prompter.note("Key generated successfully!");

    tracing::info!("Generated keystore {}", keystore_file.display());

    Ok(KeystoreCredentials {
        path: request.keystore,
        password: request.password,
        alias: request.alias,
        generated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignpackError;
    use crate::test_utils::{RecordingGenerator, ScriptedPrompter};

    const JKS_BYTES: [u8; 5] = [0xFE, 0xED, 0xFE, 0xED, 0x00];

    #[tokio::test]
    async fn test_absent_keystore_is_generated_once() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SigningLayout::new(dir.path());
        let generator = RecordingGenerator::new();
        let mut prompter = ScriptedPrompter::new(["p1", "a1", "", "", "", "", "", ""]);

        let credentials =
            provision_keystore(&mut prompter, &generator, &layout, &KeyGenSettings::default())
                .await
                .unwrap();

        assert!(credentials.generated);
        assert_eq!(credentials.password, "p1");
        assert_eq!(credentials.alias, "a1");

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].dname.to_string(),
            "CN=Android, OU=Development, O=Your Organization, L=Your City, ST=Your State, C=CN"
        );
        assert_eq!(requests[0].working_dir, dir.path());
        assert!(layout.keystore_file().exists());
    }

    #[tokio::test]
    async fn test_password_prompts_are_secret() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SigningLayout::new(dir.path());
        let generator = RecordingGenerator::new();
        let mut prompter = ScriptedPrompter::new(["p1", "", "", "", "", "", "", ""]);

        provision_keystore(&mut prompter, &generator, &layout, &KeyGenSettings::default())
            .await
            .unwrap();

        assert_eq!(prompter.secret_prompts(), ["Keystore password: "]);
    }

    #[tokio::test]
    async fn test_existing_keystore_kept_without_generation() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SigningLayout::new(dir.path());
        std::fs::write(layout.keystore_file(), JKS_BYTES).unwrap();

        let generator = RecordingGenerator::new();
        let mut prompter = ScriptedPrompter::new(["n", "old-pass", ""]);

        let credentials =
            provision_keystore(&mut prompter, &generator, &layout, &KeyGenSettings::default())
                .await
                .unwrap();

        assert!(!credentials.generated);
        assert_eq!(credentials.path, layout.keystore);
        assert_eq!(credentials.password, "old-pass");
        assert_eq!(credentials.alias, DEFAULT_ALIAS);
        assert!(generator.requests().is_empty());
        assert!(prompter.notes().iter().any(|n| n.contains("(jks)")));
        assert_eq!(std::fs::read(layout.keystore_file()).unwrap(), JKS_BYTES);
    }

    #[tokio::test]
    async fn test_unreadable_keystore_still_prompts_for_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SigningLayout::new(dir.path());
        // A directory passes the existence check but cannot be read
        std::fs::create_dir(layout.keystore_file()).unwrap();

        let generator = RecordingGenerator::new();
        let mut prompter = ScriptedPrompter::new(["n", "old-pass", "upload"]);

        let credentials =
            provision_keystore(&mut prompter, &generator, &layout, &KeyGenSettings::default())
                .await
                .unwrap();

        assert_eq!(credentials.password, "old-pass");
        assert_eq!(credentials.alias, "upload");
        assert!(generator.requests().is_empty());
        assert!(prompter.notes().iter().any(|n| n == "Using existing my-release-key.jks"));
    }

    #[tokio::test]
    async fn test_existing_keystore_overwritten_on_yes() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SigningLayout::new(dir.path());
        std::fs::write(layout.keystore_file(), b"old").unwrap();

        let generator = RecordingGenerator::new();
        let mut prompter = ScriptedPrompter::new(["y", "p2", "a2", "Me", "", "", "", "", "US"]);

        let credentials =
            provision_keystore(&mut prompter, &generator, &layout, &KeyGenSettings::default())
                .await
                .unwrap();

        assert!(credentials.generated);
        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].dname.to_string(),
            "CN=Me, OU=Development, O=Your Organization, L=Your City, ST=Your State, C=US"
        );
        assert_eq!(
            prompter.prompts()[0],
            "my-release-key.jks already exists, overwrite? (y/n): "
        );
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SigningLayout::new(dir.path());
        let generator = RecordingGenerator::failing(1, "keytool error: boom");
        let mut prompter = ScriptedPrompter::new(["p1", "", "", "", "", "", "", ""]);

        let err =
            provision_keystore(&mut prompter, &generator, &layout, &KeyGenSettings::default())
                .await
                .unwrap_err();

        match err {
            SignpackError::Keytool { status, stderr } => {
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "keytool error: boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(generator.requests().len(), 1);
    }
}
