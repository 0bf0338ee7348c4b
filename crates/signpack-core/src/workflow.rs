//! End-to-end run: provision the keystore, write properties, encode both.

use std::path::PathBuf;

use crate::encode::{SecretArtifacts, write_secret_artifacts};
use crate::error::Result;
use crate::layout::{KeyGenSettings, SigningLayout};
use crate::prompt::Prompter;
use crate::properties::{collect_signing_properties, write_signing_properties};
use crate::signing::{KeyGenerator, KeystoreCredentials, provision_keystore};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub credentials: KeystoreCredentials,
    pub properties_file: PathBuf,
    pub artifacts: SecretArtifacts,
}

/// Runs the three stages in order.
///
/// There is no rollback: if a later stage fails, files written by earlier
/// stages stay on disk and the run has to be started again.
pub async fn run(
    prompter: &mut dyn Prompter,
    generator: &dyn KeyGenerator,
    layout: &SigningLayout,
    settings: &KeyGenSettings,
) -> Result<RunSummary> {
    let credentials = provision_keystore(prompter, generator, layout, settings).await?;

    let properties = collect_signing_properties(
        prompter,
        &credentials.path.display().to_string(),
        Some(credentials.password.clone()),
        Some(credentials.alias.clone()),
    )?;

    let properties_file = layout.properties_file();
    write_signing_properties(&properties_file, &properties).await?;
    prompter.note(&format!(
        "signing.properties created: {}",
        properties_file.display()
    ));

    prompter.note("");
    prompter.note("===== Encoding files for CI secrets =====");
    let artifacts =
        write_secret_artifacts(&layout.keystore_file(), &properties_file, &layout.output_dir())
            .await?;

    tracing::info!(
        "Encoded {} and {}",
        artifacts.properties.path.display(),
        artifacts.keystore.path.display()
    );

    Ok(RunSummary {
        credentials,
        properties_file,
        artifacts,
    })
}
