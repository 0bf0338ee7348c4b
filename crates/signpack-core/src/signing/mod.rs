//! Android keystore provisioning.
//!
//! This module provides functionality for:
//! - collecting the certificate subject (distinguished name)
//! - running `keytool -genkey` to create a keystore
//! - reusing an existing keystore with user-supplied credentials

pub mod dname;
pub mod keystore;
pub mod keytool;
pub mod provision;

pub use dname::DistinguishedName;
pub use keystore::{KeystoreCredentials, KeystoreKind, detect_keystore_kind};
pub use keytool::{GenerationRequest, KeyGenerator, Keytool};
pub use provision::{DEFAULT_ALIAS, provision_keystore};
