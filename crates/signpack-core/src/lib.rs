//! Signpack Core Library
//!
//! Provisioning of an Android signing keystore, generation of the
//! `signing.properties` file, and base64 packaging of both for CI secrets.

pub mod encode;
pub mod error;
pub mod layout;
pub mod prompt;
pub mod properties;
pub mod signing;
pub mod workflow;

// Test utilities are available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Result, SignpackError};
pub use layout::{KeyGenSettings, SigningLayout};
pub use prompt::Prompter;
