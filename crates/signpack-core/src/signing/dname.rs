//! Certificate subject fields.

use std::fmt;

use crate::error::Result;
use crate::prompt::{Prompter, ask_with_default};

/// X.500 subject used for the self-signed certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub organizational_unit: String,
    pub organization: String,
    pub locality: String,
    pub state: String,
    pub country: String,
}

impl Default for DistinguishedName {
    fn default() -> Self {
        Self {
            common_name: "Android".to_string(),
            organizational_unit: "Development".to_string(),
            organization: "Your Organization".to_string(),
            locality: "Your City".to_string(),
            state: "Your State".to_string(),
            country: "CN".to_string(),
        }
    }
}

impl DistinguishedName {
    /// Prompts for all six fields in CN, OU, O, L, ST, C order.
    ///
    /// Blank answers keep the default. Values are not validated.
    pub fn prompt(prompter: &mut dyn Prompter) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            common_name: ask_with_default(prompter, "Name (CN)", &defaults.common_name)?,
            organizational_unit: ask_with_default(
                prompter,
                "Organizational unit (OU)",
                &defaults.organizational_unit,
            )?,
            organization: ask_with_default(prompter, "Organization (O)", &defaults.organization)?,
            locality: ask_with_default(prompter, "City or locality (L)", &defaults.locality)?,
            state: ask_with_default(prompter, "State or province (ST)", &defaults.state)?,
            country: ask_with_default(prompter, "Country code (C)", &defaults.country)?,
        })
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CN={}, OU={}, O={}, L={}, ST={}, C={}",
            self.common_name,
            self.organizational_unit,
            self.organization,
            self.locality,
            self.state,
            self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedPrompter;

    #[test]
    fn test_blank_answers_yield_defaults_in_order() {
        let mut prompter = ScriptedPrompter::new(["", "", "", "", "", ""]);
        let dname = DistinguishedName::prompt(&mut prompter).unwrap();

        assert_eq!(
            dname.to_string(),
            "CN=Android, OU=Development, O=Your Organization, L=Your City, ST=Your State, C=CN"
        );
        assert_eq!(
            prompter.prompts(),
            [
                "Name (CN) [Android]: ",
                "Organizational unit (OU) [Development]: ",
                "Organization (O) [Your Organization]: ",
                "City or locality (L) [Your City]: ",
                "State or province (ST) [Your State]: ",
                "Country code (C) [CN]: ",
            ]
        );
    }

    #[test]
    fn test_answers_override_individual_fields() {
        let mut prompter = ScriptedPrompter::new(["Jane Doe", "", "Acme", "", "Bavaria", "DE"]);
        let dname = DistinguishedName::prompt(&mut prompter).unwrap();

        assert_eq!(
            dname.to_string(),
            "CN=Jane Doe, OU=Development, O=Acme, L=Your City, ST=Bavaria, C=DE"
        );
    }

    #[test]
    fn test_country_is_not_validated() {
        let mut prompter = ScriptedPrompter::new(["", "", "", "", "", "Narnia"]);
        let dname = DistinguishedName::prompt(&mut prompter).unwrap();
        assert_eq!(dname.country, "Narnia");
    }
}
