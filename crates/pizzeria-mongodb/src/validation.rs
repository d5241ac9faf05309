//! Validation of database and collection names taken from the command line

use pizzeria_common::{PizzeriaError, Result};
use tracing::warn;

/// MongoDB limits database names to 64 bytes
const MAX_DATABASE_NAME_LENGTH: usize = 63;

/// Maximum allowed length for collection names (MongoDB limit is 255, we're more conservative)
const MAX_COLLECTION_NAME_LENGTH: usize = 120;

/// Characters MongoDB refuses in database names on any platform
const DATABASE_NAME_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?'];

/// A database or collection name that passed validation
///
/// # Guarantees
/// - Not empty, no null bytes, no `$`
/// - Database names: at most 63 bytes, none of `/\. "*<>:|?`
/// - Collection names: at most 120 bytes, no `system.` prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedName {
    name: String,
}

impl ValidatedName {
    pub fn database(name: &str) -> Result<Self> {
        check_common("Database", name)?;

        if name.len() > MAX_DATABASE_NAME_LENGTH {
            return Err(PizzeriaError::Validation(format!(
                "Database name exceeds maximum length of {} characters: '{}'",
                MAX_DATABASE_NAME_LENGTH, name
            )));
        }

        if let Some(c) = name.chars().find(|c| DATABASE_NAME_FORBIDDEN.contains(c)) {
            return Err(PizzeriaError::Validation(format!(
                "Database name cannot contain '{}': '{}'",
                c, name
            )));
        }

        Ok(Self { name: name.to_string() })
    }

    pub fn collection(name: &str) -> Result<Self> {
        check_common("Collection", name)?;

        if name.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(PizzeriaError::Validation(format!(
                "Collection name exceeds maximum length of {} characters: '{}'",
                MAX_COLLECTION_NAME_LENGTH, name
            )));
        }

        if name.starts_with("system.") {
            return Err(PizzeriaError::Validation(format!(
                "Collection name cannot start with 'system.' (reserved): '{}'",
                name
            )));
        }

        if name.contains("..") {
            warn!(name, "Collection name contains suspicious pattern");
        }

        Ok(Self { name: name.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

fn check_common(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PizzeriaError::Validation(format!("{} name cannot be empty", kind)));
    }
    if name.contains('\0') {
        return Err(PizzeriaError::Validation(format!(
            "{} name cannot contain null bytes",
            kind
        )));
    }
    if name.contains('$') {
        return Err(PizzeriaError::Validation(format!(
            "{} name cannot contain '$' character: '{}'",
            kind, name
        )));
    }
    Ok(())
}

impl std::fmt::Display for ValidatedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
