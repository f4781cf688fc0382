//! Cell name validation.
//!
//! ## Summary
//! Cell names preserve case and are unique by their exact spelling:
//! "cellname" and "CELLNAME" coexist as distinct cells, while creating the
//! exact same name twice conflicts.

use crate::error::{CoreError, CoreResult};

/// Maximum cell name length, in characters.
pub const MAX_CELL_NAME_LEN: usize = 128;

/// Validate a cell name.
///
/// A name is valid when it is 1..=128 ASCII characters, starts with a letter
/// or digit, and contains only letters, digits, and hyphens.
///
/// ## Errors
/// Returns `CoreError::ValidationError` describing the first rule violated.
pub fn validate_cell_name(name: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::ValidationError(
            "cell name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_CELL_NAME_LEN {
        return Err(CoreError::ValidationError(format!(
            "cell name exceeds {MAX_CELL_NAME_LEN} characters"
        )));
    }
    let mut chars = name.chars();
    // Checked non-empty above
    if let Some(first) = chars.next() {
        if !first.is_ascii_alphanumeric() {
            return Err(CoreError::ValidationError(format!(
                "cell name must start with a letter or digit: {name:?}"
            )));
        }
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
    {
        return Err(CoreError::ValidationError(format!(
            "cell name contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert!(validate_cell_name("cellbulkdeletiontest").is_ok());
    }

    #[test]
    fn test_mixed_case() {
        assert!(validate_cell_name("CellBulkDeletionTest").is_ok());
    }

    #[test]
    fn test_with_hyphen() {
        assert!(validate_cell_name("cell-01").is_ok());
    }

    #[test]
    fn test_empty() {
        assert!(validate_cell_name("").is_err());
    }

    #[test]
    fn test_leading_hyphen() {
        assert!(validate_cell_name("-cell").is_err());
    }

    #[test]
    fn test_invalid_char() {
        assert!(validate_cell_name("cell_name").is_err());
        assert!(validate_cell_name("cell name").is_err());
        assert!(validate_cell_name("cell/name").is_err());
    }

    #[test]
    fn test_too_long() {
        let name = "a".repeat(MAX_CELL_NAME_LEN + 1);
        assert!(validate_cell_name(&name).is_err());
        let name = "a".repeat(MAX_CELL_NAME_LEN);
        assert!(validate_cell_name(&name).is_ok());
    }
}
