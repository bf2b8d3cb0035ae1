//! Field checks the services run once the access policy has allowed
//! an action, so a refused attempt is logged whatever it submitted.

use validator::ValidateLength;

use crate::errors::{AppError, AppResult};

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub(crate) fn required(value: String, max: u64, missing: &str, too_long: &str) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::validation(missing));
    }
    bounded(&value, max, too_long)?;
    Ok(value)
}

pub(crate) fn bounded<T: ValidateLength<u64>>(value: &T, max: u64, too_long: &str) -> AppResult<()> {
    if value.validate_length(None, Some(max), None) {
        Ok(())
    } else {
        Err(AppError::validation(too_long))
    }
}

/// Parse a submitted id. Blank means no reference.
pub(crate) fn reference(value: Option<&str>, malformed: &str) -> AppResult<Option<i32>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation(malformed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_bounds() {
        assert_eq!(required("  Ops ".into(), 3, "missing", "long").unwrap(), "Ops");
        assert!(matches!(
            required("   ".into(), 3, "missing", "long"),
            Err(AppError::Validation(m)) if m == "missing"
        ));
        assert!(matches!(
            required("Opsx".into(), 3, "missing", "long"),
            Err(AppError::Validation(m)) if m == "long"
        ));
    }

    #[test]
    fn test_bounded_counts_characters() {
        assert!(bounded(&"ééé".to_string(), 3, "long").is_ok());
        assert!(bounded(&Some("abcd".to_string()), 3, "long").is_err());
        assert!(bounded(&None::<String>, 3, "long").is_ok());
    }

    #[test]
    fn test_reference_parsing() {
        assert_eq!(reference(None, "bad").unwrap(), None);
        assert_eq!(reference(Some(" "), "bad").unwrap(), None);
        assert_eq!(reference(Some(" 7 "), "bad").unwrap(), Some(7));
        assert!(matches!(
            reference(Some("abc"), "bad"),
            Err(AppError::Validation(m)) if m == "bad"
        ));
    }
}
