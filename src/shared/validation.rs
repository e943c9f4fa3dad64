use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Polish postal code, e.g. "00-950"
    pub static ref POSTAL_CODE_REGEX: Regex = Regex::new(r"^\d{2}-\d{3}$").unwrap();

    /// KRS (National Court Register) number: exactly ten digits
    pub static ref KRS_REGEX: Regex = Regex::new(r"^\d{10}$").unwrap();

    /// Phone number: optional leading +, digits with single spaces or hyphens
    /// - Valid: "+48 123 456 789", "123-456-789", "600700800"
    /// - Invalid: "abc", "12", "+48  123"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?\d(?:[ -]?\d){6,14}$").unwrap();
}

/// Trim, lowercase and de-duplicate animal category names, dropping blanks.
///
/// Output is sorted so stored category sets compare equal regardless of input order.
pub fn normalize_categories<I, S>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    categories
        .into_iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `validator` hook: at least one non-blank category
pub fn validate_categories(categories: &[String]) -> Result<(), ValidationError> {
    if normalize_categories(categories).is_empty() {
        let mut err = ValidationError::new("animal_categories");
        err.message = Some("At least one animal category is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_regex() {
        assert!(POSTAL_CODE_REGEX.is_match("00-950"));
        assert!(POSTAL_CODE_REGEX.is_match("31-042"));
        assert!(!POSTAL_CODE_REGEX.is_match("00950"));
        assert!(!POSTAL_CODE_REGEX.is_match("0-9500"));
        assert!(!POSTAL_CODE_REGEX.is_match("ab-cde"));
    }

    #[test]
    fn test_krs_regex() {
        assert!(KRS_REGEX.is_match("0000123456"));
        assert!(!KRS_REGEX.is_match("123456789"));
        assert!(!KRS_REGEX.is_match("00001234567"));
        assert!(!KRS_REGEX.is_match("00001234a6"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+48 123 456 789"));
        assert!(PHONE_REGEX.is_match("123-456-789"));
        assert!(PHONE_REGEX.is_match("600700800"));
        assert!(!PHONE_REGEX.is_match("abc"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("+48  123 456"));
    }

    #[test]
    fn test_normalize_categories() {
        let normalized = normalize_categories(["  Dogs", "cats", "DOGS", "", "   "]);
        assert_eq!(normalized, vec!["cats".to_string(), "dogs".to_string()]);
    }

    #[test]
    fn test_validate_categories_rejects_blank_only() {
        assert!(validate_categories(&[]).is_err());
        assert!(validate_categories(&[" ".to_string()]).is_err());
        assert!(validate_categories(&["horses".to_string()]).is_ok());
    }
}
