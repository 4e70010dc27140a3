//! Password strength validation.

use std::fmt;

use tracing::{debug, instrument, warn};

use crate::config::PolicyConfig;
use crate::dictionary::{find_dictionary_word, load_dictionary};
use crate::error::PolicyResult;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// A rule the candidate password does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// Password is too short.
    TooShort { min: usize, actual: usize },
    /// Password is entirely lower-case or entirely upper-case.
    MissingMixedCase,
    /// Missing digit.
    MissingDigit,
    /// Missing special character.
    MissingSpecialChar,
    /// Password contains a dictionary word.
    DictionaryWord,
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min, actual } => {
                write!(
                    f,
                    "Password must be at least {min} characters (got {actual})"
                )
            }
            Self::MissingMixedCase => {
                write!(f, "Password must mix upper-case and lower-case letters")
            }
            Self::MissingDigit => write!(f, "Password must contain at least one digit"),
            Self::MissingSpecialChar => {
                write!(f, "Password must contain at least one special character")
            }
            Self::DictionaryWord => {
                write!(f, "Password must not contain a dictionary word")
            }
        }
    }
}

/// Result of password validation against policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordValidationResult {
    /// Whether the password is valid.
    pub is_valid: bool,
    /// Violations in rule order (empty if valid).
    pub errors: Vec<PolicyViolation>,
}

impl PasswordValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Create a result with errors.
    #[must_use]
    pub fn with_errors(errors: Vec<PolicyViolation>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// All violations as human-readable reasons.
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validates candidate passwords against an optional policy.
#[derive(Debug, Clone, Default)]
pub struct PasswordValidator {
    policy: Option<PolicyConfig>,
}

impl PasswordValidator {
    /// Create a validator. `None` accepts every password.
    #[must_use]
    pub fn new(policy: Option<PolicyConfig>) -> Self {
        Self { policy }
    }

    /// A validator that accepts every password.
    #[must_use]
    pub fn permissive() -> Self {
        Self { policy: None }
    }

    #[must_use]
    pub fn policy(&self) -> Option<&PolicyConfig> {
        self.policy.as_ref()
    }

    /// Validate `password`.
    ///
    /// Every enabled rule is evaluated, in the order length, mixed case,
    /// digit, special character, dictionary. The dictionary file is read on
    /// each call.
    ///
    /// # Errors
    /// Returns a [`PolicyError`](crate::PolicyError) when the dictionary is
    /// enabled but cannot be read.
    #[instrument(skip_all)]
    pub fn validate(&self, password: &str) -> PolicyResult<PasswordValidationResult> {
        let Some(policy) = &self.policy else {
            debug!("No password policy configured, accepting password");
            return Ok(PasswordValidationResult::valid());
        };

        let mut errors = Vec::new();
        let len = password.chars().count();

        if len < policy.min_length {
            warn!("Password is weak because it is too short");
            errors.push(PolicyViolation::TooShort {
                min: policy.min_length,
                actual: len,
            });
        }

        if policy.mixed_case_required
            && (password.to_lowercase() == password || password.to_uppercase() == password)
        {
            errors.push(PolicyViolation::MissingMixedCase);
        }

        if policy.digit_required && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(PolicyViolation::MissingDigit);
        }

        if policy.special_required && !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            errors.push(PolicyViolation::MissingSpecialChar);
        }

        if let Some(path) = policy.dictionary_path()? {
            let words = load_dictionary(path)?;
            if find_dictionary_word(password, &words).is_some() {
                warn!("Password is weak because its part is present in dictionary");
                errors.push(PolicyViolation::DictionaryWord);
            }
        }

        Ok(PasswordValidationResult::with_errors(errors))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::PolicyError;

    fn validator(policy: PolicyConfig) -> PasswordValidator {
        PasswordValidator::new(Some(policy))
    }

    fn dictionary(words: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for word in words {
            writeln!(file, "{word}").unwrap();
        }
        file
    }

    #[test]
    fn test_absent_policy_accepts_everything() {
        let result = PasswordValidator::permissive().validate("").unwrap();
        assert!(result.is_valid);
        assert!(result.reasons().is_empty());
    }

    #[test]
    fn test_min_length_default() {
        let v = validator(PolicyConfig::default());
        assert!(!v.validate("short").unwrap().is_valid);
        assert!(v.validate("eightchr").unwrap().is_valid);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let v = validator(PolicyConfig::default().with_min_length(4));
        assert!(v.validate("äöüß").unwrap().is_valid);
        assert!(!v.validate("äöü").unwrap().is_valid);
    }

    #[test]
    fn test_mixed_case() {
        let v = validator(PolicyConfig::default().with_mixed_case());
        assert_eq!(
            v.validate("alllowercase").unwrap().errors,
            vec![PolicyViolation::MissingMixedCase]
        );
        assert!(!v.validate("ALLUPPERCASE").unwrap().is_valid);
        assert!(!v.validate("12345678").unwrap().is_valid);
        assert!(v.validate("MixedCase").unwrap().is_valid);
    }

    #[test]
    fn test_digit() {
        let v = validator(PolicyConfig::default().with_digit());
        assert_eq!(
            v.validate("NoDigitsHere").unwrap().errors,
            vec![PolicyViolation::MissingDigit]
        );
        assert!(v.validate("Digit1here").unwrap().is_valid);
    }

    #[test]
    fn test_special() {
        let v = validator(PolicyConfig::default().with_special());
        assert!(!v.validate("NoSpecial123").unwrap().is_valid);
        for special in SPECIAL_CHARS.chars() {
            let candidate = format!("Password{special}");
            assert!(v.validate(&candidate).unwrap().is_valid, "{candidate}");
        }
    }

    #[test]
    fn test_all_failures_reported_in_rule_order() {
        let v = validator(
            PolicyConfig::default()
                .with_min_length(10)
                .with_mixed_case()
                .with_digit()
                .with_special(),
        );
        let result = v.validate("short").unwrap();
        assert_eq!(
            result.errors,
            vec![
                PolicyViolation::TooShort { min: 10, actual: 5 },
                PolicyViolation::MissingMixedCase,
                PolicyViolation::MissingDigit,
                PolicyViolation::MissingSpecialChar,
            ]
        );
    }

    #[test]
    fn test_dictionary_is_case_insensitive() {
        let words = dictionary(&["summer"]);
        let v = validator(PolicyConfig::default().with_dictionary(words.path()));

        let result = v.validate("Summer2024!").unwrap();
        assert_eq!(result.errors, vec![PolicyViolation::DictionaryWord]);

        assert!(v.validate("Winter2024!").unwrap().is_valid);
    }

    #[test]
    fn test_dictionary_uppercase_entry() {
        let words = dictionary(&["", "  ", "PaSsWoRd"]);
        let v = validator(PolicyConfig::default().with_dictionary(words.path()));
        assert!(!v.validate("mypassword99").unwrap().is_valid);
        // Blank lines must not match everything.
        assert!(v.validate("Tr0ub4dor&3").unwrap().is_valid);
    }

    #[test]
    fn test_dictionary_reread_each_call() {
        let mut words = dictionary(&["alpha"]);
        let v = validator(PolicyConfig::default().with_dictionary(words.path()));
        assert!(v.validate("bravo-bravo").unwrap().is_valid);

        writeln!(words, "bravo").unwrap();
        words.flush().unwrap();
        assert!(!v.validate("bravo-bravo").unwrap().is_valid);
    }

    #[test]
    fn test_missing_dictionary_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let v = validator(PolicyConfig::default().with_dictionary(dir.path().join("gone.txt")));
        assert!(matches!(
            v.validate("whatever123"),
            Err(PolicyError::DictionaryUnavailable { .. })
        ));
    }

    #[test]
    fn test_failures_are_monotonic_under_extension() {
        let v = validator(
            PolicyConfig::default()
                .with_min_length(4)
                .with_mixed_case()
                .with_digit()
                .with_special(),
        );

        // Still all lower-case.
        let base = v.validate("abcdef").unwrap();
        let extended = v.validate("abcdefghijkl").unwrap();
        assert!(base.errors.contains(&PolicyViolation::MissingMixedCase));
        assert!(extended.errors.contains(&PolicyViolation::MissingMixedCase));

        // Still no digit.
        let extended = v.validate("abcdefGHIJ!!").unwrap();
        assert!(extended.errors.contains(&PolicyViolation::MissingDigit));

        // Still no special character.
        let extended = v.validate("abcdefGHIJ12").unwrap();
        assert!(extended.errors.contains(&PolicyViolation::MissingSpecialChar));
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(
            PolicyViolation::TooShort { min: 8, actual: 5 }.to_string(),
            "Password must be at least 8 characters (got 5)"
        );
        assert_eq!(
            PolicyViolation::MissingDigit.to_string(),
            "Password must contain at least one digit"
        );
    }
}
