//! Strength policy settings (`password_checker` section).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dictionary;
use crate::error::{PolicyError, PolicyResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Minimum number of characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Reject passwords that are entirely lower-case or entirely upper-case.
    #[serde(default)]
    pub mixed_case_required: bool,

    /// Require at least one ASCII digit.
    #[serde(default)]
    pub digit_required: bool,

    /// Require at least one ASCII punctuation character.
    #[serde(default)]
    pub special_required: bool,

    /// Reject passwords containing any word of the dictionary file.
    #[serde(default)]
    pub dictionary_check_enabled: bool,

    /// Newline-delimited word list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_file: Option<PathBuf>,
}

fn default_min_length() -> usize {
    8
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            mixed_case_required: false,
            digit_required: false,
            special_required: false,
            dictionary_check_enabled: false,
            dictionary_file: None,
        }
    }
}

impl PolicyConfig {
    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    #[must_use]
    pub fn with_mixed_case(mut self) -> Self {
        self.mixed_case_required = true;
        self
    }

    #[must_use]
    pub fn with_digit(mut self) -> Self {
        self.digit_required = true;
        self
    }

    #[must_use]
    pub fn with_special(mut self) -> Self {
        self.special_required = true;
        self
    }

    /// Enable the dictionary check with the given word list.
    #[must_use]
    pub fn with_dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary_check_enabled = true;
        self.dictionary_file = Some(path.into());
        self
    }

    /// Dictionary path, if the dictionary check is enabled.
    pub fn dictionary_path(&self) -> PolicyResult<Option<&PathBuf>> {
        if !self.dictionary_check_enabled {
            return Ok(None);
        }
        self.dictionary_file
            .as_ref()
            .map(Some)
            .ok_or_else(|| PolicyError::InvalidConfiguration {
                message: "dictionary_check_enabled requires dictionary_file".to_string(),
            })
    }

    /// Validate the policy at startup, including that the dictionary is readable.
    pub fn validate(&self) -> PolicyResult<()> {
        if let Some(path) = self.dictionary_path()? {
            dictionary::load_dictionary(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let policy: PolicyConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, PolicyConfig::default());
        assert_eq!(policy.min_length, 8);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_deserialize_full() {
        let yaml = r#"
min_length: 12
mixed_case_required: true
digit_required: true
special_required: true
dictionary_check_enabled: true
dictionary_file: /usr/share/dict/words
"#;
        let policy: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.min_length, 12);
        assert!(policy.mixed_case_required && policy.digit_required && policy.special_required);
        assert_eq!(
            policy.dictionary_file,
            Some(PathBuf::from("/usr/share/dict/words"))
        );
    }

    #[test]
    fn test_dictionary_enabled_without_file() {
        let policy = PolicyConfig {
            dictionary_check_enabled: true,
            ..PolicyConfig::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_dictionary_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let policy = PolicyConfig::default().with_dictionary(dir.path().join("missing.txt"));
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::DictionaryUnavailable { .. })
        ));
    }

    #[test]
    fn test_dictionary_readable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "summer").unwrap();
        let policy = PolicyConfig::default().with_dictionary(file.path());
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_dictionary_file_ignored_when_disabled() {
        let policy = PolicyConfig {
            dictionary_file: Some(PathBuf::from("/nonexistent/words")),
            ..PolicyConfig::default()
        };
        assert!(policy.validate().is_ok());
    }
}
