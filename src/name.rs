//! Bucket name tokenizer
//!
//! A bucket is a directory named `YYYY MM Month DD`, optionally followed by
//! free text (`2023 06 June 15 Paris`). Both the directory name and the
//! prefix of every file inside the bucket are derived from the same
//! [`BucketName`], so the two always stay in lockstep.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

/// Number of leading tokens that make up the date part of a bucket name
pub const DATE_TOKENS: usize = 4;

/// Human readable form of the expected bucket name format
pub const BUCKET_FORMAT: &str = "YYYY MM Month DD [name]";

/// Parsed bucket directory name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketName {
    date: [String; DATE_TOKENS],
    suffix: Option<String>,
}

impl BucketName {
    /// Build the canonical bucket name for a calendar day
    pub fn from_date(date: NaiveDate) -> Self {
        let formatted = date.format("%Y %m %B %d").to_string();
        let mut parts = formatted.split(' ').map(str::to_string);
        let mut next = || parts.next().unwrap_or_default();
        Self {
            date: [next(), next(), next(), next()],
            suffix: None,
        }
    }

    /// Split a directory name on whitespace
    ///
    /// Requires at least [`DATE_TOKENS`] tokens; anything after the date is
    /// kept as free text joined by single spaces.
    pub fn tokenize(name: &str) -> Result<Self> {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        if tokens.len() < DATE_TOKENS {
            return Err(Error::Format {
                name: name.to_string(),
                expected: BUCKET_FORMAT,
            });
        }

        let (date, rest) = tokens.split_at(DATE_TOKENS);
        Ok(Self {
            date: [
                date[0].to_string(),
                date[1].to_string(),
                date[2].to_string(),
                date[3].to_string(),
            ],
            suffix: (!rest.is_empty()).then(|| rest.join(" ")),
        })
    }

    /// Like [`BucketName::tokenize`], but rejects any free text after the date
    pub fn tokenize_exact(name: &str) -> Result<Self> {
        let bucket = Self::tokenize(name).map_err(|_| Error::Format {
            name: name.to_string(),
            expected: "YYYY MM Month DD",
        })?;
        if bucket.suffix.is_some() {
            return Err(Error::Format {
                name: name.to_string(),
                expected: "YYYY MM Month DD",
            });
        }
        Ok(bucket)
    }

    /// Free text following the date, if any
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Same date with the free text replaced
    ///
    /// The new text is trimmed; an empty string drops the suffix entirely.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let suffix = suffix.trim();
        Self {
            date: self.date.clone(),
            suffix: (!suffix.is_empty()).then(|| suffix.to_string()),
        }
    }

    /// Space-joined directory name
    pub fn dir_name(&self) -> String {
        let mut name = self.date.join(" ");
        if let Some(suffix) = &self.suffix {
            name.push(' ');
            name.push_str(suffix);
        }
        name
    }

    /// Underscore-joined prefix shared by every file in the bucket
    pub fn file_prefix(&self) -> String {
        self.dir_name().replace(' ', "_")
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        let bucket = BucketName::from_date(date);
        assert_eq!(bucket.dir_name(), "2023 06 June 05");
        assert_eq!(bucket.file_prefix(), "2023_06_June_05");
    }

    #[test]
    fn test_tokenize_normalises_whitespace() {
        let bucket = BucketName::tokenize("2023  06 June\t15   Paris   trip").unwrap();
        assert_eq!(bucket.date, ["2023", "06", "June", "15"].map(String::from));
        assert_eq!(bucket.suffix(), Some("Paris trip"));
        assert_eq!(bucket.dir_name(), "2023 06 June 15 Paris trip");
        assert_eq!(bucket.file_prefix(), "2023_06_June_15_Paris_trip");
    }

    #[test]
    fn test_tokenize_too_few_tokens() {
        let err = BucketName::tokenize("invalid format").unwrap_err();
        assert!(matches!(err, Error::Format { ref name, .. } if name == "invalid format"));
        assert!(BucketName::tokenize("").is_err());
    }

    #[test]
    fn test_tokenize_exact() {
        assert!(BucketName::tokenize_exact("2023 06 June 15").is_ok());
        assert!(BucketName::tokenize_exact("2023 06 June 15 Paris").is_err());
        assert!(BucketName::tokenize_exact("2023 06 June").is_err());
    }

    #[test]
    fn test_with_suffix() {
        let bucket = BucketName::tokenize("2023 06 June 15 Paris").unwrap();

        let renamed = bucket.with_suffix(" Rome ");
        assert_eq!(renamed.dir_name(), "2023 06 June 15 Rome");
        assert_eq!(renamed.file_prefix(), "2023_06_June_15_Rome");

        let cleared = bucket.with_suffix("");
        assert_eq!(cleared.dir_name(), "2023 06 June 15");
        assert_eq!(cleared.suffix(), None);
    }

    #[test]
    fn test_display_matches_dir_name() {
        let bucket = BucketName::tokenize("2024 01 January 01 New Year").unwrap();
        assert_eq!(bucket.to_string(), bucket.dir_name());
    }
}
