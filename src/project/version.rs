//! Azure API version strings: `YYYY-MM-DD` or `YYYY-MM-DD-tag`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:-([A-Za-z0-9._-]+))?$").expect("valid version regex")
});

/// A string that does not follow the version grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed version string `{input}`: expected YYYY-MM-DD or YYYY-MM-DD-tag")]
pub struct VersionFormatError {
    pub input: String,
}

/// A parsed API version.
///
/// Ordered by (year, month, day) and then by tag. A bare date orders before
/// every tagged version of the same date; tags compare byte-wise, so
/// `1.10` sorts before `1.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionString {
    year: u16,
    month: u8,
    day: u8,
    tag: Option<String>,
}

impl VersionString {
    pub fn parse(input: &str) -> Result<Self, VersionFormatError> {
        let err = || VersionFormatError {
            input: input.to_string(),
        };
        let caps = VERSION_RE.captures(input).ok_or_else(err)?;
        let year: u16 = caps[1].parse().map_err(|_| err())?;
        let month: u8 = caps[2].parse().map_err(|_| err())?;
        let day: u8 = caps[3].parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(err());
        }
        Ok(Self {
            year,
            month,
            day,
            tag: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn is_preview(&self) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|tag| tag.to_ascii_lowercase().contains("preview"))
    }

    /// Digits of the version, used to build import aliases (`20171201`)
    pub fn digits(&self) -> String {
        self.to_string().chars().filter(char::is_ascii_digit).collect()
    }
}

impl FromStr for VersionString {
    type Err = VersionFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(tag) = &self.tag {
            write!(f, "-{}", tag)?;
        }
        Ok(())
    }
}

/// Compare two raw version strings
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionFormatError> {
    Ok(VersionString::parse(a)?.cmp(&VersionString::parse(b)?))
}

/// `a <= b` under version ordering
pub fn version_le(a: &str, b: &str) -> Result<bool, VersionFormatError> {
    compare_versions(a, b).map(|ord| ord != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips() {
        for input in ["2017-12-01", "2018-03-03-1.2", "2016-02-01-preview"] {
            assert_eq!(VersionString::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_digits() {
        let v = VersionString::parse("2019-06-01-preview").unwrap();
        assert_eq!(v.digits(), "20190601");
        assert!(v.is_preview());
    }

    #[test]
    fn test_rejects_out_of_range_month() {
        assert!(VersionString::parse("2019-13-01").is_err());
        assert!(VersionString::parse("2019-01-00").is_err());
    }

    #[test]
    fn test_rejects_empty_tag() {
        assert!(VersionString::parse("2019-01-01-").is_err());
    }
}
