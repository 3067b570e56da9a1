use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical MSISDN: country code followed by subscriber number, digits
/// only, no separators, no leading zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Msisdn(String);

impl Msisdn {
    /// Wraps a value that is already canonical. Rows written through the
    /// store always are; everything else must go through [`normalize`].
    pub fn from_canonical(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Substituted when the input carries a local-format leading "0".
    pub default_country_code: Option<String>,
    /// When set, the only accepted country code; local-format numbers are
    /// coerced to it and explicit codes must match it.
    pub restrict_country_code: Option<String>,
    /// Enables the subscriber-number prefix whitelist below.
    pub check_prefixes: bool,
    /// Accepted subscriber-number prefixes. An empty list always passes.
    pub valid_prefixes: Vec<String>,
    pub max_length: usize,
    pub min_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_country_code: None,
            restrict_country_code: None,
            check_prefixes: false,
            valid_prefixes: Vec::new(),
            max_length: 11,
            min_length: 11,
        }
    }
}

/// Validates and normalizes a free-form mobile number.
///
/// Absent or empty input is valid for an optional field and yields
/// `Ok(None)`; every other outcome is either the canonical MSISDN or a
/// typed validation failure. Pure and stateless.
pub fn normalize(
    value: Option<&str>,
    config: &NormalizerConfig,
) -> Result<Option<Msisdn>, NormalizeError> {
    let Some(text) = value else {
        return Ok(None);
    };
    if text.is_empty() {
        return Ok(None);
    }

    let (marker, subscriber) = split_msisdn(text).ok_or(NormalizeError::Invalid)?;

    let restrict = config.restrict_country_code.as_deref();
    let country_code = if marker == "0" {
        if let Some(default) = config.default_country_code.as_deref() {
            default
        } else if let Some(code) = restrict {
            code
        } else {
            // No default and no restriction configured: the literal "0"
            // becomes the country code, as the length checks below see it.
            marker
        }
    } else {
        if let Some(expected) = restrict {
            if marker != expected {
                return Err(NormalizeError::InvalidCountryCode(expected.to_string()));
            }
        }
        marker
    };

    let msisdn = format!("{country_code}{subscriber}");
    if msisdn.len() > config.max_length {
        return Err(NormalizeError::TooLong);
    }
    if msisdn.len() < config.min_length {
        return Err(NormalizeError::TooShort);
    }

    if config.check_prefixes && !valid_prefix(&subscriber, &config.valid_prefixes) {
        return Err(NormalizeError::InvalidPrefix);
    }

    Ok(Some(Msisdn(msisdn)))
}

fn valid_prefix(subscriber: &str, prefixes: &[String]) -> bool {
    if prefixes.is_empty() {
        return true;
    }
    prefixes.iter().any(|prefix| subscriber.starts_with(prefix))
}

/// Anchored scan of the raw input into its two captures: the marker (a
/// literal "0" or an explicit two-digit country code) and the subscriber
/// number with interior spaces removed.
///
/// Accepts arbitrary non-digit noise before the marker and after the last
/// subscriber digit, and spaces between marker and subscriber and inside
/// the subscriber run. A digit anywhere in the trailing noise is a
/// mismatch.
fn split_msisdn(text: &str) -> Option<(&str, String)> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;

    let marker = if text[start..].starts_with('0') {
        &text[start..start + 1]
    } else {
        let candidate = text.get(start..start + 2)?;
        if !candidate.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
        candidate
    };

    let rest = &text[start + marker.len()..];
    let Some(first) = rest.find(|ch: char| ch.is_ascii_digit()) else {
        // No subscriber digits at all. The subscriber capture can still
        // match a lone space, leaving an empty number for the length
        // checks to reject.
        if rest.starts_with(' ') {
            return Some((marker, String::new()));
        }
        return None;
    };

    if !rest[..first].chars().all(|ch| ch == ' ') {
        return None;
    }

    let last = rest.rfind(|ch: char| ch.is_ascii_digit()).unwrap_or(first);
    let run = &rest[first..=last];
    let mut subscriber = String::with_capacity(run.len());
    for ch in run.chars() {
        if ch.is_ascii_digit() {
            subscriber.push(ch);
        } else if ch != ' ' {
            return None;
        }
    }

    Some((marker, subscriber))
}
