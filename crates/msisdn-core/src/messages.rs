use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};

/// Display hint shown next to number inputs.
pub const HELP_TEXT: &str = "A mobile number with international dialling code eg: 27831234567";

/// User-facing message templates, one per validation failure.
///
/// The `invalid_country_code` template may contain a `{code}` placeholder
/// that is replaced with the expected country code when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub invalid: String,
    pub invalid_country_code: String,
    pub invalid_prefix: String,
    pub too_short: String,
    pub too_long: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid: "Enter a valid mobile number.".to_string(),
            invalid_country_code: "Enter a number with the {code} country code.".to_string(),
            invalid_prefix: "Enter a number with a valid prefix.".to_string(),
            too_short: "Enter a mobile number with more digits.".to_string(),
            too_long: "Enter a mobile number with less digits.".to_string(),
        }
    }
}

impl Messages {
    /// Length messages that quote a full example number instead of the
    /// generic more/less wording.
    pub fn with_example(example: &str) -> Self {
        let length_hint = format!(
            "Enter a mobile number, consisting of {} digits eg: {}",
            example.len(),
            example
        );
        Self {
            too_short: length_hint.clone(),
            too_long: length_hint,
            ..Self::default()
        }
    }

    pub fn render(&self, err: &NormalizeError) -> String {
        match err {
            NormalizeError::Invalid => self.invalid.clone(),
            NormalizeError::InvalidCountryCode(code) => {
                self.invalid_country_code.replace("{code}", code)
            }
            NormalizeError::InvalidPrefix => self.invalid_prefix.clone(),
            NormalizeError::TooShort => self.too_short.clone(),
            NormalizeError::TooLong => self.too_long.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Messages;
    use crate::error::NormalizeError;

    #[test]
    fn render_substitutes_expected_country_code() {
        let messages = Messages::default();
        let text = messages.render(&NormalizeError::InvalidCountryCode("27".to_string()));
        assert_eq!(text, "Enter a number with the 27 country code.");
    }

    #[test]
    fn with_example_quotes_the_example_in_length_messages() {
        let messages = Messages::with_example("27831234567");
        let expected = "Enter a mobile number, consisting of 11 digits eg: 27831234567";
        assert_eq!(messages.render(&NormalizeError::TooShort), expected);
        assert_eq!(messages.render(&NormalizeError::TooLong), expected);
        assert_eq!(
            messages.render(&NormalizeError::Invalid),
            "Enter a valid mobile number."
        );
    }
}
