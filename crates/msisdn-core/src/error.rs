use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("enter a valid mobile number")]
    Invalid,
    #[error("enter a number with the {0} country code")]
    InvalidCountryCode(String),
    #[error("enter a number with a valid prefix")]
    InvalidPrefix,
    #[error("enter a mobile number with more digits")]
    TooShort,
    #[error("enter a mobile number with less digits")]
    TooLong,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("subscriber name is required")]
    EmptyName,
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
