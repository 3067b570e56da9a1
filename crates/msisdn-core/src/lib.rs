pub mod domain;
pub mod error;
pub mod messages;

pub use domain::*;
pub use error::{CoreError, NormalizeError};
pub use messages::{Messages, HELP_TEXT};
