use crate::domain::ids::SubscriberId;
use crate::domain::msisdn::Msisdn;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub name: String,
    pub msisdn: Msisdn,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Subscriber {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(())
    }
}
