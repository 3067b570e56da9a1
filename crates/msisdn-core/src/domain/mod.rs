pub mod ids;
pub mod msisdn;
pub mod subscriber;

pub use ids::SubscriberId;
pub use msisdn::{normalize, Msisdn, NormalizerConfig};
pub use subscriber::Subscriber;
