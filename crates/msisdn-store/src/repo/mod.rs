pub mod subscribers;

pub use subscribers::SubscribersRepo;
