pub mod subscription;
pub mod transaction;

pub use subscription::SubscriptionRegistry;
pub use transaction::Transaction;
