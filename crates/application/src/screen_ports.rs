mod gateway;
mod notifier;
mod preferences;

pub use gateway::{ListScope, RecordSource, ResourceGateway, SubscriptionReviewGateway};
pub use notifier::{Notice, NoticeLevel, Notifier};
pub use preferences::PreferenceStore;
