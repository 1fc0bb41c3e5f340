//! Infrastructure adapters for the marketdesk console.

#![forbid(unsafe_code)]

mod file_preference_store;
mod http_api_client;
mod http_resource_gateway;
mod http_subscription_review_gateway;
mod in_memory_toast_queue;

#[cfg(test)]
mod test_backend;

pub use file_preference_store::FilePreferenceStore;
pub use http_api_client::HttpApiClient;
pub use http_resource_gateway::{
    ADMINS_PATH, AREAS_PATH, CATEGORIES_PATH, GOVERNORATES_PATH, HttpResourceGateway, PLANS_PATH,
    SUBSCRIPTION_REQUESTS_PATH, SUBSCRIPTIONS_PATH,
};
pub use http_subscription_review_gateway::HttpSubscriptionReviewGateway;
pub use in_memory_toast_queue::{DEFAULT_TOAST_TTL, InMemoryToastQueue};
