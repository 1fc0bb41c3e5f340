//! Application services and ports.

#![forbid(unsafe_code)]

mod area_screen;
mod list_store;
mod messages;
mod optimistic_mutator;
mod request_review;
mod resource_screen;
mod screen_ports;
mod session;

#[cfg(test)]
mod test_fakes;

pub use area_screen::{AreaRow, AreaScreen, GOVERNORATE_SCOPE_KEY};
pub use list_store::{FetchFailurePolicy, ListStore, LoadOutcome};
pub use messages::{MessageKey, record_label, render, render_failure};
pub use optimistic_mutator::{OptimisticMutator, ReconcilePolicy};
pub use request_review::{RowActions, SubscriptionRequestReview, row_actions};
pub use resource_screen::{ResourceScreen, ScreenOptions};
pub use screen_ports::{
    ListScope, Notice, NoticeLevel, Notifier, PreferenceStore, RecordSource, ResourceGateway,
    SubscriptionReviewGateway,
};
pub use session::AdminSession;
