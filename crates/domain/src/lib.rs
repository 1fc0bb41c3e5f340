//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod admin;
mod area;
mod category;
mod plan;
mod resource;
mod subscription;
mod upload;
mod view;

pub use admin::{
    Admin, AdminField, AdminInput, AdminRole, EmailAddress, PASSWORD_MAX_LENGTH,
    PASSWORD_MIN_LENGTH, PHONE_DIGITS, validate_password, validate_phone,
};
pub use area::{
    Area, AreaField, AreaInput, Governorate, GovernorateField, LatLng, POLYGON_MIN_POINTS,
    governorate_name, validate_polygon,
};
pub use category::{CATEGORY_ICON_PLACEHOLDER, Category, CategoryField, CategoryInput};
pub use plan::{Plan, PlanField, PlanInput};
pub use resource::{MutationKind, Record, Resource, ResourceInput};
pub use subscription::{
    NamedRef, RequestStatus, ReviewDecision, Subscription, SubscriptionField, SubscriptionInput,
    SubscriptionRequest, SubscriptionRequestField, SubscriptionStatus,
};
pub use upload::{ICON_MAX_BYTES, PAYMENT_PROOF_MAX_BYTES, UploadFile, UploadRule};
pub use view::{
    FacetFilter, FacetValue, FieldValue, Queryable, SortDirection, SortSpec, ViewQuery, matches,
    project,
};
