use marketdesk_core::{AppResult, RecordId};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::upload::UploadFile;
use crate::view::Queryable;

/// Kind of write a form submission performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// New record submitted from an empty form.
    Create,
    /// Existing record edited in place.
    Update,
}

/// A backend record held in a screen's list.
pub trait Record: Queryable + Clone + PartialEq + Send + Sync + DeserializeOwned + 'static {
    /// Human label used in notices and logs, e.g. `category`.
    const LABEL: &'static str;

    /// Returns the record identifier.
    fn id(&self) -> RecordId;
}

/// A record the administrator can create, edit and delete.
pub trait Resource: Record {
    /// Form payload submitted for create and update.
    type Input: ResourceInput;

    /// Builds the provisional record shown while a create request is in flight.
    fn provisional(id: RecordId, input: &Self::Input) -> Self;

    /// Returns a copy of this record with the form values merged in.
    fn merged(&self, input: &Self::Input) -> Self;
}

/// Form payload for a [`Resource`].
pub trait ResourceInput: Serialize + Clone + Send + Sync + 'static {
    /// Validates the payload before anything is sent.
    fn validate(&self, kind: MutationKind) -> AppResult<()>;

    /// Returns the attached file and its multipart field name, if any.
    fn upload(&self) -> Option<(&'static str, &UploadFile)> {
        None
    }
}
