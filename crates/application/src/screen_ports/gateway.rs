use async_trait::async_trait;
use marketdesk_core::{AppResult, RecordId};
use marketdesk_domain::{Record, Resource, ReviewDecision, SubscriptionRequest};

/// Query parameters narrowing a collection fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScope {
    params: Vec<(String, String)>,
}

impl ListScope {
    /// Scope that fetches the whole collection.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds one query parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Returns the query parameters in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Returns the value of one parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Port for reading one backend collection.
#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    /// Lists records in backend display order.
    async fn list(&self, scope: &ListScope) -> AppResult<Vec<R>>;
}

/// Port for writing one backend collection.
#[async_trait]
pub trait ResourceGateway<R: Resource>: RecordSource<R> {
    /// Creates a record and returns the stored version.
    async fn create(&self, input: &R::Input) -> AppResult<R>;

    /// Updates a record. Returns the stored version when the backend sends one.
    async fn update(&self, id: RecordId, input: &R::Input) -> AppResult<Option<R>>;

    /// Deletes a record.
    async fn delete(&self, id: RecordId) -> AppResult<()>;
}

/// Port for reviewing supplier subscription requests.
#[async_trait]
pub trait SubscriptionReviewGateway: RecordSource<SubscriptionRequest> {
    /// Records an approve or reject decision.
    ///
    /// Returns the stored request when the backend sends one.
    async fn decide(
        &self,
        id: RecordId,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> AppResult<Option<SubscriptionRequest>>;
}
