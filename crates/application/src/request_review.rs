use std::sync::Arc;

use marketdesk_core::{AppError, AppResult, Language, RecordId};
use marketdesk_domain::{
    FacetValue, Record, RequestStatus, ReviewDecision, SubscriptionRequest,
    SubscriptionRequestField, ViewQuery,
};
use tracing::{info, warn};

use crate::list_store::{FetchFailurePolicy, ListStore, LoadOutcome};
use crate::messages::{MessageKey, render, render_failure};
use crate::resource_screen::load_with_notice;
use crate::screen_ports::{ListScope, Notice, Notifier, SubscriptionReviewGateway};
use crate::session::AdminSession;

/// What a request row offers in its actions column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowActions {
    /// Buttons for the remaining decisions.
    Decide(&'static [ReviewDecision]),
    /// Disabled label describing the final state.
    Settled(String),
}

/// Returns the actions column for one request row.
#[must_use]
pub fn row_actions(request: &SubscriptionRequest, language: Language) -> RowActions {
    match request.status {
        RequestStatus::Pending => RowActions::Decide(request.available_decisions()),
        RequestStatus::Approved => RowActions::Settled(render(
            language,
            MessageKey::AlreadyApproved,
            SubscriptionRequest::LABEL,
        )),
        RequestStatus::Rejected => RowActions::Settled(render(
            language,
            MessageKey::AlreadyRejected,
            SubscriptionRequest::LABEL,
        )),
    }
}

/// Subscription request screen: list plus approve/reject decisions.
///
/// Decisions are applied optimistically and rolled back when the backend
/// refuses them. Only pending requests can be decided.
pub struct SubscriptionRequestReview {
    store: ListStore<SubscriptionRequest>,
    gateway: Arc<dyn SubscriptionReviewGateway>,
    notifier: Arc<dyn Notifier>,
    session: AdminSession,
    query: ViewQuery<SubscriptionRequestField>,
}

impl SubscriptionRequestReview {
    /// Creates the screen with an empty list.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn SubscriptionReviewGateway>,
        notifier: Arc<dyn Notifier>,
        session: AdminSession,
        failure_policy: FetchFailurePolicy,
    ) -> Self {
        Self {
            store: ListStore::new(failure_policy),
            gateway,
            notifier,
            session,
            query: ViewQuery::new(),
        }
    }

    /// Returns the request list.
    #[must_use]
    pub fn store(&self) -> &ListStore<SubscriptionRequest> {
        &self.store
    }

    /// Fetches all requests.
    pub async fn load(&self) -> AppResult<LoadOutcome> {
        load_with_notice(
            &self.store,
            self.gateway.as_ref(),
            &ListScope::all(),
            self.notifier.as_ref(),
            &self.session,
        )
        .await
    }

    /// Approves a pending request.
    pub async fn approve(&self, id: RecordId) -> AppResult<SubscriptionRequest> {
        self.decide(id, ReviewDecision::Approve, None).await
    }

    /// Rejects a pending request with an optional reason.
    pub async fn reject(&self, id: RecordId, reason: Option<&str>) -> AppResult<SubscriptionRequest> {
        self.decide(id, ReviewDecision::Reject, reason).await
    }

    async fn decide(
        &self,
        id: RecordId,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> AppResult<SubscriptionRequest> {
        let existing = self.store.find(id).await.ok_or_else(|| {
            AppError::NotFound(format!("subscription request {id} is not in the list"))
        })?;
        let decided = existing.decided(decision, reason)?;

        let snapshot = self.store.snapshot().await;
        self.store.replace(id, decided.clone()).await;

        let language = self.session.language().await;
        match self.gateway.decide(id, decision, reason).await {
            Ok(stored) => {
                let request = match stored {
                    Some(stored) => {
                        self.store.replace(id, stored.clone()).await;
                        stored
                    }
                    None => decided,
                };
                info!(
                    id = %id,
                    decision = decision.as_str(),
                    "subscription request reviewed"
                );
                let key = match decision {
                    ReviewDecision::Approve => MessageKey::Approved,
                    ReviewDecision::Reject => MessageKey::Rejected,
                };
                self.notifier.notify(Notice::success(render(
                    language,
                    key,
                    SubscriptionRequest::LABEL,
                )));
                Ok(request)
            }
            Err(error) => {
                warn!(id = %id, error = %error, "subscription request review rolled back");
                self.store.restore(snapshot).await;
                self.notifier.notify(Notice::error(render_failure(
                    language,
                    MessageKey::ReviewFailed,
                    SubscriptionRequest::LABEL,
                    &error,
                )));
                Err(error)
            }
        }
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.set_search(term);
    }

    /// Filters by status; `all` shows every request.
    pub fn set_status_filter(&mut self, status: &str) {
        self.query
            .set_facet(SubscriptionRequestField::Status, FacetValue::parse(status));
    }

    /// Selects a sort column.
    pub fn sort_by(&mut self, field: SubscriptionRequestField) {
        self.query.sort_by(field);
    }

    /// Returns the filtered rows paired with their actions column.
    pub async fn rows(&self) -> Vec<(SubscriptionRequest, RowActions)> {
        let language = self.session.language().await;
        self.store
            .view(&self.query)
            .await
            .into_iter()
            .map(|request| {
                let actions = row_actions(&request, language);
                (request, actions)
            })
            .collect()
    }

    /// Detaches the list; responses arriving later are dropped.
    pub async fn close(&self) {
        self.store.detach().await;
    }
}

#[cfg(test)]
mod tests;
