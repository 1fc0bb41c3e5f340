use std::sync::Arc;

use marketdesk_core::{AppResult, RecordId};
use marketdesk_domain::{FacetValue, Queryable, Record, Resource, ViewQuery};
use tracing::warn;

use crate::list_store::{FetchFailurePolicy, ListStore, LoadOutcome};
use crate::messages::{MessageKey, render_failure};
use crate::optimistic_mutator::{OptimisticMutator, ReconcilePolicy};
use crate::screen_ports::{ListScope, Notice, Notifier, RecordSource, ResourceGateway};
use crate::session::AdminSession;

/// Per-screen behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenOptions {
    /// What a failed fetch does to the visible list.
    pub failure_policy: FetchFailurePolicy,
    /// How successful updates are reconciled.
    pub reconcile_policy: ReconcilePolicy,
}

/// Fetches into `store` and reports a failure notice unless the store was detached.
pub(crate) async fn load_with_notice<R, S>(
    store: &ListStore<R>,
    source: &S,
    scope: &ListScope,
    notifier: &dyn Notifier,
    session: &AdminSession,
) -> AppResult<LoadOutcome>
where
    R: Record,
    S: RecordSource<R> + ?Sized,
{
    let result = store.load(source, scope).await;
    if let Err(error) = &result
        && !store.is_detached().await
    {
        warn!(resource = R::LABEL, error = %error, "list fetch failed");
        let language = session.language().await;
        notifier.notify(Notice::error(render_failure(
            language,
            MessageKey::LoadFailed,
            R::LABEL,
            error,
        )));
    }
    result
}

/// One management screen: list, optimistic writes and view state.
pub struct ResourceScreen<R: Resource> {
    mutator: OptimisticMutator<R>,
    gateway: Arc<dyn ResourceGateway<R>>,
    notifier: Arc<dyn Notifier>,
    session: AdminSession,
    scope: ListScope,
    query: ViewQuery<<R as Queryable>::Field>,
}

impl<R: Resource> ResourceScreen<R> {
    /// Creates a screen with an empty list.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ResourceGateway<R>>,
        notifier: Arc<dyn Notifier>,
        session: AdminSession,
        options: ScreenOptions,
    ) -> Self {
        let store = ListStore::new(options.failure_policy);
        let mutator = OptimisticMutator::new(
            store,
            Arc::clone(&gateway),
            Arc::clone(&notifier),
            session.clone(),
            options.reconcile_policy,
        );

        Self {
            mutator,
            gateway,
            notifier,
            session,
            scope: ListScope::all(),
            query: ViewQuery::new(),
        }
    }

    /// Returns the underlying list store.
    #[must_use]
    pub fn store(&self) -> &ListStore<R> {
        self.mutator.store()
    }

    /// Returns the fetch scope.
    #[must_use]
    pub fn scope(&self) -> &ListScope {
        &self.scope
    }

    /// Replaces the fetch scope used by [`Self::load`].
    pub fn set_scope(&mut self, scope: ListScope) {
        self.scope = scope;
    }

    /// Fetches the list.
    pub async fn load(&self) -> AppResult<LoadOutcome> {
        load_with_notice(
            self.mutator.store(),
            self.gateway.as_ref(),
            &self.scope,
            self.notifier.as_ref(),
            &self.session,
        )
        .await
    }

    /// Creates a record optimistically.
    pub async fn create(&self, input: R::Input) -> AppResult<R> {
        self.mutator.create(input).await
    }

    /// Updates a record optimistically.
    pub async fn update(&self, id: RecordId, input: R::Input) -> AppResult<R> {
        self.mutator.update(id, input).await
    }

    /// Deletes a record optimistically.
    pub async fn delete(&self, id: RecordId) -> AppResult<()> {
        self.mutator.delete(id).await
    }

    /// Returns the current view state.
    #[must_use]
    pub fn query(&self) -> &ViewQuery<<R as Queryable>::Field> {
        &self.query
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.set_search(term);
    }

    /// Sets a categorical filter.
    pub fn set_facet(&mut self, field: <R as Queryable>::Field, value: FacetValue) {
        self.query.set_facet(field, value);
    }

    /// Selects a sort column, toggling direction when it is already active.
    pub fn sort_by(&mut self, field: <R as Queryable>::Field) {
        self.query.sort_by(field);
    }

    /// Returns the filtered, sorted rows.
    pub async fn view(&self) -> Vec<R> {
        self.mutator.store().view(&self.query).await
    }

    /// Detaches the list; responses arriving later are dropped.
    pub async fn close(&self) {
        self.mutator.store().detach().await;
    }
}
