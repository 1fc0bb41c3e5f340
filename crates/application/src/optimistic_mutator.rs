use std::sync::Arc;

use marketdesk_core::{AppError, AppResult, RecordId};
use marketdesk_domain::{MutationKind, Record, Resource, ResourceInput};
use tracing::{info, warn};

use crate::list_store::ListStore;
use crate::messages::{MessageKey, render, render_failure};
use crate::screen_ports::{Notice, Notifier, ResourceGateway};
use crate::session::AdminSession;

/// How a successful update is reconciled with the backend response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Overwrite the optimistic merge with the stored record when one is returned.
    #[default]
    AdoptServer,
    /// Keep the optimistic merge as final.
    KeepOptimistic,
}

/// Applies create, update and delete optimistically against a [`ListStore`].
///
/// Every write edits the store before the request is sent, then reconciles on
/// success or rolls back on failure. Each outcome emits exactly one notice.
/// Validation failures are returned for inline display and emit none.
pub struct OptimisticMutator<R: Resource> {
    store: ListStore<R>,
    gateway: Arc<dyn ResourceGateway<R>>,
    notifier: Arc<dyn Notifier>,
    session: AdminSession,
    reconcile_policy: ReconcilePolicy,
}

impl<R: Resource> Clone for OptimisticMutator<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gateway: Arc::clone(&self.gateway),
            notifier: Arc::clone(&self.notifier),
            session: self.session.clone(),
            reconcile_policy: self.reconcile_policy,
        }
    }
}

impl<R: Resource> OptimisticMutator<R> {
    /// Creates a mutator over `store`.
    #[must_use]
    pub fn new(
        store: ListStore<R>,
        gateway: Arc<dyn ResourceGateway<R>>,
        notifier: Arc<dyn Notifier>,
        session: AdminSession,
        reconcile_policy: ReconcilePolicy,
    ) -> Self {
        Self {
            store,
            gateway,
            notifier,
            session,
            reconcile_policy,
        }
    }

    /// Returns the store this mutator edits.
    #[must_use]
    pub fn store(&self) -> &ListStore<R> {
        &self.store
    }

    /// Inserts a provisional record at the top, then creates it on the backend.
    pub async fn create(&self, input: R::Input) -> AppResult<R> {
        input.validate(MutationKind::Create)?;

        let provisional_id = RecordId::provisional();
        self.store
            .prepend(R::provisional(provisional_id, &input))
            .await;

        match self.gateway.create(&input).await {
            Ok(record) => {
                self.store
                    .settle_created(provisional_id, record.clone())
                    .await;
                info!(resource = R::LABEL, id = %record.id(), "record created");
                self.notify_success(MessageKey::Created).await;
                Ok(record)
            }
            Err(error) => {
                self.store.remove(provisional_id).await;
                self.notify_failure(MessageKey::CreateFailed, &error).await;
                Err(error)
            }
        }
    }

    /// Merges `input` into the record in place, then updates it on the backend.
    pub async fn update(&self, id: RecordId, input: R::Input) -> AppResult<R> {
        input.validate(MutationKind::Update)?;
        let existing = self.existing(id).await?;

        let snapshot = self.store.snapshot().await;
        let merged = existing.merged(&input);
        self.store.replace(id, merged.clone()).await;

        match self.gateway.update(id, &input).await {
            Ok(response) => {
                let record = match (self.reconcile_policy, response) {
                    (ReconcilePolicy::AdoptServer, Some(stored)) => {
                        self.store.replace(id, stored.clone()).await;
                        stored
                    }
                    _ => merged,
                };
                info!(resource = R::LABEL, id = %id, "record updated");
                self.notify_success(MessageKey::Updated).await;
                Ok(record)
            }
            Err(error) => {
                self.store.restore(snapshot).await;
                self.notify_failure(MessageKey::UpdateFailed, &error).await;
                Err(error)
            }
        }
    }

    /// Removes the record, then deletes it on the backend.
    pub async fn delete(&self, id: RecordId) -> AppResult<()> {
        self.existing(id).await?;

        let snapshot = self.store.snapshot().await;
        self.store.remove(id).await;

        match self.gateway.delete(id).await {
            Ok(()) => {
                info!(resource = R::LABEL, id = %id, "record deleted");
                self.notify_success(MessageKey::Deleted).await;
                Ok(())
            }
            Err(error) => {
                self.store.restore(snapshot).await;
                self.notify_failure(MessageKey::DeleteFailed, &error).await;
                Err(error)
            }
        }
    }

    async fn existing(&self, id: RecordId) -> AppResult<R> {
        if id.is_provisional() {
            return Err(AppError::Conflict(format!(
                "{} {id} is still being saved",
                R::LABEL
            )));
        }

        self.store
            .find(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("{} {id} is not in the list", R::LABEL)))
    }

    async fn notify_success(&self, key: MessageKey) {
        let language = self.session.language().await;
        self.notifier
            .notify(Notice::success(render(language, key, R::LABEL)));
    }

    async fn notify_failure(&self, key: MessageKey, error: &AppError) {
        warn!(resource = R::LABEL, error = %error, "optimistic write rolled back");
        let language = self.session.language().await;
        self.notifier
            .notify(Notice::error(render_failure(language, key, R::LABEL, error)));
    }
}
