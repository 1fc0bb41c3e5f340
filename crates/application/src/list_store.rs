use std::sync::Arc;

use marketdesk_core::{AppResult, RecordId};
use marketdesk_domain::{Queryable, Record, ViewQuery, project};
use tokio::sync::RwLock;
use tracing::debug;

use crate::screen_ports::{ListScope, RecordSource};

/// What a failed fetch does to the records already on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchFailurePolicy {
    /// Keep showing the previous records.
    #[default]
    KeepPrevious,
    /// Show an empty list.
    Clear,
}

/// Result of a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched records replaced the list.
    Applied {
        /// Number of records now in the list.
        count: usize,
    },
    /// A newer fetch started, or the store was detached, before this one finished.
    Discarded,
}

#[derive(Debug)]
struct ListState<R> {
    records: Vec<R>,
    loading: bool,
    generation: u64,
    detached: bool,
}

/// Client-side copy of one backend collection plus its loading flag.
///
/// Clones share the same list. The lock is never held across a network call,
/// so readers see speculative edits while requests are in flight.
#[derive(Debug)]
pub struct ListStore<R> {
    state: Arc<RwLock<ListState<R>>>,
    failure_policy: FetchFailurePolicy,
}

impl<R> Clone for ListStore<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            failure_policy: self.failure_policy,
        }
    }
}

impl<R: Record> Default for ListStore<R> {
    fn default() -> Self {
        Self::new(FetchFailurePolicy::default())
    }
}

impl<R: Record> ListStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new(failure_policy: FetchFailurePolicy) -> Self {
        Self::with_records(Vec::new(), failure_policy)
    }

    /// Creates a store pre-filled with records.
    #[must_use]
    pub fn with_records(records: Vec<R>, failure_policy: FetchFailurePolicy) -> Self {
        Self {
            state: Arc::new(RwLock::new(ListState {
                records,
                loading: false,
                generation: 0,
                detached: false,
            })),
            failure_policy,
        }
    }

    /// Returns the failure policy.
    #[must_use]
    pub fn failure_policy(&self) -> FetchFailurePolicy {
        self.failure_policy
    }

    /// Fetches the collection and replaces the whole list.
    ///
    /// The loading flag is set for the duration of the fetch. On failure the
    /// list is kept or cleared per [`FetchFailurePolicy`] and the error returned.
    pub async fn load<S>(&self, source: &S, scope: &ListScope) -> AppResult<LoadOutcome>
    where
        S: RecordSource<R> + ?Sized,
    {
        let generation = {
            let mut state = self.state.write().await;
            state.generation = state.generation.wrapping_add(1);
            state.loading = true;
            state.generation
        };

        let result = source.list(scope).await;

        let mut state = self.state.write().await;
        if state.detached || state.generation != generation {
            debug!(
                resource = R::LABEL,
                generation,
                current_generation = state.generation,
                "discarded stale list response"
            );
            return match result {
                Ok(_) => Ok(LoadOutcome::Discarded),
                Err(error) => Err(error),
            };
        }

        state.loading = false;
        match result {
            Ok(records) => {
                state.records = records;
                Ok(LoadOutcome::Applied {
                    count: state.records.len(),
                })
            }
            Err(error) => {
                if self.failure_policy == FetchFailurePolicy::Clear {
                    state.records.clear();
                }
                Err(error)
            }
        }
    }

    /// Stops accepting changes; late responses are dropped.
    pub async fn detach(&self) {
        let mut state = self.state.write().await;
        state.detached = true;
        state.loading = false;
    }

    /// Returns whether the store was detached.
    pub async fn is_detached(&self) -> bool {
        self.state.read().await.detached
    }

    /// Returns whether a fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Returns a copy of the current list.
    pub async fn snapshot(&self) -> Vec<R> {
        self.state.read().await.records.clone()
    }

    /// Returns the number of records.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Returns whether the list is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Returns the record with `id`, if present.
    pub async fn find(&self, id: RecordId) -> Option<R> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Derives the filtered, sorted display list.
    pub async fn view(&self, query: &ViewQuery<<R as Queryable>::Field>) -> Vec<R> {
        project(&self.state.read().await.records, query)
    }

    /// Inserts a record at the top of the list.
    pub(crate) async fn prepend(&self, record: R) {
        let mut state = self.state.write().await;
        if !state.detached {
            state.records.insert(0, record);
        }
    }

    /// Replaces the record with `id` in place. Returns whether one was found.
    pub(crate) async fn replace(&self, id: RecordId, record: R) -> bool {
        let mut state = self.state.write().await;
        if state.detached {
            return false;
        }

        match state.records.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Swaps the provisional record for the created one.
    ///
    /// When a refresh already replaced the list, the created record goes on top
    /// unless the refreshed list holds it.
    pub(crate) async fn settle_created(&self, provisional_id: RecordId, record: R) {
        let mut state = self.state.write().await;
        if state.detached {
            return;
        }

        let created_id = record.id();
        if let Some(position) = state
            .records
            .iter()
            .position(|existing| existing.id() == provisional_id)
        {
            state.records[position] = record;
            return;
        }

        if state.records.iter().all(|existing| existing.id() != created_id) {
            debug!(
                resource = R::LABEL,
                id = %created_id,
                "created record reinserted after refresh"
            );
            state.records.insert(0, record);
        }
    }

    /// Removes the record with `id`. Returns whether one was found.
    pub(crate) async fn remove(&self, id: RecordId) -> bool {
        let mut state = self.state.write().await;
        if state.detached {
            return false;
        }

        let before = state.records.len();
        state.records.retain(|record| record.id() != id);
        state.records.len() != before
    }

    /// Restores a previously captured list.
    pub(crate) async fn restore(&self, records: Vec<R>) {
        let mut state = self.state.write().await;
        if !state.detached {
            state.records = records;
        }
    }
}
