//! Hand-written port fakes shared by service tests.

use std::sync::Arc;

use async_trait::async_trait;
use marketdesk_core::{AppError, AppResult, RecordId};
use marketdesk_domain::{
    Admin, AdminInput, AdminRole, Category, NamedRef, RequestStatus, Resource, ReviewDecision,
    SubscriptionRequest,
};
use tokio::sync::{Mutex, Notify};

use crate::screen_ports::{
    ListScope, Notice, NoticeLevel, Notifier, RecordSource, ResourceGateway,
    SubscriptionReviewGateway,
};

/// Blocks the next gateway call until released.
#[derive(Clone, Default)]
pub struct CallGate {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl CallGate {
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.started.notify_one();
        self.release.notified().await;
    }
}

struct FakeGatewayState<R> {
    records: Vec<R>,
    failures: Vec<AppError>,
    gate: Option<CallGate>,
    next_id: i64,
    update_returns_record: bool,
    update_rewrite: Option<fn(&mut R)>,
    calls: Vec<String>,
    scopes: Vec<ListScope>,
}

/// In-memory backend with failure injection.
pub struct FakeGateway<R> {
    state: Arc<Mutex<FakeGatewayState<R>>>,
}

impl<R> Clone for FakeGateway<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: Resource> FakeGateway<R> {
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeGatewayState {
                records,
                failures: Vec::new(),
                gate: None,
                next_id: 42,
                update_returns_record: true,
                update_rewrite: None,
                calls: Vec::new(),
                scopes: Vec::new(),
            })),
        }
    }

    pub async fn records(&self) -> Vec<R> {
        self.state.lock().await.records.clone()
    }

    pub async fn set_records(&self, records: Vec<R>) {
        self.state.lock().await.records = records;
    }

    pub async fn fail_next(&self, error: AppError) {
        self.state.lock().await.failures.push(error);
    }

    pub async fn hold_next_call(&self) -> CallGate {
        let gate = CallGate::default();
        self.state.lock().await.gate = Some(gate.clone());
        gate
    }

    pub async fn set_update_returns_record(&self, value: bool) {
        self.state.lock().await.update_returns_record = value;
    }

    /// Applies `rewrite` to every stored update, like a backend normalizing input.
    pub async fn set_update_rewrite(&self, rewrite: fn(&mut R)) {
        self.state.lock().await.update_rewrite = Some(rewrite);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn scopes(&self) -> Vec<ListScope> {
        self.state.lock().await.scopes.clone()
    }

    async fn begin(&self, call: String) -> AppResult<()> {
        let gate = {
            let mut state = self.state.lock().await;
            state.calls.push(call);
            state.gate.take()
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }

        let mut state = self.state.lock().await;
        if state.failures.is_empty() {
            Ok(())
        } else {
            Err(state.failures.remove(0))
        }
    }
}

#[async_trait]
impl<R: Resource> RecordSource<R> for FakeGateway<R> {
    async fn list(&self, scope: &ListScope) -> AppResult<Vec<R>> {
        self.state.lock().await.scopes.push(scope.clone());
        self.begin("list".to_owned()).await?;
        Ok(self.state.lock().await.records.clone())
    }
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for FakeGateway<R> {
    async fn create(&self, input: &R::Input) -> AppResult<R> {
        self.begin("create".to_owned()).await?;
        let mut state = self.state.lock().await;
        let record = R::provisional(RecordId::new(state.next_id), input);
        state.next_id += 1;
        state.records.insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, id: RecordId, input: &R::Input) -> AppResult<Option<R>> {
        self.begin(format!("update:{id}")).await?;
        let mut state = self.state.lock().await;
        let returns_record = state.update_returns_record;
        let rewrite = state.update_rewrite;
        let Some(existing) = state.records.iter_mut().find(|record| record.id() == id) else {
            return Err(AppError::NotFound(format!("record {id}")));
        };
        *existing = existing.merged(input);
        if let Some(rewrite) = rewrite {
            rewrite(existing);
        }
        Ok(returns_record.then(|| existing.clone()))
    }

    async fn delete(&self, id: RecordId) -> AppResult<()> {
        self.begin(format!("delete:{id}")).await?;
        self.state
            .lock()
            .await
            .records
            .retain(|record| record.id() != id);
        Ok(())
    }
}

/// Review fake with its own request list.
#[derive(Clone)]
pub struct FakeRequestBackend {
    requests: Arc<Mutex<Vec<SubscriptionRequest>>>,
    failures: Arc<Mutex<Vec<AppError>>>,
    decisions: Arc<Mutex<Vec<(RecordId, ReviewDecision, Option<String>)>>>,
}

impl FakeRequestBackend {
    pub fn with_requests(requests: Vec<SubscriptionRequest>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(requests)),
            failures: Arc::new(Mutex::new(Vec::new())),
            decisions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn fail_next(&self, error: AppError) {
        self.failures.lock().await.push(error);
    }

    pub async fn decisions(&self) -> Vec<(RecordId, ReviewDecision, Option<String>)> {
        self.decisions.lock().await.clone()
    }

    async fn take_failure(&self) -> AppResult<()> {
        let mut failures = self.failures.lock().await;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.remove(0))
        }
    }
}

#[async_trait]
impl RecordSource<SubscriptionRequest> for FakeRequestBackend {
    async fn list(&self, _scope: &ListScope) -> AppResult<Vec<SubscriptionRequest>> {
        self.take_failure().await?;
        Ok(self.requests.lock().await.clone())
    }
}

#[async_trait]
impl SubscriptionReviewGateway for FakeRequestBackend {
    async fn decide(
        &self,
        id: RecordId,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> AppResult<Option<SubscriptionRequest>> {
        self.decisions
            .lock()
            .await
            .push((id, decision, reason.map(str::to_owned)));
        self.take_failure().await?;
        let mut requests = self.requests.lock().await;
        let Some(request) = requests.iter_mut().find(|request| request.id == id) else {
            return Err(AppError::NotFound(format!("request {id}")));
        };
        *request = request.decided(decision, reason)?;
        Ok(Some(request.clone()))
    }
}

/// Notifier that records every notice.
#[derive(Default)]
pub struct FakeNotifier {
    notices: std::sync::Mutex<Vec<Notice>>,
}

impl FakeNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices().into_iter().map(|notice| notice.level).collect()
    }
}

impl Notifier for FakeNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id: RecordId::new(id),
        name: name.to_owned(),
        name_ar: format!("{name}-ar"),
        icon: None,
        is_active: true,
    }
}

pub fn admin(id: i64, name: &str) -> Admin {
    Admin {
        id: RecordId::new(id),
        name: name.to_owned(),
        email: format!("{}@x.com", name.to_lowercase().replace(' ', ".")),
        phone: Some("01234567890".to_owned()),
        role: AdminRole::Admin,
        is_active: true,
    }
}

pub fn jane_input() -> AdminInput {
    AdminInput {
        name: "Jane Doe".to_owned(),
        email: "jane@x.com".to_owned(),
        phone: "01234567890".to_owned(),
        password: Some("Abc12345!".to_owned()),
        role: AdminRole::Admin,
        is_active: true,
    }
}

pub fn pending_request(id: i64) -> SubscriptionRequest {
    SubscriptionRequest {
        id: RecordId::new(id),
        supplier: NamedRef {
            id: RecordId::new(100 + id),
            name: format!("Supplier {id}"),
        },
        plan: NamedRef {
            id: RecordId::new(1),
            name: "Pro".to_owned(),
        },
        status: RequestStatus::Pending,
        months_requested: 3,
        payment_proof: Some(format!("/proofs/{id}.pdf")),
        rejection_reason: None,
        created_at: None,
    }
}
