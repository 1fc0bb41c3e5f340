use std::marker::PhantomData;

use async_trait::async_trait;
use marketdesk_application::{ListScope, RecordSource, ResourceGateway};
use marketdesk_core::{AppError, AppResult, RecordId};
use marketdesk_domain::{Record, Resource, ResourceInput};
use reqwest::Method;
use serde_json::Value;
use tracing::warn;

use crate::http_api_client::{HttpApiClient, Payload, multipart_form};

/// Admin accounts collection.
pub const ADMINS_PATH: &str = "/api/admin/admins";
/// Product categories collection.
pub const CATEGORIES_PATH: &str = "/api/v1/categories";
/// Governorate lookup collection.
pub const GOVERNORATES_PATH: &str = "/api/v1/governorates";
/// Delivery areas collection, scoped by `governorate_id`.
pub const AREAS_PATH: &str = "/api/v1/areas";
/// Subscription plans collection.
pub const PLANS_PATH: &str = "/api/admin/plans";
/// Supplier subscriptions collection.
pub const SUBSCRIPTIONS_PATH: &str = "/api/admin/subscriptions";
/// Supplier subscription requests collection.
pub const SUBSCRIPTION_REQUESTS_PATH: &str = "/api/admin/subscription-requests";

/// REST adapter for one backend collection.
pub struct HttpResourceGateway<R> {
    client: HttpApiClient,
    path: &'static str,
    record: PhantomData<fn() -> R>,
}

impl<R> HttpResourceGateway<R> {
    /// Creates a gateway for the collection at `path`.
    #[must_use]
    pub fn new(client: HttpApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            record: PhantomData,
        }
    }

    fn member_path(&self, id: RecordId) -> String {
        format!("{}/{id}", self.path)
    }
}

pub(crate) fn decode_list<R: Record>(path: &str, body: Option<Value>) -> AppResult<Vec<R>> {
    let Some(body) = body else {
        return Ok(Vec::new());
    };

    serde_json::from_value(body).map_err(|error| {
        AppError::Internal(format!("failed to decode {} list from {path}: {error}", R::LABEL))
    })
}

/// Decodes a single record; `None` when the body is absent or not a record.
pub(crate) fn decode_record<R: Record>(path: &str, body: Option<Value>) -> Option<R> {
    let body = body?;
    match serde_json::from_value(body) {
        Ok(record) => Some(record),
        Err(error) => {
            warn!(
                resource = R::LABEL,
                path = path,
                error = %error,
                "backend response is not a record"
            );
            None
        }
    }
}

fn request_payload<I: ResourceInput>(
    input: &I,
    method_override: Option<&str>,
) -> AppResult<Payload> {
    let fields = serde_json::to_value(input).map_err(|error| {
        AppError::Internal(format!("failed to serialize form payload: {error}"))
    })?;

    match input.upload() {
        Some(upload) => Ok(Payload::Multipart(multipart_form(
            &fields,
            upload,
            method_override,
        )?)),
        None => Ok(Payload::Json(fields)),
    }
}

#[async_trait]
impl<R: Record> RecordSource<R> for HttpResourceGateway<R> {
    async fn list(&self, scope: &ListScope) -> AppResult<Vec<R>> {
        let url = self.client.endpoint(self.path, scope)?;
        let body = self.client.send(Method::GET, url, Payload::Empty).await?;
        decode_list(self.path, body)
    }
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for HttpResourceGateway<R> {
    async fn create(&self, input: &R::Input) -> AppResult<R> {
        let url = self.client.endpoint(self.path, &ListScope::all())?;
        let body = self
            .client
            .send(Method::POST, url, request_payload(input, None)?)
            .await?;

        decode_record::<R>(self.path, body).ok_or_else(|| {
            AppError::Internal(format!(
                "backend did not return the created {} from {}",
                R::LABEL,
                self.path
            ))
        })
    }

    async fn update(&self, id: RecordId, input: &R::Input) -> AppResult<Option<R>> {
        let path = self.member_path(id);
        let url = self.client.endpoint(path.as_str(), &ListScope::all())?;
        // Form-data cannot travel over PUT on the backend; it reads `_method` instead.
        let (method, payload) = match input.upload() {
            Some(_) => (Method::POST, request_payload(input, Some("PUT"))?),
            None => (Method::PUT, request_payload(input, None)?),
        };
        let body = self.client.send(method, url, payload).await?;
        Ok(decode_record(path.as_str(), body))
    }

    async fn delete(&self, id: RecordId) -> AppResult<()> {
        let path = self.member_path(id);
        let url = self.client.endpoint(path.as_str(), &ListScope::all())?;
        self.client.send(Method::DELETE, url, Payload::Empty).await?;
        Ok(())
    }
}
