use async_trait::async_trait;
use marketdesk_application::{ListScope, RecordSource, SubscriptionReviewGateway};
use marketdesk_core::{AppResult, RecordId};
use marketdesk_domain::{ReviewDecision, SubscriptionRequest};
use reqwest::Method;
use serde_json::json;

use crate::http_api_client::{HttpApiClient, Payload};
use crate::http_resource_gateway::{SUBSCRIPTION_REQUESTS_PATH, decode_list, decode_record};

/// REST adapter for reviewing supplier subscription requests.
pub struct HttpSubscriptionReviewGateway {
    client: HttpApiClient,
}

impl HttpSubscriptionReviewGateway {
    /// Creates the adapter.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordSource<SubscriptionRequest> for HttpSubscriptionReviewGateway {
    async fn list(&self, scope: &ListScope) -> AppResult<Vec<SubscriptionRequest>> {
        let url = self.client.endpoint(SUBSCRIPTION_REQUESTS_PATH, scope)?;
        let body = self.client.send(Method::GET, url, Payload::Empty).await?;
        decode_list(SUBSCRIPTION_REQUESTS_PATH, body)
    }
}

#[async_trait]
impl SubscriptionReviewGateway for HttpSubscriptionReviewGateway {
    async fn decide(
        &self,
        id: RecordId,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> AppResult<Option<SubscriptionRequest>> {
        let path = format!("{SUBSCRIPTION_REQUESTS_PATH}/{id}/{}", decision.as_str());
        let url = self.client.endpoint(path.as_str(), &ListScope::all())?;
        let payload = match (decision, reason) {
            (ReviewDecision::Reject, Some(reason)) => Payload::Json(json!({ "reason": reason })),
            _ => Payload::Empty,
        };
        let body = self.client.send(Method::POST, url, payload).await?;
        Ok(decode_record(path.as_str(), body))
    }
}
