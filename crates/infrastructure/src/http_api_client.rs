use marketdesk_application::{AdminSession, ListScope};
use marketdesk_core::{AppError, AppResult};
use marketdesk_domain::UploadFile;
use reqwest::{Method, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Request body sent to the backend.
pub(crate) enum Payload {
    /// No body.
    Empty,
    /// JSON document.
    Json(Value),
    /// Form-data with one attached file.
    Multipart(reqwest::multipart::Form),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Authenticated JSON client for the marketplace backend.
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    session: AdminSession,
}

impl HttpApiClient {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url, session: AdminSession) -> Self {
        Self {
            http_client,
            base_url,
            session,
        }
    }

    /// Returns the backend root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL below the base, keeping any base path prefix.
    pub(crate) fn endpoint(&self, path: &str, scope: &ListScope) -> AppResult<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(raw.as_str())
            .map_err(|error| AppError::Internal(format!("invalid endpoint '{raw}': {error}")))?;

        if !scope.params().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in scope.params() {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Sends one request and returns the unwrapped response body, if any.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Payload,
    ) -> AppResult<Option<Value>> {
        let token = self.session.bearer_token().await?;
        let endpoint = url.to_string();
        let builder = self
            .http_client
            .request(method.clone(), url)
            .header(header::AUTHORIZATION, token.header_value())
            .header(header::ACCEPT, "application/json");
        let builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|error| {
            AppError::Internal(format!("failed to call {method} {endpoint}: {error}"))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read response body from {method} {endpoint}: {error}"
            ))
        })?;
        debug!(
            method = %method,
            endpoint = %endpoint,
            status = status.as_u16(),
            "backend call completed"
        );

        if !status.is_success() {
            return Err(status_error(status, body.as_str()));
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str::<Value>(body.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to parse response body from {method} {endpoint}: {error}"
            ))
        })?;

        Ok(Some(unwrap_envelope(value)))
    }
}

/// Unwraps `{"data": ...}` envelopes; bare values pass through.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map)
            if map
                .get("data")
                .is_some_and(|data| data.is_array() || data.is_object()) =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Maps a failed HTTP status to the shared error taxonomy.
pub(crate) fn status_error(status: StatusCode, body: &str) -> AppError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| error.message.or(error.error))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("backend returned status {}", status.as_u16())
            } else {
                format!("backend returned status {}: {trimmed}", status.as_u16())
            }
        });

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(detail),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(detail),
        StatusCode::FORBIDDEN => AppError::Forbidden(detail),
        StatusCode::NOT_FOUND => AppError::NotFound(detail),
        StatusCode::CONFLICT => AppError::Conflict(detail),
        _ => AppError::Internal(detail),
    }
}

/// Builds a multipart form from a serialized input object and its file.
pub(crate) fn multipart_form(
    fields: &Value,
    upload: (&'static str, &UploadFile),
    method_override: Option<&str>,
) -> AppResult<reqwest::multipart::Form> {
    let object = fields.as_object().ok_or_else(|| {
        AppError::Internal("multipart payload must serialize to an object".to_owned())
    })?;

    let mut form = reqwest::multipart::Form::new();
    for (key, value) in object {
        if let Some(text) = form_text(value) {
            form = form.text(key.clone(), text);
        }
    }

    if let Some(method) = method_override {
        form = form.text("_method", method.to_owned());
    }

    let (field, file) = upload;
    let part = reqwest::multipart::Part::bytes(file.bytes().to_vec())
        .file_name(file.file_name().to_owned())
        .mime_str(file.content_type())
        .map_err(|error| {
            AppError::Validation(format!(
                "invalid content type '{}': {error}",
                file.content_type()
            ))
        })?;

    Ok(form.part(field, part))
}

/// Renders one JSON value as a form-data text field.
pub(crate) fn form_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(if *flag { "1" } else { "0" }.to_owned()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
