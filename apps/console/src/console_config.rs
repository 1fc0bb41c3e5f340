use std::env;
use std::path::PathBuf;
use std::time::Duration;

use marketdesk_core::{AppError, AppResult, BearerToken, Language};
use url::Url;

#[derive(Debug, Clone)]
pub(crate) struct ConsoleConfig {
    pub(crate) api_base_url: Url,
    pub(crate) api_token: BearerToken,
    pub(crate) language: Option<Language>,
    pub(crate) preferences_path: PathBuf,
    pub(crate) http_timeout: Duration,
    pub(crate) toast_ttl: Duration,
}

impl ConsoleConfig {
    pub(crate) fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let raw_base_url = lookup("MARKETDESK_API_BASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "http://127.0.0.1:8000".to_owned());
        let api_base_url = Url::parse(raw_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid MARKETDESK_API_BASE_URL value '{raw_base_url}': {error}"
            ))
        })?;

        let api_token = lookup("MARKETDESK_API_TOKEN")
            .ok_or_else(|| AppError::Validation("MARKETDESK_API_TOKEN is required".to_owned()))
            .and_then(BearerToken::new)
            .map_err(|_| AppError::Validation("MARKETDESK_API_TOKEN is required".to_owned()))?;

        let language = lookup("MARKETDESK_LANGUAGE")
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.parse::<Language>())
            .transpose()
            .map_err(|error| {
                AppError::Validation(format!("invalid MARKETDESK_LANGUAGE value: {error}"))
            })?;

        let preferences_path = lookup("MARKETDESK_PREFERENCES_PATH")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(".marketdesk/preferences.json"), PathBuf::from);

        let http_timeout_secs = parse_u64(&lookup, "MARKETDESK_HTTP_TIMEOUT_SECS", 15)?;
        let toast_ttl_ms = parse_u64(&lookup, "MARKETDESK_TOAST_TTL_MS", 3000)?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "MARKETDESK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        if toast_ttl_ms == 0 {
            return Err(AppError::Validation(
                "MARKETDESK_TOAST_TTL_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token,
            language,
            preferences_path,
            http_timeout: Duration::from_secs(http_timeout_secs),
            toast_ttl: Duration::from_millis(toast_ttl_ms),
        })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
