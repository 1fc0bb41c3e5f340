use std::sync::Arc;

use marketdesk_core::{AppError, AppResult, BearerToken, Language};
use tokio::sync::RwLock;
use tracing::info;

use crate::screen_ports::PreferenceStore;

#[derive(Debug, Clone)]
struct SessionState {
    token: BearerToken,
    language: Language,
}

/// Process-wide admin session: bearer token plus interface language.
///
/// Created once at startup, started after sign-in and ended on logout. Every
/// gateway and screen receives a clone of the handle explicitly.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    state: Arc<RwLock<Option<SessionState>>>,
}

impl AdminSession {
    /// Creates a handle with no active session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session, replacing any previous one.
    pub async fn start(&self, token: BearerToken, language: Language) {
        *self.state.write().await = Some(SessionState { token, language });
        info!(language = language.as_str(), "admin session started");
    }

    /// Starts a session using the saved language when no override is given.
    pub async fn start_with_preferences(
        &self,
        token: BearerToken,
        language_override: Option<Language>,
        preferences: &dyn PreferenceStore,
    ) -> AppResult<Language> {
        let language = match language_override {
            Some(language) => language,
            None => preferences.load_language().await?.unwrap_or_default(),
        };
        self.start(token, language).await;
        Ok(language)
    }

    /// Ends the session. Later requests fail with `Unauthorized`.
    pub async fn end(&self) {
        if self.state.write().await.take().is_some() {
            info!("admin session ended");
        }
    }

    /// Returns whether a session is active.
    pub async fn is_active(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Returns the bearer token of the active session.
    pub async fn bearer_token(&self) -> AppResult<BearerToken> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|state| state.token.clone())
            .ok_or_else(|| AppError::Unauthorized("no active admin session".to_owned()))
    }

    /// Returns the interface language, English when signed out.
    pub async fn language(&self) -> Language {
        self.state
            .read()
            .await
            .as_ref()
            .map(|state| state.language)
            .unwrap_or_default()
    }

    /// Switches the interface language and persists the choice.
    pub async fn set_language(
        &self,
        language: Language,
        preferences: &dyn PreferenceStore,
    ) -> AppResult<()> {
        preferences.save_language(language).await?;
        if let Some(state) = self.state.write().await.as_mut() {
            state.language = language;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakePreferenceStore {
        language: Mutex<Option<Language>>,
    }

    #[async_trait]
    impl PreferenceStore for FakePreferenceStore {
        async fn load_language(&self) -> AppResult<Option<Language>> {
            Ok(*self.language.lock().await)
        }

        async fn save_language(&self, language: Language) -> AppResult<()> {
            *self.language.lock().await = Some(language);
            Ok(())
        }
    }

    fn token() -> BearerToken {
        BearerToken::new("token-1").unwrap_or_else(|_| panic!("test"))
    }

    #[tokio::test]
    async fn signed_out_session_has_no_token() {
        let session = AdminSession::new();
        assert!(matches!(
            session.bearer_token().await,
            Err(AppError::Unauthorized(_))
        ));
        assert_eq!(session.language().await, Language::En);
    }

    #[tokio::test]
    async fn end_clears_token() {
        let session = AdminSession::new();
        session.start(token(), Language::Ar).await;
        assert!(session.bearer_token().await.is_ok());
        session.end().await;
        assert!(!session.is_active().await);
        assert!(session.bearer_token().await.is_err());
    }

    #[tokio::test]
    async fn saved_language_is_used_without_override() {
        let preferences = FakePreferenceStore::default();
        preferences.save_language(Language::Ar).await.ok();
        let session = AdminSession::new();

        let language = session
            .start_with_preferences(token(), None, &preferences)
            .await;

        assert_eq!(language, Ok(Language::Ar));
    }

    #[tokio::test]
    async fn set_language_persists_choice() {
        let preferences = FakePreferenceStore::default();
        let session = AdminSession::new();
        session.start(token(), Language::En).await;

        let result = session.set_language(Language::Ar, &preferences).await;

        assert!(result.is_ok());
        assert_eq!(session.language().await, Language::Ar);
        assert_eq!(*preferences.language.lock().await, Some(Language::Ar));
    }
}
