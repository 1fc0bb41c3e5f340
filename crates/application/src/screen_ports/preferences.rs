use async_trait::async_trait;
use marketdesk_core::{AppResult, Language};

/// Port for the one durable client-side preference: interface language.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the saved language, if any.
    async fn load_language(&self) -> AppResult<Option<Language>>;

    /// Saves the selected language.
    async fn save_language(&self, language: Language) -> AppResult<()>;
}
