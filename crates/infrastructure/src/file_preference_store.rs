use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use marketdesk_application::PreferenceStore;
use marketdesk_core::{AppError, AppResult, Language};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

/// JSON preferences file holding the interface language.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Creates a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> AppResult<Preferences> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|error| {
                AppError::Internal(format!(
                    "invalid preferences file '{}': {error}",
                    self.path.display()
                ))
            }),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Preferences::default()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read preferences file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn load_language(&self) -> AppResult<Option<Language>> {
        let preferences = self.read().await?;
        // An unknown value falls back to the default rather than blocking startup.
        Ok(preferences
            .language
            .and_then(|value| value.parse::<Language>().ok()))
    }

    async fn save_language(&self, language: Language) -> AppResult<()> {
        let mut preferences = self.read().await.unwrap_or_default();
        preferences.language = Some(language.as_str().to_owned());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create preferences directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let bytes = serde_json::to_vec_pretty(&preferences).map_err(|error| {
            AppError::Internal(format!("failed to serialize preferences: {error}"))
        })?;
        tokio::fs::write(&self.path, bytes).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write preferences file '{}': {error}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), language = language.as_str(), "preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir()
            .join(format!("marketdesk-{name}-{nanos}"))
            .join("preferences.json")
    }

    #[tokio::test]
    async fn missing_file_has_no_language() {
        let store = FilePreferenceStore::new(scratch_path("missing"));

        assert_eq!(store.load_language().await, Ok(None));
    }

    #[tokio::test]
    async fn saved_language_survives_a_new_store() {
        let path = scratch_path("saved");
        let store = FilePreferenceStore::new(path.clone());

        assert!(store.save_language(Language::Ar).await.is_ok());

        let reopened = FilePreferenceStore::new(path);
        assert_eq!(reopened.load_language().await, Ok(Some(Language::Ar)));
    }

    #[tokio::test]
    async fn unknown_language_is_ignored() {
        let path = scratch_path("unknown");
        let parent = path.parent().map(PathBuf::from).unwrap_or_default();
        assert!(tokio::fs::create_dir_all(&parent).await.is_ok());
        assert!(tokio::fs::write(&path, br#"{"language":"fr"}"#).await.is_ok());

        let store = FilePreferenceStore::new(path);

        assert_eq!(store.load_language().await, Ok(None));
    }
}
