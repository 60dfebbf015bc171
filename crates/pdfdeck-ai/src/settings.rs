//! File-backed settings for the AI features.
//!
//! One JSON file holds the API key, the selected model, and the consent
//! flag. The store is an explicit value passed to whoever needs it; it is
//! loaded once and every setter persists before updating the in-memory
//! record, so the file never lags behind what callers observe.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Model used when the settings file does not name one.
pub const DEFAULT_GEMINI_MODEL: &str = "models/gemini-1.5-pro";

/// Stored settings record. Key names match the original client app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    pub selected_gemini_model: String,
    #[serde(rename = "userConsentForAI")]
    pub user_consent_for_ai: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            gemini_api_key: None,
            selected_gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            user_consent_for_ai: false,
        }
    }
}

/// Settings bound to their backing file.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load the store from `path`. A missing file yields defaults; a file
    /// that exists but cannot be read or parsed is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, AiError> {
        let path = path.into();
        let settings = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AiError::Storage(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(AiError::Storage(format!("{}: {}", path.display(), e))),
        };
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(SettingsStore { path, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store the API key, or remove it when `key` is `None` or empty.
    pub fn set_api_key(&mut self, key: Option<String>) -> Result<(), AiError> {
        let mut updated = self.settings.clone();
        updated.gemini_api_key = key.filter(|k| !k.is_empty());
        self.persist(&updated)?;
        self.settings = updated;
        Ok(())
    }

    pub fn set_model(&mut self, model: String) -> Result<(), AiError> {
        let mut updated = self.settings.clone();
        updated.selected_gemini_model = model;
        self.persist(&updated)?;
        self.settings = updated;
        Ok(())
    }

    pub fn set_consent(&mut self, consent: bool) -> Result<(), AiError> {
        let mut updated = self.settings.clone();
        updated.user_consent_for_ai = consent;
        self.persist(&updated)?;
        self.settings = updated;
        Ok(())
    }

    fn persist(&self, settings: &Settings) -> Result<(), AiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AiError::Storage(format!("{}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| AiError::Storage(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| AiError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("settings.json")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(store_path(&dir)).unwrap();

        assert_eq!(store.settings().gemini_api_key, None);
        assert_eq!(store.settings().selected_gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(!store.settings().user_consent_for_ai);
    }

    #[test]
    fn test_set_api_key_persists_across_reload() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SettingsStore::load(&path).unwrap();
        store.set_api_key(Some("secret-key".into())).unwrap();

        let reloaded = SettingsStore::load(&path).unwrap();
        assert_eq!(
            reloaded.settings().gemini_api_key.as_deref(),
            Some("secret-key")
        );
    }

    #[test]
    fn test_clearing_api_key_removes_it_from_file() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SettingsStore::load(&path).unwrap();
        store.set_api_key(Some("secret-key".into())).unwrap();
        store.set_api_key(None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("geminiApiKey"));
        assert_eq!(
            SettingsStore::load(&path).unwrap().settings().gemini_api_key,
            None
        );
    }

    #[test]
    fn test_empty_api_key_counts_as_removal() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SettingsStore::load(&path).unwrap();
        store.set_api_key(Some(String::new())).unwrap();

        assert_eq!(store.settings().gemini_api_key, None);
    }

    #[test]
    fn test_model_and_consent_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SettingsStore::load(&path).unwrap();
        store.set_model("models/gemini-1.5-flash".into()).unwrap();
        store.set_consent(true).unwrap();

        let reloaded = SettingsStore::load(&path).unwrap();
        assert_eq!(
            reloaded.settings().selected_gemini_model,
            "models/gemini-1.5-flash"
        );
        assert!(reloaded.settings().user_consent_for_ai);
    }

    #[test]
    fn test_file_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = SettingsStore::load(&path).unwrap();
        store.set_consent(true).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("selectedGeminiModel"));
        assert!(raw.contains("userConsentForAI"));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, b"not json").unwrap();

        assert!(matches!(
            SettingsStore::load(&path),
            Err(AiError::Storage(_))
        ));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, br#"{"userConsentForAI":true}"#).unwrap();

        let store = SettingsStore::load(&path).unwrap();
        assert!(store.settings().user_consent_for_ai);
        assert_eq!(store.settings().selected_gemini_model, DEFAULT_GEMINI_MODEL);
    }
}
