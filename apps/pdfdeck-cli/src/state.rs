//! Shared CLI state: the storage workspace and the settings store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pdfdeck_ai::{GeminiClient, SettingsStore};
use pdfdeck_core::{Workspace, DEFAULT_TEMP_MAX_AGE};

pub struct AppState {
    pub workspace: Workspace,
    pub settings: SettingsStore,
}

impl AppState {
    /// Resolve directories, load settings, and reclaim stale temp files.
    pub fn init(storage_dir: Option<PathBuf>) -> Result<Self> {
        let root = storage_dir.unwrap_or_else(default_storage_dir);
        let workspace = Workspace::new(root);
        workspace
            .ensure_dirs()
            .context("failed to create storage directories")?;
        let swept = workspace.sweep_expired(DEFAULT_TEMP_MAX_AGE);
        tracing::debug!(swept, root = %workspace.root().display(), "workspace ready");

        let settings =
            SettingsStore::load(settings_path()).context("failed to load settings")?;
        Ok(AppState {
            workspace,
            settings,
        })
    }

    /// The API key, with `GEMINI_API_KEY` taking precedence over the
    /// stored one.
    pub fn api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.settings.settings().gemini_api_key.clone())
    }

    /// Refuse to run AI commands until consent has been recorded.
    pub fn ensure_ai_consent(&self) -> Result<()> {
        if self.settings.settings().user_consent_for_ai {
            Ok(())
        } else {
            anyhow::bail!(
                "AI features are disabled. Run `pdfdeck settings consent true` to allow sending document text to Gemini."
            )
        }
    }

    /// Build a Gemini client from the stored key and model.
    pub fn client(&self) -> Result<GeminiClient> {
        let key = self.api_key().unwrap_or_default();
        let model = self.settings.settings().selected_gemini_model.clone();
        Ok(GeminiClient::new(key, model)?)
    }
}

fn default_storage_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("pdfdeck")
    } else {
        PathBuf::from(".pdfdeck")
    }
}

fn settings_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("pdfdeck").join("settings.json")
    } else {
        PathBuf::from(".pdfdeck").join("settings.json")
    }
}
