//! Stored-settings subcommands.

use anyhow::Result;

use crate::state::AppState;

pub fn show(state: &AppState) -> Result<()> {
    let settings = state.settings.settings();
    let key_status = if std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        "set (from GEMINI_API_KEY)"
    } else if settings.gemini_api_key.is_some() {
        "set"
    } else {
        "not set"
    };
    println!("API key: {key_status}");
    println!("Model:   {}", settings.selected_gemini_model);
    println!("Consent: {}", settings.user_consent_for_ai);
    println!("File:    {}", state.settings.path().display());
    Ok(())
}

pub fn set_key(state: &mut AppState, key: String) -> Result<()> {
    state.settings.set_api_key(Some(key))?;
    println!("API key stored");
    Ok(())
}

pub fn clear_key(state: &mut AppState) -> Result<()> {
    state.settings.set_api_key(None)?;
    println!("API key removed");
    Ok(())
}

pub fn set_model(state: &mut AppState, model: String) -> Result<()> {
    state.settings.set_model(model)?;
    println!("Model set to {}", state.settings.settings().selected_gemini_model);
    Ok(())
}

pub fn consent(state: &mut AppState, enabled: bool) -> Result<()> {
    state.settings.set_consent(enabled)?;
    if enabled {
        println!("AI features enabled");
    } else {
        println!("AI features disabled");
    }
    Ok(())
}
