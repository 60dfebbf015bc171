//! Gemini-assisted reading subcommands.
//!
//! Everything except `extract-text` sends document text to the Gemini
//! API, so those commands check recorded consent first and need an API
//! key (stored or `GEMINI_API_KEY`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pdfdeck_ai::{
    chunk_text, extract_text_from_file, label_chunks, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};

use crate::commands::display_name;
use crate::state::AppState;

pub fn extract_text(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let text = extract_text_from_file(file)?;
    match output {
        Some(path) => {
            fs::write(&path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub async fn summarize(state: &AppState, file: &Path) -> Result<()> {
    state.ensure_ai_consent()?;
    let client = state.client()?;
    let text = extract_text_from_file(file)?;
    let summary = client.summarize(&text).await?;
    println!("{summary}");
    Ok(())
}

pub async fn translate(state: &AppState, file: &Path, language: &str) -> Result<()> {
    state.ensure_ai_consent()?;
    let client = state.client()?;
    let text = extract_text_from_file(file)?;
    let translation = client.translate(&text, language).await?;
    println!("{translation}");
    Ok(())
}

pub async fn questions(state: &AppState, file: &Path, count: usize) -> Result<()> {
    state.ensure_ai_consent()?;
    let client = state.client()?;
    let text = extract_text_from_file(file)?;
    let questions = client.generate_questions(&text, count).await?;
    for (i, question) in questions.iter().enumerate() {
        println!("{}. {}", i + 1, question);
    }
    Ok(())
}

pub async fn ask(state: &AppState, file: &Path, prompt: &str) -> Result<()> {
    state.ensure_ai_consent()?;
    let client = state.client()?;
    let text = extract_text_from_file(file)?;
    let chunks = chunk_text(&text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP);
    let labeled = label_chunks(display_name(file), &chunks);
    tracing::debug!(chunks = labeled.len(), "sending document context");
    let answer = client.complete(prompt, &labeled).await?;
    println!("{answer}");
    Ok(())
}

pub async fn models(state: &AppState) -> Result<()> {
    let client = state.client()?;
    let models = client.list_models().await?;
    println!(
        "{:<38} {:>10} {:>10}  {}",
        "MODEL", "IN", "OUT", "DESCRIPTION"
    );
    for model in &models {
        println!(
            "{:<38} {:>10} {:>10}  {}",
            model.name,
            limit(model.input_token_limit),
            limit(model.output_token_limit),
            model.description.as_deref().unwrap_or("N/A"),
        );
    }
    Ok(())
}

fn limit(value: Option<u32>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}
