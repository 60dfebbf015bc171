//! Client for the Gemini generateContent REST API.
//!
//! The client holds the API key and a fully-qualified model name. Every
//! helper funnels through [`GeminiClient::complete`], which sends one
//! user turn and returns the joined text parts of the first candidate.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// One entry from the model listing endpoint. Token limits are absent on
/// some models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub description: Option<String>,
    pub input_token_limit: Option<u32>,
    pub output_token_limit: Option<u32>,
}

#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for `model`. Bare model names are qualified with
    /// the `models/` prefix the API expects.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AiError::Credential(
                "Gemini API Key not found. Please set it in settings.".to_string(),
            ));
        }
        Ok(GeminiClient {
            http: reqwest::Client::new(),
            api_key,
            model: qualified_model(&model.into()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion for `prompt`, optionally grounded in
    /// `context` chunks.
    pub async fn complete(&self, prompt: &str, context: &[String]) -> Result<String, AiError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: build_prompt(prompt, context),
                }],
            }],
        };
        let url = format!("{}/{}:generateContent", API_BASE_URL, self.model);
        tracing::debug!(model = %self.model, context_chunks = context.len(), "calling Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Generation(format!("Failed to call Gemini: {}", e)))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Generation(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }
        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::Generation(format!("Failed to parse Gemini response: {}", e)))?;

        answer_text(&parsed)
            .ok_or_else(|| AiError::Generation("Gemini returned no candidates".to_string()))
    }

    pub async fn summarize(&self, text: &str) -> Result<String, AiError> {
        let prompt = format!(
            "Please provide a concise summary of the following text:\n\n{}",
            text
        );
        self.complete(&prompt, &[]).await
    }

    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String, AiError> {
        let prompt = format!(
            "Translate the following text to {}:\n\n{}",
            target_language, text
        );
        self.complete(&prompt, &[]).await
    }

    /// Ask the model for `count` questions about `text` and parse them out
    /// of the numbered list it usually answers with.
    pub async fn generate_questions(
        &self,
        text: &str,
        count: usize,
    ) -> Result<Vec<String>, AiError> {
        let prompt = format!(
            "Based on the following text, generate {} insightful questions that could be asked about the content:\n\n{}",
            count, text
        );
        let answer = self.complete(&prompt, &[]).await?;
        Ok(parse_questions(&answer, count))
    }

    /// List the Gemini models the key has access to.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, AiError> {
        let url = format!("{}/models", API_BASE_URL);
        let response = self
            .http
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AiError::Generation(format!("Failed to call Gemini: {}", e)))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Generation(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }
        let parsed: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| AiError::Generation(format!("Failed to parse Gemini response: {}", e)))?;

        Ok(parsed
            .models
            .into_iter()
            .filter(|m| m.name.contains("gemini"))
            .collect())
    }
}

fn build_prompt(prompt: &str, context: &[String]) -> String {
    if context.is_empty() {
        return prompt.to_string();
    }
    format!(
        "Context information:\n{}\n\nBased on the above context, {}",
        context.join("\n\n"),
        prompt
    )
}

fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn answer_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    if content.parts.is_empty() {
        return None;
    }
    Some(
        content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .concat(),
    )
}

/// Keep lines that look like questions, strip their list numbering, and
/// cap the result at `count`.
fn parse_questions(answer: &str, count: usize) -> Vec<String> {
    lazy_static! {
        static ref NUMBERED: Regex = Regex::new(r"^\d+\.").unwrap();
        static ref NUMBER_PREFIX: Regex = Regex::new(r"^\d+\.\s*").unwrap();
    }
    answer
        .lines()
        .filter(|line| {
            !line.trim().is_empty() && (line.contains('?') || NUMBERED.is_match(line))
        })
        .map(|line| NUMBER_PREFIX.replace(line, "").trim().to_string())
        .take(count)
        .collect()
}
