//! AI features for PDF workflows: text extraction, chunking, and Gemini
//! calls.
//!
//! This crate keeps the network and model plumbing out of the PDF core.
//! Text is pulled from documents with pdf-extract, cut into overlapping
//! chunks, and sent to the Gemini REST API alongside the user's prompt.
//! The API key, selected model, and consent flag live in a JSON file
//! managed by [`SettingsStore`].

pub mod chunking;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod settings;

pub use chunking::{chunk_text, label_chunks, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use error::AiError;
pub use extract::{extract_text, extract_text_from_file};
pub use gemini::{GeminiClient, ModelInfo};
pub use settings::{Settings, SettingsStore, DEFAULT_GEMINI_MODEL};
