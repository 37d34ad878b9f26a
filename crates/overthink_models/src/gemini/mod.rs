//! Google Gemini REST client.
//!
//! - `models/{model}:generateContent` for text and image generation
//! - `models/{model}:predictLongRunning` plus operation polling for video
//!
//! Every model gets its own rate limiter built from the configured tier.

mod client;
mod protocol;
mod video;

pub use client::GeminiClient;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, overthink_error::GeminiError>;
