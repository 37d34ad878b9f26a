//! Provider integrations for Overthink.
//!
//! Only Google Gemini is implemented: [`GeminiClient`] speaks the v1beta REST
//! API for multimodal generation and Veo long-running video jobs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{GeminiClient, GeminiResult};
