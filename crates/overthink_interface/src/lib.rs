//! Trait definitions for the Overthink video analysis service.
//!
//! Providers implement [`GenerativeDriver`] for text and image generation and
//! [`VideoGeneration`] for long-running video jobs. The pipeline builds its
//! five prompt flows on top of them, each implementing [`PromptFlow`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod flow;
mod traits;
mod types;

pub use flow::PromptFlow;
pub use traits::{GenerativeDriver, VideoGeneration};
pub use types::{AspectRatio, JobStatus, VideoJob, VideoJobRequest, VideoJobRequestBuilder};
