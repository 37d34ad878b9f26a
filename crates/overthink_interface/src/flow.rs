//! The prompt flow abstraction.

use async_trait::async_trait;
use overthink_error::{FlowError, Stage};

/// A typed request/response wrapper around one provider call.
///
/// Each flow names its pipeline stage so that every failure it reports
/// carries it.
#[async_trait]
pub trait PromptFlow: Send + Sync {
    /// Flow input.
    type Input: Send + Sync;
    /// Flow output.
    type Output: Send;

    /// Stage this flow implements.
    fn stage(&self) -> Stage;

    /// Run the flow once. No retries.
    async fn execute(&self, input: &Self::Input) -> Result<Self::Output, FlowError>;
}
