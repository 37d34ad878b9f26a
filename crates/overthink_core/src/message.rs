//! Message types for generation requests.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A multimodal message.
///
/// # Examples
///
/// ```
/// use overthink_core::{Message, Role, Input};
///
/// let message = Message::user(vec![Input::Text("Hello!".to_string())]);
///
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message (can be multimodal)
    pub content: Vec<Input>,
}

impl Message {
    /// A user message with the given parts.
    pub fn user(content: Vec<Input>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}
