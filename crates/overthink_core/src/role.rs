//! Role types for message senders.

use serde::{Deserialize, Serialize};

/// Who sent a message.
///
/// # Examples
///
/// ```
/// use overthink_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System instructions
    System,
    /// The human
    User,
    /// The model
    Assistant,
}
