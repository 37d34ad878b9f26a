//! Session identifiers and media slots.

use crate::ScenarioKey;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of one upload session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One on-demand media slot: a scenario within a session.
///
/// # Examples
///
/// ```
/// use overthink_core::{MediaSlot, ScenarioKey, SessionId};
///
/// let session = SessionId::new();
/// let a = MediaSlot::new(session, ScenarioKey::Scenario1);
/// let b = MediaSlot::new(session, ScenarioKey::Scenario2);
/// assert_ne!(a, b);
/// assert!(a.to_string().ends_with("/scenario1"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}/{}", session, scenario)]
pub struct MediaSlot {
    /// Owning session
    pub session: SessionId,
    /// Scenario within the session
    pub scenario: ScenarioKey,
}

impl MediaSlot {
    /// Slot for a scenario of a session.
    pub fn new(session: SessionId, scenario: ScenarioKey) -> Self {
        Self { session, scenario }
    }
}
