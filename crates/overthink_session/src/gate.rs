//! Conclusion unlock gate.

use overthink_core::Panel;
use serde::Serialize;

/// Shown once when the conclusion becomes available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnlockNotice {
    /// Headline
    pub title: &'static str,
    /// Body text
    pub message: &'static str,
}

impl UnlockNotice {
    /// The conclusion-unlocked notice.
    pub const CONCLUSION: Self = Self {
        title: "Conclusion Unlocked!",
        message: "You've faced the good and the bad. Time for the punchline.",
    };
}

/// Observable gate flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateState {
    /// The "went well" panel has been viewed
    pub better_viewed: bool,
    /// The "could have gone better" panel has been viewed
    pub worse_viewed: bool,
    /// Both panels viewed
    pub unlocked: bool,
}

/// Result of marking a panel viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateUpdate {
    /// Flags after the update
    #[serde(flatten)]
    pub state: GateState,
    /// Present only on the transition into unlocked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<UnlockNotice>,
}

/// Tracks which panels have been viewed.
///
/// Flags only move from false to true until [`reset`](Self::reset). The
/// unlock notice fires exactly once per reset cycle, whichever panel is
/// viewed last.
///
/// # Examples
///
/// ```
/// use overthink_core::Panel;
/// use overthink_session::{UnlockGate, UnlockNotice};
///
/// let mut gate = UnlockGate::default();
/// assert!(gate.mark_viewed(Panel::CouldHaveGoneBetter).notification.is_none());
///
/// let update = gate.mark_viewed(Panel::WentWell);
/// assert!(update.state.unlocked);
/// assert_eq!(update.notification, Some(UnlockNotice::CONCLUSION));
///
/// // Never again until reset
/// assert!(gate.mark_viewed(Panel::WentWell).notification.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockGate {
    better_viewed: bool,
    worse_viewed: bool,
    notified: bool,
}

impl UnlockGate {
    /// Record that `panel` was viewed.
    pub fn mark_viewed(&mut self, panel: Panel) -> GateUpdate {
        match panel {
            Panel::WentWell => self.better_viewed = true,
            Panel::CouldHaveGoneBetter => self.worse_viewed = true,
        }

        let notification = if self.is_unlocked() && !self.notified {
            self.notified = true;
            Some(UnlockNotice::CONCLUSION)
        } else {
            None
        };

        GateUpdate {
            state: self.state(),
            notification,
        }
    }

    /// True once both panels have been viewed.
    pub fn is_unlocked(&self) -> bool {
        self.better_viewed && self.worse_viewed
    }

    /// Current flags.
    pub fn state(&self) -> GateState {
        GateState {
            better_viewed: self.better_viewed,
            worse_viewed: self.worse_viewed,
            unlocked: self.is_unlocked(),
        }
    }

    /// Back to locked, notice re-armed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
