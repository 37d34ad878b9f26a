//! Per-slot mutual exclusion for on-demand media.

use overthink_core::MediaSlot;
use overthink_error::{FlowError, FlowErrorKind};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of media slots with a generation in flight.
///
/// # Examples
///
/// ```
/// use overthink_core::{MediaSlot, ScenarioKey, SessionId};
/// use overthink_pipeline::InFlight;
///
/// let in_flight = InFlight::default();
/// let slot = MediaSlot::new(SessionId::new(), ScenarioKey::Scenario1);
///
/// let guard = in_flight.claim(slot).unwrap();
/// assert!(in_flight.claim(slot).is_err());
///
/// drop(guard);
/// assert!(in_flight.claim(slot).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    slots: Arc<Mutex<HashSet<MediaSlot>>>,
}

impl InFlight {
    /// Claim `slot`, failing with `ScenarioBusy` if it is already claimed.
    ///
    /// The claim is released when the returned guard drops.
    pub fn claim(&self, slot: MediaSlot) -> Result<InFlightGuard, FlowError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if !slots.insert(slot) {
            return Err(FlowError::new(FlowErrorKind::ScenarioBusy(slot.to_string())));
        }
        Ok(InFlightGuard {
            slots: Arc::clone(&self.slots),
            slot,
        })
    }

    /// True when `slot` has a generation in flight.
    pub fn is_busy(&self, slot: &MediaSlot) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(slot)
    }
}

/// Releases its slot on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    slots: Arc<Mutex<HashSet<MediaSlot>>>,
    slot: MediaSlot,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.slot);
    }
}
