//! Semantic signals emitted by markers while ticking.
//!
//! Pose and color changes are read straight from the node; these events only
//! carry the discrete lifecycle moments hosts and sequencers care about.

use serde::{Deserialize, Serialize};

use crate::ids::MarkerId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MarkerEvent {
    Shown {
        marker: MarkerId,
    },
    AppearCompleted {
        marker: MarkerId,
        /// True when the liveness timeout ended the transition.
        forced: bool,
    },
    DwellSatisfied {
        marker: MarkerId,
        step: String,
    },
    DisappearStarted {
        marker: MarkerId,
    },
    Destroyed {
        marker: MarkerId,
    },
}

/// Per-marker event queue, drained by the host.
#[derive(Clone, Debug, Default)]
pub struct MarkerEvents {
    events: Vec<MarkerEvent>,
}

impl MarkerEvents {
    #[inline]
    pub fn push(&mut self, event: MarkerEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<MarkerEvent> {
        std::mem::take(&mut self.events)
    }
}
