//! Tutorial step handle shared between the sequencer and its markers.
//!
//! The sequencer owns step data. Markers only read the interaction type and
//! text when they are initialized, and they write only the two blocking flags.
//! The time block is counted: every marker dwelling on the step holds it, and
//! the step stays blocked until the last hold is released.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// How the player is expected to complete a step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    /// Read-only step; markers are purely decorative.
    None,
    #[default]
    Tap,
    Drag,
    Swipe,
    /// Completed through the confirm button.
    Confirm,
}

/// Per-locale strings with a fallback locale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub entries: HashMap<String, String>,
    #[serde(default)]
    pub fallback_locale: String,
}

impl LocalizedText {
    pub fn new(fallback_locale: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            fallback_locale: fallback_locale.into(),
        }
    }

    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(locale.into(), text.into());
        self
    }

    /// Text for `locale`, falling back to the fallback locale.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.entries
            .get(locale)
            .or_else(|| self.entries.get(&self.fallback_locale))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// One step of a guided tutorial.
#[derive(Debug)]
pub struct TutorialStep {
    pub id: String,
    pub interaction_type: InteractionType,
    /// Minimum idle dwell (seconds) before the step may complete; 0 disables.
    pub min_time_amount: f32,
    pub text: LocalizedText,
    time_holds: AtomicUsize,
    blocked_by_button: AtomicBool,
}

/// Shared reference to a step; markers never own step data.
pub type StepHandle = Arc<TutorialStep>;

impl TutorialStep {
    pub fn new(id: impl Into<String>, interaction_type: InteractionType) -> Self {
        Self {
            id: id.into(),
            interaction_type,
            min_time_amount: 0.0,
            text: LocalizedText::default(),
            time_holds: AtomicUsize::new(0),
            blocked_by_button: AtomicBool::new(false),
        }
    }

    pub fn with_min_time(mut self, seconds: f32) -> Self {
        self.min_time_amount = seconds;
        self
    }

    pub fn with_text(mut self, text: LocalizedText) -> Self {
        self.text = text;
        self
    }

    pub fn into_handle(self) -> StepHandle {
        Arc::new(self)
    }

    #[inline]
    pub fn blocked_by_time(&self) -> bool {
        self.time_holds.load(Ordering::Acquire) > 0
    }

    /// Outstanding dwell holds on the time block.
    #[inline]
    pub fn time_holds(&self) -> usize {
        self.time_holds.load(Ordering::Acquire)
    }

    #[inline]
    pub fn blocked_by_button(&self) -> bool {
        self.blocked_by_button.load(Ordering::Acquire)
    }

    /// True when neither interlock holds the step.
    pub fn is_unblocked(&self) -> bool {
        !self.blocked_by_time() && !self.blocked_by_button()
    }

    /// Add one hold on the time block.
    pub fn hold_time(&self) {
        self.time_holds.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop one hold; extra releases are ignored.
    pub fn release_time(&self) {
        let _ = self
            .time_holds
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    pub fn set_blocked_by_button(&self, blocked: bool) {
        self.blocked_by_button.store(blocked, Ordering::Release);
    }
}
