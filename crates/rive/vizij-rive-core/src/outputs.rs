//! Output contracts from artboard playback.
//!
//! Property changes land directly on the artboard; outputs only carry the
//! discrete events produced while stepping.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    PlaybackStarted {
        player: PlayerId,
        name: String,
    },
    PlaybackPaused {
        player: PlayerId,
    },
    PlaybackResumed {
        player: PlayerId,
    },
    PlaybackStopped {
        player: PlayerId,
    },
    /// A one-shot animation reached its end, or a state machine settled.
    PlaybackEnded {
        player: PlayerId,
        animation_time: f32,
    },
    /// A state machine layer entered a new state.
    StateChanged {
        player: PlayerId,
        layer: usize,
        state: usize,
        /// Animation the state plays, when it has one.
        animation: Option<String>,
    },
    /// Playback crossed a callback keyframe on the timeline.
    KeyedCallback {
        player: PlayerId,
        object_id: u32,
        property_key: u32,
        /// Animation time since the keyframe was crossed.
        elapsed_seconds: f32,
    },
    Error {
        message: String,
    },
}

/// Outputs returned by `Artboard::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
