//! Layer states: entry, any, exit, single animation and 1D blend.

use std::sync::Arc;

use vizij_rive_codec::PropertyValue;

use crate::animation::LinearAnimation;
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::scene::{set_f32, set_u32};
use crate::state_machine::transition::StateTransition;

/// Bits of `LayerState::flags`.
pub struct LayerStateFlags;

impl LayerStateFlags {
    pub const NONE: u32 = 0;
    /// Pick among allowed transitions by weight instead of taking the first.
    pub const RANDOM: u32 = 1 << 0;
    /// Restore keyed properties to a baseline when entering the state.
    pub const RESET: u32 = 1 << 1;
}

/// One animation inside a 1D blend state, placed at `value` on the blend axis.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendAnimation1D {
    pub animation_id: u32,
    pub value: f32,
    pub(crate) animation: Option<Arc<LinearAnimation>>,
}

impl Default for BlendAnimation1D {
    fn default() -> Self {
        Self {
            animation_id: u32::MAX,
            value: 0.0,
            animation: None,
        }
    }
}

impl BlendAnimation1D {
    pub fn new(animation_id: u32, value: f32) -> Self {
        Self {
            animation_id,
            value,
            animation: None,
        }
    }

    pub fn animation(&self) -> Option<&Arc<LinearAnimation>> {
        self.animation.as_ref()
    }
}

impl Core for BlendAnimation1D {
    fn core_type(&self) -> u16 {
        tk::BLEND_ANIMATION_1D
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::BLEND_ANIMATION_ANIMATION_ID => Some(PropertyValue::Uint(self.animation_id)),
            pk::BLEND_ANIMATION_1D_VALUE => Some(PropertyValue::Double(self.value)),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::BLEND_ANIMATION_ANIMATION_ID => set_u32(&mut self.animation_id, value),
            pk::BLEND_ANIMATION_1D_VALUE => set_f32(&mut self.value, value),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StateKind {
    Entry,
    Any,
    Exit,
    Animation {
        animation_id: u32,
        /// Playback rate multiplier. Negative plays the animation backward.
        speed: f32,
    },
    Blend1D {
        /// Number input driving the blend, `u32::MAX` when unbound.
        input_id: u32,
        animations: Vec<BlendAnimation1D>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerState {
    pub kind: StateKind,
    pub flags: u32,
    pub transitions: Vec<StateTransition>,
    pub(crate) animation: Option<Arc<LinearAnimation>>,
}

impl LayerState {
    pub fn new(kind: StateKind) -> Self {
        Self {
            kind,
            flags: LayerStateFlags::NONE,
            transitions: Vec::new(),
            animation: None,
        }
    }

    pub fn animation_state(animation_id: u32) -> Self {
        Self::new(StateKind::Animation {
            animation_id,
            speed: 1.0,
        })
    }

    /// Rate applied to the state's animation. Only animation states scale time.
    pub fn speed(&self) -> f32 {
        match self.kind {
            StateKind::Animation { speed, .. } => speed,
            _ => 1.0,
        }
    }

    /// The resolved animation of an animation state.
    pub fn animation(&self) -> Option<&Arc<LinearAnimation>> {
        self.animation.as_ref()
    }

    pub fn is_random(&self) -> bool {
        self.flags & LayerStateFlags::RANDOM != 0
    }

    pub fn resets(&self) -> bool {
        self.flags & LayerStateFlags::RESET != 0
    }

    /// Every animation the state can apply, in declaration order.
    pub fn animations(&self) -> Vec<&Arc<LinearAnimation>> {
        match &self.kind {
            StateKind::Animation { .. } => self.animation.iter().collect(),
            StateKind::Blend1D { animations, .. } => {
                animations.iter().filter_map(|a| a.animation.as_ref()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Appends a blend animation. Returns false for non-blend states.
    pub(crate) fn add_blend_animation(&mut self, blend: BlendAnimation1D) -> bool {
        match &mut self.kind {
            StateKind::Blend1D { animations, .. } => {
                animations.push(blend);
                true
            }
            _ => false,
        }
    }
}

impl Core for LayerState {
    fn core_type(&self) -> u16 {
        match self.kind {
            StateKind::Entry => tk::ENTRY_STATE,
            StateKind::Any => tk::ANY_STATE,
            StateKind::Exit => tk::EXIT_STATE,
            StateKind::Animation { .. } => tk::ANIMATION_STATE,
            StateKind::Blend1D { .. } => tk::BLEND_STATE_1D,
        }
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match (key, &self.kind) {
            (pk::LAYER_STATE_FLAGS, _) => Some(PropertyValue::Uint(self.flags)),
            (pk::ANIMATION_STATE_ANIMATION_ID, StateKind::Animation { animation_id, .. }) => {
                Some(PropertyValue::Uint(*animation_id))
            }
            (pk::ANIMATION_STATE_SPEED, StateKind::Animation { speed, .. }) => {
                Some(PropertyValue::Double(*speed))
            }
            (pk::BLEND_STATE_1D_INPUT_ID, StateKind::Blend1D { input_id, .. }) => {
                Some(PropertyValue::Uint(*input_id))
            }
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, &mut self.kind) {
            (pk::LAYER_STATE_FLAGS, _) => set_u32(&mut self.flags, value),
            (pk::ANIMATION_STATE_ANIMATION_ID, StateKind::Animation { animation_id, .. }) => {
                set_u32(animation_id, value)
            }
            (pk::ANIMATION_STATE_SPEED, StateKind::Animation { speed, .. }) => set_f32(speed, value),
            (pk::BLEND_STATE_1D_INPUT_ID, StateKind::Blend1D { input_id, .. }) => {
                set_u32(input_id, value)
            }
            _ => false,
        }
    }
}
