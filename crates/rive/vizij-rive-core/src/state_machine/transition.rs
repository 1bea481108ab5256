//! State transitions, their timing rules and gating conditions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vizij_rive_codec::PropertyValue;

use crate::animation::{Interpolator, LinearAnimationInstance, Loop};
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::scene::set_u32;
use crate::state_machine::condition::TransitionCondition;
use crate::state_machine::input::InputInstance;
use crate::state_machine::state::LayerState;

/// Bits of `StateTransition::flags`.
pub struct TransitionFlags;

impl TransitionFlags {
    pub const NONE: u32 = 0;
    pub const DISABLED: u32 = 1 << 0;
    pub const DURATION_IS_PERCENTAGE: u32 = 1 << 1;
    pub const ENABLE_EXIT_TIME: u32 = 1 << 2;
    pub const EXIT_TIME_IS_PERCENTAGE: u32 = 1 << 3;
    pub const PAUSE_ON_EXIT: u32 = 1 << 4;
    /// Allow this transition to be interrupted before its mix completes.
    pub const ENABLE_EARLY_EXIT: u32 = 1 << 5;
}

/// Result of asking whether a transition may fire right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowTransition {
    No,
    /// Conditions pass but the source animation has not reached the exit time.
    WaitingForExit,
    Yes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateTransition {
    pub state_to_id: u32,
    pub flags: u32,
    /// Mix duration in milliseconds, or percent of the source animation.
    pub duration: u32,
    /// Exit time in milliseconds, or percent of the source animation.
    pub exit_time: u32,
    pub interpolation_type: u32,
    pub interpolator_id: u32,
    pub random_weight: u32,
    pub conditions: Vec<TransitionCondition>,
    pub(crate) interpolator: Option<Arc<Interpolator>>,
}

impl Default for StateTransition {
    fn default() -> Self {
        Self {
            state_to_id: u32::MAX,
            flags: TransitionFlags::NONE,
            duration: 0,
            exit_time: 0,
            interpolation_type: 1,
            interpolator_id: u32::MAX,
            random_weight: 1,
            conditions: Vec::new(),
            interpolator: None,
        }
    }
}

impl StateTransition {
    pub fn to(state_to_id: u32) -> Self {
        Self {
            state_to_id,
            ..Self::default()
        }
    }

    fn has(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }

    pub fn is_disabled(&self) -> bool {
        self.has(TransitionFlags::DISABLED)
    }

    pub fn enable_exit_time(&self) -> bool {
        self.has(TransitionFlags::ENABLE_EXIT_TIME)
    }

    pub fn pause_on_exit(&self) -> bool {
        self.has(TransitionFlags::PAUSE_ON_EXIT)
    }

    pub fn enable_early_exit(&self) -> bool {
        self.has(TransitionFlags::ENABLE_EARLY_EXIT)
    }

    pub fn interpolator(&self) -> Option<&Arc<Interpolator>> {
        self.interpolator.as_ref()
    }

    /// Eases a mix factor through the transition's interpolator, if any.
    pub fn ease(&self, mix: f32) -> f32 {
        match &self.interpolator {
            Some(interpolator) => interpolator.transform(mix),
            None => mix,
        }
    }

    fn source_duration(from: &LayerState) -> Option<(f32, f32)> {
        from.animation()
            .map(|a| (a.start_seconds(), a.duration_seconds()))
    }

    /// Seconds the mix into the target state takes.
    pub fn mix_time(&self, from: &LayerState) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        if self.has(TransitionFlags::DURATION_IS_PERCENTAGE) {
            let duration = Self::source_duration(from).map_or(0.0, |(_, d)| d);
            self.duration as f32 / 100.0 * duration
        } else {
            self.duration as f32 / 1000.0
        }
    }

    /// Exit time in seconds. With `absolute` a percentage is offset by the
    /// animation's start.
    pub fn exit_time_seconds(&self, from: &LayerState, absolute: bool) -> f32 {
        if self.has(TransitionFlags::EXIT_TIME_IS_PERCENTAGE) {
            let (start, duration) = Self::source_duration(from).unwrap_or((0.0, 0.0));
            let start = if absolute { start } else { 0.0 };
            start + self.exit_time as f32 / 100.0 * duration
        } else {
            self.exit_time as f32 / 1000.0
        }
    }

    /// Evaluates conditions then exit time. Trigger conditions fail when
    /// `ignore_triggers` is set so a trigger can fire at most one change.
    pub fn allowed(
        &self,
        from: &LayerState,
        exit_animation: Option<&LinearAnimationInstance>,
        inputs: &[InputInstance],
        ignore_triggers: bool,
    ) -> AllowTransition {
        if self.is_disabled() {
            return AllowTransition::No;
        }
        for condition in &self.conditions {
            if (ignore_triggers && condition.is_trigger()) || !condition.evaluate(inputs) {
                return AllowTransition::No;
            }
        }
        if self.enable_exit_time() {
            if let Some(instance) = exit_animation {
                let animation = instance.animation();
                let duration = animation.duration_seconds();
                let mut exit_time = self.exit_time_seconds(from, false);
                // Exit time lives within one loop; bring it up to the loop
                // the previous frame was in.
                if duration > 0.0
                    && exit_time <= duration
                    && animation.loop_type() != Loop::OneShot
                {
                    exit_time += (instance.last_total_time() / duration).floor() * duration;
                }
                if instance.total_time() < exit_time {
                    return AllowTransition::WaitingForExit;
                }
            }
        }
        AllowTransition::Yes
    }

    /// Returns true when the source animation should be held at its exit
    /// pose while the mix runs. Pauses it at the exit time when asked to.
    pub fn apply_exit_condition(
        &self,
        from: &LayerState,
        exit_animation: Option<&mut LinearAnimationInstance>,
    ) -> bool {
        let Some(instance) = exit_animation else {
            return false;
        };
        if !self.enable_exit_time() {
            return false;
        }
        if self.pause_on_exit() {
            instance.set_time(self.exit_time_seconds(from, true));
        }
        true
    }
}

impl Core for StateTransition {
    fn core_type(&self) -> u16 {
        tk::STATE_TRANSITION
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        let value = match key {
            pk::STATE_TO_ID => self.state_to_id,
            pk::TRANSITION_FLAGS => self.flags,
            pk::TRANSITION_DURATION => self.duration,
            pk::TRANSITION_EXIT_TIME => self.exit_time,
            pk::TRANSITION_INTERPOLATION_TYPE => self.interpolation_type,
            pk::TRANSITION_INTERPOLATOR_ID => self.interpolator_id,
            pk::TRANSITION_RANDOM_WEIGHT => self.random_weight,
            _ => return None,
        };
        Some(PropertyValue::Uint(value))
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        let slot = match key {
            pk::STATE_TO_ID => &mut self.state_to_id,
            pk::TRANSITION_FLAGS => &mut self.flags,
            pk::TRANSITION_DURATION => &mut self.duration,
            pk::TRANSITION_EXIT_TIME => &mut self.exit_time,
            pk::TRANSITION_INTERPOLATION_TYPE => &mut self.interpolation_type,
            pk::TRANSITION_INTERPOLATOR_ID => &mut self.interpolator_id,
            pk::TRANSITION_RANDOM_WEIGHT => &mut self.random_weight,
            _ => return false,
        };
        set_u32(slot, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::LinearAnimation;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    fn looping_state(seconds: u32) -> LayerState {
        let mut state = LayerState::animation_state(0);
        state.animation = Some(Arc::new(LinearAnimation {
            fps: 1,
            duration: seconds,
            loop_value: Loop::Loop.value(),
            ..LinearAnimation::default()
        }));
        state
    }

    #[test]
    fn mix_time_units() {
        let state = looping_state(2);
        let mut t = StateTransition::to(1);
        assert_eq!(t.mix_time(&state), 0.0);
        t.duration = 250;
        approx(t.mix_time(&state), 0.25, 1e-6);
        t.flags = TransitionFlags::DURATION_IS_PERCENTAGE;
        t.duration = 50;
        approx(t.mix_time(&state), 1.0, 1e-6);
    }

    /// It should wait for exit time within whichever loop the animation is in.
    #[test]
    fn exit_time_follows_loops() {
        let state = looping_state(2);
        let t = StateTransition {
            flags: TransitionFlags::ENABLE_EXIT_TIME | TransitionFlags::EXIT_TIME_IS_PERCENTAGE,
            exit_time: 50,
            ..StateTransition::to(1)
        };
        let mut instance = LinearAnimationInstance::new(Arc::clone(state.animation().unwrap()));
        instance.advance(0.5);
        assert_eq!(t.allowed(&state, Some(&instance), &[], false), AllowTransition::WaitingForExit);
        instance.advance(0.6);
        assert_eq!(t.allowed(&state, Some(&instance), &[], false), AllowTransition::Yes);
        instance.advance(1.1);
        assert_eq!(t.allowed(&state, Some(&instance), &[], false), AllowTransition::Yes);
        // Second loop: last total 2.2 puts the exit time at 3.0.
        instance.advance(0.3);
        assert_eq!(t.allowed(&state, Some(&instance), &[], false), AllowTransition::WaitingForExit);
        instance.advance(0.6);
        assert_eq!(t.allowed(&state, Some(&instance), &[], false), AllowTransition::Yes);
    }

    #[test]
    fn disabled_never_fires() {
        let state = LayerState::new(crate::state_machine::state::StateKind::Entry);
        let t = StateTransition {
            flags: TransitionFlags::DISABLED,
            ..StateTransition::to(1)
        };
        assert_eq!(t.allowed(&state, None, &[], false), AllowTransition::No);
    }

    #[test]
    fn pause_on_exit_pins_time() {
        let state = looping_state(4);
        let t = StateTransition {
            flags: TransitionFlags::ENABLE_EXIT_TIME
                | TransitionFlags::EXIT_TIME_IS_PERCENTAGE
                | TransitionFlags::PAUSE_ON_EXIT,
            exit_time: 25,
            ..StateTransition::to(1)
        };
        let mut instance = LinearAnimationInstance::new(Arc::clone(state.animation().unwrap()));
        instance.advance(1.7);
        assert!(t.apply_exit_condition(&state, Some(&mut instance)));
        approx(instance.time(), 1.0, 1e-6);
        assert!(!t.apply_exit_condition(&state, None));
    }
}
