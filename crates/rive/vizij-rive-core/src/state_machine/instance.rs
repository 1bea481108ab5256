//! Runtime state of a playing state machine: inputs, layers and the states
//! they are mixing between.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::animation::{KeyedCallback, LinearAnimation, LinearAnimationInstance};
use crate::config::Config;
use crate::reset::{PooledReset, ResetPool};
use crate::state_machine::input::{InputInstance, InputValue};
use crate::state_machine::layer::StateMachineLayer;
use crate::state_machine::machine::StateMachine;
use crate::state_machine::state::StateKind;
use crate::state_machine::transition::AllowTransition;
use crate::target::PropertyTarget;

/// A layer entered `state` during the last advance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub layer: usize,
    pub state: usize,
}

/// Everything a layer needs from its machine while advancing.
struct LayerContext<'a> {
    inputs: &'a [InputInstance],
    target: &'a mut dyn PropertyTarget,
    rng: &'a mut StdRng,
    pool: &'a Arc<ResetPool>,
    max_state_changes: usize,
    use_resets: bool,
    changes: &'a mut Vec<StateChange>,
    callbacks: &'a mut Vec<KeyedCallback>,
}

#[derive(Debug)]
struct BlendAnimationInstance {
    value: f32,
    instance: LinearAnimationInstance,
    mix: f32,
}

#[derive(Debug)]
struct Blend1DInstance {
    input_id: u32,
    /// Sorted by value.
    animations: Vec<BlendAnimationInstance>,
    reset: Option<PooledReset>,
}

impl Blend1DInstance {
    /// Index of the first animation whose value is not below `value`.
    fn animation_index(&self, value: f32) -> usize {
        let mut index = 0;
        let mut start = 0isize;
        let mut end = self.animations.len() as isize - 1;
        while start <= end {
            let mid = (start + end) >> 1;
            let closest = self.animations[mid as usize].value;
            if closest < value {
                start = mid + 1;
            } else if closest > value {
                end = mid - 1;
            } else {
                index = mid as usize;
                break;
            }
            index = start as usize;
        }
        index
    }

    fn advance(&mut self, elapsed: f32, inputs: &[InputInstance], callbacks: &mut Vec<KeyedCallback>) {
        for blend in &mut self.animations {
            blend.instance.advance_reporting(elapsed, callbacks);
        }
        let value = inputs
            .get(self.input_id as usize)
            .and_then(InputInstance::number)
            .unwrap_or(0.0);

        let index = self.animation_index(value);
        let to = self.animations.get(index).map(|b| b.value);
        let from = index
            .checked_sub(1)
            .and_then(|i| self.animations.get(i))
            .map(|b| b.value);
        let (mix, mix_from) = match (to, from) {
            (Some(to), Some(from)) if to != from => {
                let mix = (value - from) / (to - from);
                (mix, 1.0 - mix)
            }
            _ => (1.0, 1.0),
        };
        for blend in &mut self.animations {
            blend.mix = if to == Some(blend.value) {
                mix
            } else if from == Some(blend.value) {
                mix_from
            } else {
                0.0
            };
        }
    }

    fn apply(&self, target: &mut dyn PropertyTarget, mix: f32) {
        if let Some(reset) = &self.reset {
            reset.apply(target);
        }
        for blend in &self.animations {
            blend.instance.apply(target, blend.mix * mix);
        }
    }
}

#[derive(Debug)]
enum StateInstanceKind {
    Empty,
    Animation(LinearAnimationInstance),
    Blend1D(Blend1DInstance),
}

/// A live layer state.
#[derive(Debug)]
pub struct StateInstance {
    state: usize,
    kind: StateInstanceKind,
    /// Per-transition weights rolled on the last random evaluation.
    random_weights: Vec<u32>,
}

impl StateInstance {
    fn new(
        layer: &StateMachineLayer,
        index: usize,
        target: &dyn PropertyTarget,
        pool: &Arc<ResetPool>,
        use_resets: bool,
    ) -> Self {
        let Some(state) = layer.state(index) else {
            return Self {
                state: index,
                kind: StateInstanceKind::Empty,
                random_weights: Vec::new(),
            };
        };
        let kind = match &state.kind {
            StateKind::Animation { .. } => match state.animation() {
                Some(animation) => StateInstanceKind::Animation(
                    LinearAnimationInstance::with_speed_multiplier(Arc::clone(animation), state.speed()),
                ),
                None => StateInstanceKind::Empty,
            },
            StateKind::Blend1D {
                input_id,
                animations,
            } => {
                let instances = animations
                    .iter()
                    .filter_map(|blend| {
                        blend.animation().map(|animation| BlendAnimationInstance {
                            value: blend.value,
                            instance: LinearAnimationInstance::new(Arc::clone(animation)),
                            mix: 0.0,
                        })
                    })
                    .collect();
                let reset = (use_resets && state.resets()).then(|| {
                    let list: Vec<&LinearAnimation> =
                        state.animations().into_iter().map(|a| a.as_ref()).collect();
                    pool.from_animations(&list, target, true)
                });
                StateInstanceKind::Blend1D(Blend1DInstance {
                    input_id: *input_id,
                    animations: instances,
                    reset,
                })
            }
            StateKind::Entry | StateKind::Any | StateKind::Exit => StateInstanceKind::Empty,
        };
        Self {
            state: index,
            kind,
            random_weights: state.transitions.iter().map(|t| t.random_weight).collect(),
        }
    }

    /// Index of the state within its layer.
    pub fn state_index(&self) -> usize {
        self.state
    }

    pub fn animation_instance(&self) -> Option<&LinearAnimationInstance> {
        match &self.kind {
            StateInstanceKind::Animation(instance) => Some(instance),
            _ => None,
        }
    }

    fn animation_instance_mut(&mut self) -> Option<&mut LinearAnimationInstance> {
        match &mut self.kind {
            StateInstanceKind::Animation(instance) => Some(instance),
            _ => None,
        }
    }

    /// Mix factors of a blend state's animations, in value order.
    pub fn blend_mixes(&self) -> Vec<f32> {
        match &self.kind {
            StateInstanceKind::Blend1D(blend) => blend.animations.iter().map(|b| b.mix).collect(),
            _ => Vec::new(),
        }
    }

    pub fn random_weights(&self) -> &[u32] {
        &self.random_weights
    }

    fn advance(&mut self, elapsed: f32, inputs: &[InputInstance], callbacks: &mut Vec<KeyedCallback>) {
        match &mut self.kind {
            StateInstanceKind::Empty => {}
            StateInstanceKind::Animation(instance) => {
                let scaled = elapsed * instance.speed_multiplier();
                instance.advance_reporting(scaled, callbacks);
            }
            StateInstanceKind::Blend1D(blend) => blend.advance(elapsed, inputs, callbacks),
        }
    }

    fn apply(&self, target: &mut dyn PropertyTarget, mix: f32) {
        match &self.kind {
            StateInstanceKind::Empty => {}
            StateInstanceKind::Animation(instance) => instance.apply(target, mix),
            StateInstanceKind::Blend1D(blend) => blend.apply(target, mix),
        }
    }

    pub fn keep_going(&self) -> bool {
        match &self.kind {
            StateInstanceKind::Empty => false,
            StateInstanceKind::Animation(instance) => instance.keep_going(),
            StateInstanceKind::Blend1D(blend) => {
                blend.animations.iter().any(|b| b.instance.keep_going())
            }
        }
    }
}

/// One layer's playback: the current state, the state being mixed out and
/// the transition between them.
#[derive(Debug)]
pub struct LayerInstance {
    machine: Arc<StateMachine>,
    layer: usize,
    any_state: StateInstance,
    current: Option<StateInstance>,
    from: Option<StateInstance>,
    /// `(state index, transition index)` of the transition last taken.
    transition: Option<(usize, usize)>,
    transition_completed: bool,
    mix: f32,
    mix_from: f32,
    hold_animation: Option<(Arc<LinearAnimation>, f32)>,
    hold_animation_from: bool,
    waiting_for_exit: bool,
    state_changed_on_advance: bool,
    reset: Option<PooledReset>,
}

impl LayerInstance {
    fn new(
        machine: Arc<StateMachine>,
        layer: usize,
        target: &dyn PropertyTarget,
        pool: &Arc<ResetPool>,
        use_resets: bool,
    ) -> Self {
        let (any_state, entry) = match machine.layer(layer) {
            Some(def) => (
                StateInstance::new(def, def.any_index(), target, pool, use_resets),
                StateInstance::new(def, def.entry_index(), target, pool, use_resets),
            ),
            None => {
                let empty = StateMachineLayer::default();
                (
                    StateInstance::new(&empty, 0, target, pool, use_resets),
                    StateInstance::new(&empty, 0, target, pool, use_resets),
                )
            }
        };
        Self {
            machine,
            layer,
            any_state,
            current: Some(entry),
            from: None,
            transition: None,
            transition_completed: false,
            mix: 1.0,
            mix_from: 1.0,
            hold_animation: None,
            hold_animation_from: false,
            waiting_for_exit: false,
            state_changed_on_advance: false,
            reset: None,
        }
    }

    pub fn current_state(&self) -> Option<usize> {
        self.current.as_ref().map(StateInstance::state_index)
    }

    pub fn current(&self) -> Option<&StateInstance> {
        self.current.as_ref()
    }

    pub fn from_state(&self) -> Option<&StateInstance> {
        self.from.as_ref()
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn waiting_for_exit(&self) -> bool {
        self.waiting_for_exit
    }

    pub fn state_changed_on_advance(&self) -> bool {
        self.state_changed_on_advance
    }

    /// Whether a snapshot for a reset-flagged target is being applied.
    pub fn has_reset(&self) -> bool {
        self.reset.is_some()
    }

    pub fn is_transitioning(&self) -> bool {
        let duration = self
            .transition
            .and_then(|(s, t)| self.machine.layers.get(self.layer)?.transition(s, t))
            .map_or(0, |t| t.duration);
        self.from.is_some() && duration != 0 && self.mix < 1.0
    }

    fn advance(&mut self, elapsed: f32, ctx: &mut LayerContext<'_>) -> bool {
        self.state_changed_on_advance = false;
        if let Some(current) = self.current.as_mut() {
            current.advance(elapsed, ctx.inputs, ctx.callbacks);
        }
        self.update_mix(elapsed);
        if self.mix < 1.0 && !self.hold_animation_from {
            if let Some(from) = self.from.as_mut() {
                from.advance(elapsed, ctx.inputs, ctx.callbacks);
            }
        }

        let mut changes = 0;
        while self.update_state(changes != 0, ctx) {
            self.apply(ctx.target);
            changes += 1;
            if changes >= ctx.max_state_changes {
                log::warn!(
                    "layer {} of state machine '{}' exceeded {} state changes in one advance",
                    self.layer,
                    self.machine.name,
                    ctx.max_state_changes
                );
                return false;
            }
        }
        self.apply(ctx.target);

        self.mix != 1.0 || self.waiting_for_exit || self.current.as_ref().is_some_and(StateInstance::keep_going)
    }

    fn update_mix(&mut self, elapsed: f32) {
        let machine = Arc::clone(&self.machine);
        let Some(layer) = machine.layer(self.layer) else {
            self.mix = 1.0;
            return;
        };
        let transition = self.transition.and_then(|(s, t)| layer.transition(s, t));
        match (transition, &self.from) {
            (Some(transition), Some(from)) if transition.duration != 0 => {
                let mix_time = layer
                    .state(from.state)
                    .map_or(0.0, |state| transition.mix_time(state));
                self.mix = if mix_time > 0.0 {
                    (self.mix + elapsed / mix_time).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                if self.mix == 1.0 && !self.transition_completed {
                    self.transition_completed = true;
                    self.reset = None;
                }
            }
            _ => self.mix = 1.0,
        }
    }

    fn update_state(&mut self, ignore_triggers: bool, ctx: &mut LayerContext<'_>) -> bool {
        if self.is_transitioning() {
            let early_exit = self
                .transition
                .and_then(|(s, t)| self.machine.layers.get(self.layer)?.transition(s, t))
                .is_some_and(|t| t.enable_early_exit());
            if !early_exit {
                return false;
            }
        }
        self.waiting_for_exit = false;
        if self.try_change_state(true, ignore_triggers, ctx) {
            return true;
        }
        self.try_change_state(false, ignore_triggers, ctx)
    }

    /// Evaluates the transitions of the any state or the current state and
    /// takes the first one allowed (or a weighted random pick).
    fn try_change_state(
        &mut self,
        from_any: bool,
        ignore_triggers: bool,
        ctx: &mut LayerContext<'_>,
    ) -> bool {
        let machine = Arc::clone(&self.machine);
        let Some(layer) = machine.layer(self.layer) else {
            return false;
        };
        let current_state = self.current_state();
        let can_change = |to: u32| current_state != Some(to as usize);

        let mut waiting = false;
        let source = if from_any {
            &mut self.any_state
        } else {
            match self.current.as_mut() {
                Some(current) => current,
                None => return false,
            }
        };
        let source_index = source.state;
        let Some(state) = layer.state(source_index) else {
            return false;
        };

        let chosen = if state.is_random() {
            let mut total = 0u32;
            for (i, transition) in state.transitions.iter().enumerate() {
                let allowed = transition.allowed(
                    state,
                    source.animation_instance(),
                    ctx.inputs,
                    ignore_triggers,
                );
                let weight = if allowed == AllowTransition::Yes && can_change(transition.state_to_id) {
                    transition.random_weight
                } else {
                    waiting |= allowed == AllowTransition::WaitingForExit;
                    0
                };
                if let Some(slot) = source.random_weights.get_mut(i) {
                    *slot = weight;
                }
                total = total.saturating_add(weight);
            }
            if total > 0 {
                let roll = ctx.rng.gen::<f32>() * total as f32;
                let mut accumulated = 0.0f32;
                let mut pick = None;
                for (i, &weight) in source.random_weights.iter().enumerate() {
                    if weight > 0 && accumulated + weight as f32 > roll {
                        pick = Some(i);
                        break;
                    }
                    accumulated += weight as f32;
                }
                // Rounding can leave the roll just past the last bucket.
                pick.or_else(|| source.random_weights.iter().rposition(|&w| w > 0))
            } else {
                None
            }
        } else {
            let mut pick = None;
            for (i, transition) in state.transitions.iter().enumerate() {
                match transition.allowed(state, source.animation_instance(), ctx.inputs, ignore_triggers) {
                    AllowTransition::Yes if can_change(transition.state_to_id) => {
                        pick = Some(i);
                        break;
                    }
                    AllowTransition::WaitingForExit => waiting = true,
                    _ => {}
                }
            }
            pick
        };

        if waiting {
            self.waiting_for_exit = true;
        }
        let Some(index) = chosen else {
            return false;
        };
        let transition = &state.transitions[index];
        let target_index = transition.state_to_id as usize;

        let next = StateInstance::new(layer, target_index, &*ctx.target, ctx.pool, ctx.use_resets);
        self.from = self.current.replace(next);
        self.transition = Some((source_index, index));
        self.transition_completed = transition.duration == 0;
        self.state_changed_on_advance = true;
        ctx.changes.push(StateChange {
            layer: self.layer,
            state: target_index,
        });

        self.reset = None;
        let target_resets = layer.state(target_index).is_some_and(|s| s.resets());
        if ctx.use_resets && target_resets && transition.duration != 0 {
            let mut list: Vec<&LinearAnimation> = Vec::new();
            if let Some(from) = self.from.as_ref().and_then(|f| layer.state(f.state)) {
                list.extend(from.animations().into_iter().map(|a| a.as_ref()));
            }
            if let Some(to) = layer.state(target_index) {
                list.extend(to.animations().into_iter().map(|a| a.as_ref()));
            }
            self.reset = Some(ctx.pool.from_animations(&list, &*ctx.target, false));
        }

        if let Some(from) = self.from.as_mut() {
            if let Some(from_state) = layer.state(from.state) {
                if transition.apply_exit_condition(from_state, from.animation_instance_mut()) {
                    if let Some(instance) = from.animation_instance() {
                        self.hold_animation = Some((Arc::clone(instance.animation()), instance.time()));
                    }
                }
            }
        }
        self.mix_from = self.mix;
        if self.mix != 0.0 {
            self.hold_animation_from = transition.pause_on_exit();
        }

        let spilled = self
            .from
            .as_ref()
            .and_then(StateInstance::animation_instance)
            .map(LinearAnimationInstance::spilled_time);
        if let (Some(spilled), Some(current)) = (spilled, self.current.as_mut()) {
            current.advance(spilled, ctx.inputs, ctx.callbacks);
        }

        self.mix = 0.0;
        self.update_mix(0.0);
        self.waiting_for_exit = false;
        true
    }

    fn apply(&mut self, target: &mut dyn PropertyTarget) {
        if let Some(reset) = &self.reset {
            reset.apply(target);
        }
        if let Some((animation, time)) = self.hold_animation.take() {
            animation.apply(target, time, self.mix_from);
        }
        let machine = Arc::clone(&self.machine);
        let transition = self
            .transition
            .and_then(|(s, t)| machine.layer(self.layer)?.transition(s, t));
        let ease = |mix: f32| transition.map_or(mix, |t| t.ease(mix));
        if self.mix < 1.0 {
            if let Some(from) = &self.from {
                from.apply(target, ease(self.mix_from));
            }
        }
        if let Some(current) = &self.current {
            current.apply(target, ease(self.mix));
        }
    }
}

/// A playing instance of a [`StateMachine`] bound to one artboard.
#[derive(Debug)]
pub struct StateMachineInstance {
    machine: Arc<StateMachine>,
    inputs: Vec<InputInstance>,
    layers: Vec<LayerInstance>,
    rng: StdRng,
    pool: Arc<ResetPool>,
    max_state_changes: usize,
    use_resets: bool,
    changes: Vec<StateChange>,
    callbacks: Vec<KeyedCallback>,
    needs_advance: bool,
}

impl StateMachineInstance {
    pub fn new(
        machine: Arc<StateMachine>,
        target: &dyn PropertyTarget,
        pool: Arc<ResetPool>,
        config: &Config,
    ) -> Self {
        let inputs = machine.inputs.iter().map(InputInstance::from_definition).collect();
        let use_resets = config.features.state_resets;
        let layers = (0..machine.layers.len())
            .map(|i| LayerInstance::new(Arc::clone(&machine), i, target, &pool, use_resets))
            .collect();
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            machine,
            inputs,
            layers,
            rng,
            pool,
            max_state_changes: config.max_state_changes.max(1),
            use_resets,
            changes: Vec::new(),
            callbacks: Vec::new(),
            needs_advance: true,
        }
    }

    pub fn machine(&self) -> &Arc<StateMachine> {
        &self.machine
    }

    pub fn name(&self) -> &str {
        &self.machine.name
    }

    /// Advances every layer and applies the result to `target`. Returns
    /// whether anything is still animating.
    pub fn advance(&mut self, target: &mut dyn PropertyTarget, elapsed: f32) -> bool {
        self.changes.clear();
        self.callbacks.clear();
        let mut keep_going = false;
        {
            let mut ctx = LayerContext {
                inputs: &self.inputs,
                target,
                rng: &mut self.rng,
                pool: &self.pool,
                max_state_changes: self.max_state_changes,
                use_resets: self.use_resets,
                changes: &mut self.changes,
                callbacks: &mut self.callbacks,
            };
            for layer in &mut self.layers {
                keep_going |= layer.advance(elapsed, &mut ctx);
            }
        }
        for input in &mut self.inputs {
            input.advanced();
        }
        self.needs_advance = keep_going;
        keep_going
    }

    pub fn needs_advance(&self) -> bool {
        self.needs_advance
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&LayerInstance> {
        self.layers.get(index)
    }

    pub fn current_state(&self, layer: usize) -> Option<usize> {
        self.layers.get(layer)?.current_state()
    }

    /// Name of the animation the layer's current state plays.
    pub fn current_animation_name(&self, layer: usize) -> Option<&str> {
        let instance = self.layers.get(layer)?.current()?.animation_instance()?;
        Some(instance.animation().name.as_str())
    }

    /// State changes made during the last advance, in order.
    pub fn state_changes(&self) -> &[StateChange] {
        &self.changes
    }

    /// Callback keyframes crossed during the last advance, in order.
    pub fn reported_callbacks(&self) -> &[KeyedCallback] {
        &self.callbacks
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn input(&self, index: usize) -> Option<&InputInstance> {
        self.inputs.get(index)
    }

    pub fn inputs(&self) -> &[InputInstance] {
        &self.inputs
    }

    fn input_mut(&mut self, name: &str) -> Option<&mut InputInstance> {
        self.inputs.iter_mut().find(|i| i.name == name)
    }

    pub fn get_number(&self, name: &str) -> Option<f32> {
        self.inputs.iter().find(|i| i.name == name)?.number()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.inputs.iter().find(|i| i.name == name)?.boolean()
    }

    /// Returns false when no number input has that name.
    pub fn set_number(&mut self, name: &str, value: f32) -> bool {
        let Some(input) = self.input_mut(name) else {
            return false;
        };
        match &mut input.value {
            InputValue::Number(slot) => {
                *slot = value;
                self.needs_advance = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        let Some(input) = self.input_mut(name) else {
            return false;
        };
        match &mut input.value {
            InputValue::Bool(slot) => {
                *slot = value;
                self.needs_advance = true;
                true
            }
            _ => false,
        }
    }

    pub fn fire_trigger(&mut self, name: &str) -> bool {
        let Some(input) = self.input_mut(name) else {
            return false;
        };
        match &mut input.value {
            InputValue::Trigger { fired } => {
                *fired = true;
                self.needs_advance = true;
                true
            }
            _ => false,
        }
    }

    /// Overwrites an input by index, keeping its kind.
    pub(crate) fn restore_input(&mut self, index: usize, value: InputValue) -> bool {
        let Some(input) = self.inputs.get_mut(index) else {
            return false;
        };
        let same_kind = matches!(
            (&input.value, &value),
            (InputValue::Number(_), InputValue::Number(_))
                | (InputValue::Bool(_), InputValue::Bool(_))
                | (InputValue::Trigger { .. }, InputValue::Trigger { .. })
        );
        if same_kind {
            input.value = value;
            self.needs_advance = true;
        }
        same_kind
    }
}
