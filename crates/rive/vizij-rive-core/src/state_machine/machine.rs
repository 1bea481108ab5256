//! StateMachine definition and its import-time resolution.

use std::sync::Arc;

use hashbrown::HashMap;
use vizij_rive_codec::PropertyValue;

use crate::animation::{Interpolator, LinearAnimation};
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::error::GraphError;
use crate::state_machine::input::{InputKind, StateMachineInput};
use crate::state_machine::layer::StateMachineLayer;
use crate::state_machine::state::StateKind;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateMachine {
    pub name: String,
    pub inputs: Vec<StateMachineInput>,
    pub layers: Vec<StateMachineLayer>,
}

impl StateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn input(&self, index: usize) -> Option<&StateMachineInput> {
        self.inputs.get(index)
    }

    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i.name == name)
    }

    pub fn layer(&self, index: usize) -> Option<&StateMachineLayer> {
        self.layers.get(index)
    }

    /// Binds animation and interpolator ids and checks every cross reference.
    /// Animation ids that do not resolve leave the state without an animation.
    pub(crate) fn resolve(
        &mut self,
        animations: &[Arc<LinearAnimation>],
        interpolators: &HashMap<u32, Arc<Interpolator>>,
    ) -> Result<(), GraphError> {
        let inputs = &self.inputs;
        for layer in &mut self.layers {
            layer.initialize()?;
            let state_count = layer.states.len();
            for state in &mut layer.states {
                match &mut state.kind {
                    StateKind::Animation { animation_id, .. } => {
                        state.animation = animations.get(*animation_id as usize).cloned();
                        if state.animation.is_none() {
                            log::debug!("animation state references unknown animation {animation_id}");
                        }
                    }
                    StateKind::Blend1D {
                        input_id,
                        animations: blends,
                    } => {
                        if *input_id != u32::MAX {
                            match inputs.get(*input_id as usize) {
                                Some(StateMachineInput {
                                    kind: InputKind::Number(_),
                                    ..
                                }) => {}
                                Some(_) => {
                                    return Err(GraphError::invalid(
                                        *input_id,
                                        "blend state input is not a number",
                                    ))
                                }
                                None => {
                                    return Err(GraphError::missing(*input_id, "blend state input"))
                                }
                            }
                        }
                        for blend in blends.iter_mut() {
                            blend.animation = animations.get(blend.animation_id as usize).cloned();
                        }
                        blends.sort_by(|a, b| a.value.total_cmp(&b.value));
                    }
                    _ => {}
                }

                for transition in &mut state.transitions {
                    if transition.state_to_id as usize >= state_count {
                        return Err(GraphError::invalid(
                            transition.state_to_id,
                            "transition targets a state outside its layer",
                        ));
                    }
                    for condition in &transition.conditions {
                        condition.validate(inputs)?;
                    }
                    transition.interpolator = match transition.interpolator_id {
                        u32::MAX => None,
                        id => Some(
                            interpolators
                                .get(&id)
                                .cloned()
                                .ok_or_else(|| GraphError::missing(id, "transition interpolator"))?,
                        ),
                    };
                }
            }
        }
        Ok(())
    }
}

impl Core for StateMachine {
    fn core_type(&self) -> u16 {
        tk::STATE_MACHINE
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::ANIMATION_NAME => Some(PropertyValue::String(self.name.clone())),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, value) {
            (pk::ANIMATION_NAME, PropertyValue::String(v)) => {
                self.name = v;
                true
            }
            _ => false,
        }
    }
}
