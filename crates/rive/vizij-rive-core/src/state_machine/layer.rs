//! A state machine layer: a set of states with one entry, any and exit state.

use vizij_rive_codec::PropertyValue;

use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::error::GraphError;
use crate::state_machine::state::{LayerState, StateKind};
use crate::state_machine::transition::StateTransition;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateMachineLayer {
    pub name: String,
    pub states: Vec<LayerState>,
    entry: usize,
    any: usize,
    exit: usize,
}

impl StateMachineLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn entry_index(&self) -> usize {
        self.entry
    }

    pub fn any_index(&self) -> usize {
        self.any
    }

    pub fn exit_index(&self) -> usize {
        self.exit
    }

    pub fn state(&self, index: usize) -> Option<&LayerState> {
        self.states.get(index)
    }

    pub fn transition(&self, state: usize, index: usize) -> Option<&StateTransition> {
        self.states.get(state)?.transitions.get(index)
    }

    /// Locates the entry, any and exit states. Each must be present.
    pub(crate) fn initialize(&mut self) -> Result<(), GraphError> {
        let find = |wanted: fn(&StateKind) -> bool, what: &str| {
            self.states
                .iter()
                .position(|s| wanted(&s.kind))
                .ok_or_else(|| GraphError::missing(u32::MAX, format!("{what} in layer '{}'", self.name)))
        };
        let entry = find(|k| matches!(k, StateKind::Entry), "entry state")?;
        let any = find(|k| matches!(k, StateKind::Any), "any state")?;
        let exit = find(|k| matches!(k, StateKind::Exit), "exit state")?;
        self.entry = entry;
        self.any = any;
        self.exit = exit;
        Ok(())
    }
}

impl Core for StateMachineLayer {
    fn core_type(&self) -> u16 {
        tk::STATE_MACHINE_LAYER
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::STATE_MACHINE_COMPONENT_NAME => Some(PropertyValue::String(self.name.clone())),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, value) {
            (pk::STATE_MACHINE_COMPONENT_NAME, PropertyValue::String(v)) => {
                self.name = v;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_special_states() {
        let mut layer = StateMachineLayer::new("main");
        layer.states = vec![
            LayerState::new(StateKind::Any),
            LayerState::animation_state(0),
            LayerState::new(StateKind::Exit),
            LayerState::new(StateKind::Entry),
        ];
        layer.initialize().unwrap();
        assert_eq!(layer.entry_index(), 3);
        assert_eq!(layer.any_index(), 0);
        assert_eq!(layer.exit_index(), 2);
    }

    #[test]
    fn missing_exit_is_rejected() {
        let mut layer = StateMachineLayer::new("broken");
        layer.states = vec![LayerState::new(StateKind::Entry), LayerState::new(StateKind::Any)];
        assert!(matches!(layer.initialize(), Err(GraphError::MissingObject { .. })));
    }
}
