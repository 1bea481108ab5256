//! State machine inputs: definitions and their per-instance values.

use serde::{Deserialize, Serialize};
use vizij_rive_codec::PropertyValue;

use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputKind {
    /// Number input with its default value.
    Number(f32),
    /// Bool input with its default value.
    Bool(bool),
    Trigger,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateMachineInput {
    pub name: String,
    pub kind: InputKind,
}

impl StateMachineInput {
    pub fn new(name: impl Into<String>, kind: InputKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl Core for StateMachineInput {
    fn core_type(&self) -> u16 {
        match self.kind {
            InputKind::Number(_) => tk::STATE_MACHINE_NUMBER,
            InputKind::Bool(_) => tk::STATE_MACHINE_BOOL,
            InputKind::Trigger => tk::STATE_MACHINE_TRIGGER,
        }
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match (key, self.kind) {
            (pk::STATE_MACHINE_COMPONENT_NAME, _) => Some(PropertyValue::String(self.name.clone())),
            (pk::NUMBER_INPUT_VALUE, InputKind::Number(v)) => Some(PropertyValue::Double(v)),
            (pk::BOOL_INPUT_VALUE, InputKind::Bool(v)) => Some(PropertyValue::Bool(v)),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, &mut self.kind, value) {
            (pk::STATE_MACHINE_COMPONENT_NAME, _, PropertyValue::String(v)) => self.name = v,
            (pk::NUMBER_INPUT_VALUE, InputKind::Number(slot), PropertyValue::Double(v)) => *slot = v,
            (pk::BOOL_INPUT_VALUE, InputKind::Bool(slot), PropertyValue::Bool(v)) => *slot = v,
            _ => return false,
        }
        true
    }
}

/// Live value of an input inside one state machine instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    Number(f32),
    Bool(bool),
    Trigger { fired: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputInstance {
    pub name: String,
    pub value: InputValue,
}

impl InputInstance {
    pub fn from_definition(input: &StateMachineInput) -> Self {
        let value = match input.kind {
            InputKind::Number(v) => InputValue::Number(v),
            InputKind::Bool(v) => InputValue::Bool(v),
            InputKind::Trigger => InputValue::Trigger { fired: false },
        };
        Self {
            name: input.name.clone(),
            value,
        }
    }

    pub fn number(&self) -> Option<f32> {
        match self.value {
            InputValue::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match self.value {
            InputValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn fired(&self) -> bool {
        matches!(self.value, InputValue::Trigger { fired: true })
    }

    /// Clears per-frame state once every layer has seen it.
    pub(crate) fn advanced(&mut self) {
        if let InputValue::Trigger { fired } = &mut self.value {
            *fired = false;
        }
    }
}
