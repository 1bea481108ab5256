//! Transition conditions evaluated against input values.

use vizij_rive_codec::PropertyValue;

use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::error::GraphError;
use crate::scene::{set_f32, set_u32};
use crate::state_machine::input::{InputInstance, InputKind, StateMachineInput};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConditionOp {
    Equal,
    NotEqual,
    LessThanOrEqual,
    GreaterThanOrEqual,
    LessThan,
    GreaterThan,
}

impl ConditionOp {
    pub fn from_value(value: u32) -> Self {
        match value {
            1 => ConditionOp::NotEqual,
            2 => ConditionOp::LessThanOrEqual,
            3 => ConditionOp::GreaterThanOrEqual,
            4 => ConditionOp::LessThan,
            5 => ConditionOp::GreaterThan,
            _ => ConditionOp::Equal,
        }
    }

    pub fn value(self) -> u32 {
        match self {
            ConditionOp::Equal => 0,
            ConditionOp::NotEqual => 1,
            ConditionOp::LessThanOrEqual => 2,
            ConditionOp::GreaterThanOrEqual => 3,
            ConditionOp::LessThan => 4,
            ConditionOp::GreaterThan => 5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConditionKind {
    Trigger,
    Bool,
    Number { value: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionCondition {
    pub input_id: u32,
    pub op_value: u32,
    pub kind: ConditionKind,
}

impl TransitionCondition {
    pub fn new(kind: ConditionKind, input_id: u32, op: ConditionOp) -> Self {
        Self {
            input_id,
            op_value: op.value(),
            kind,
        }
    }

    pub fn op(&self) -> ConditionOp {
        ConditionOp::from_value(self.op_value)
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self.kind, ConditionKind::Trigger)
    }

    /// Checks the referenced input exists and has the kind this condition reads.
    pub(crate) fn validate(&self, inputs: &[StateMachineInput]) -> Result<(), GraphError> {
        let Some(input) = inputs.get(self.input_id as usize) else {
            return Err(GraphError::missing(self.input_id, "state machine input"));
        };
        let matches = matches!(
            (self.kind, input.kind),
            (ConditionKind::Trigger, InputKind::Trigger)
                | (ConditionKind::Bool, InputKind::Bool(_))
                | (ConditionKind::Number { .. }, InputKind::Number(_))
        );
        if matches {
            Ok(())
        } else {
            Err(GraphError::invalid(
                self.input_id,
                format!("condition cannot read input '{}'", input.name),
            ))
        }
    }

    pub fn evaluate(&self, inputs: &[InputInstance]) -> bool {
        let Some(input) = inputs.get(self.input_id as usize) else {
            return false;
        };
        match self.kind {
            ConditionKind::Trigger => input.fired(),
            ConditionKind::Bool => match input.boolean() {
                Some(value) => {
                    (value && self.op() == ConditionOp::Equal)
                        || (!value && self.op() == ConditionOp::NotEqual)
                }
                None => false,
            },
            ConditionKind::Number { value } => match input.number() {
                Some(current) => match self.op() {
                    ConditionOp::Equal => current == value,
                    ConditionOp::NotEqual => current != value,
                    ConditionOp::LessThanOrEqual => current <= value,
                    ConditionOp::GreaterThanOrEqual => current >= value,
                    ConditionOp::LessThan => current < value,
                    ConditionOp::GreaterThan => current > value,
                },
                None => false,
            },
        }
    }
}

impl Core for TransitionCondition {
    fn core_type(&self) -> u16 {
        match self.kind {
            ConditionKind::Trigger => tk::TRANSITION_TRIGGER_CONDITION,
            ConditionKind::Bool => tk::TRANSITION_BOOL_CONDITION,
            ConditionKind::Number { .. } => tk::TRANSITION_NUMBER_CONDITION,
        }
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match (key, self.kind) {
            (pk::CONDITION_INPUT_ID, _) => Some(PropertyValue::Uint(self.input_id)),
            (pk::CONDITION_OP_VALUE, ConditionKind::Bool | ConditionKind::Number { .. }) => {
                Some(PropertyValue::Uint(self.op_value))
            }
            (pk::NUMBER_CONDITION_VALUE, ConditionKind::Number { value }) => {
                Some(PropertyValue::Double(value))
            }
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, &mut self.kind) {
            (pk::CONDITION_INPUT_ID, _) => set_u32(&mut self.input_id, value),
            (pk::CONDITION_OP_VALUE, ConditionKind::Bool | ConditionKind::Number { .. }) => {
                set_u32(&mut self.op_value, value)
            }
            (pk::NUMBER_CONDITION_VALUE, ConditionKind::Number { value: slot }) => {
                set_f32(slot, value)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::input::InputValue;

    fn inputs() -> Vec<InputInstance> {
        vec![
            InputInstance {
                name: "n".into(),
                value: InputValue::Number(3.0),
            },
            InputInstance {
                name: "b".into(),
                value: InputValue::Bool(true),
            },
            InputInstance {
                name: "t".into(),
                value: InputValue::Trigger { fired: true },
            },
        ]
    }

    #[test]
    fn number_ops() {
        let inputs = inputs();
        let check = |op, value| {
            TransitionCondition::new(ConditionKind::Number { value }, 0, op).evaluate(&inputs)
        };
        assert!(check(ConditionOp::Equal, 3.0));
        assert!(!check(ConditionOp::NotEqual, 3.0));
        assert!(check(ConditionOp::LessThanOrEqual, 3.0));
        assert!(check(ConditionOp::GreaterThanOrEqual, 3.0));
        assert!(!check(ConditionOp::LessThan, 3.0));
        assert!(check(ConditionOp::GreaterThan, 2.0));
    }

    #[test]
    fn bool_and_trigger() {
        let inputs = inputs();
        assert!(TransitionCondition::new(ConditionKind::Bool, 1, ConditionOp::Equal).evaluate(&inputs));
        assert!(!TransitionCondition::new(ConditionKind::Bool, 1, ConditionOp::NotEqual).evaluate(&inputs));
        assert!(TransitionCondition::new(ConditionKind::Trigger, 2, ConditionOp::Equal).evaluate(&inputs));
        // Wrong input kind and out of range ids never pass.
        assert!(!TransitionCondition::new(ConditionKind::Trigger, 0, ConditionOp::Equal).evaluate(&inputs));
        assert!(!TransitionCondition::new(ConditionKind::Bool, 9, ConditionOp::Equal).evaluate(&inputs));
    }

    #[test]
    fn validate_checks_input_kind() {
        let defs = vec![StateMachineInput::new("n", InputKind::Number(0.0))];
        let ok = TransitionCondition::new(ConditionKind::Number { value: 1.0 }, 0, ConditionOp::Equal);
        assert!(ok.validate(&defs).is_ok());
        let wrong = TransitionCondition::new(ConditionKind::Trigger, 0, ConditionOp::Equal);
        assert!(matches!(wrong.validate(&defs), Err(GraphError::InvalidObject { .. })));
        let missing = TransitionCondition::new(ConditionKind::Bool, 4, ConditionOp::Equal);
        assert!(matches!(missing.validate(&defs), Err(GraphError::MissingObject { .. })));
    }
}
