//! Records an artboard's animated properties and state machine inputs so a
//! host can put both back later, e.g. when rewinding a preview.

use hashbrown::HashMap;
use vizij_rive_codec::FieldType;

use crate::artboard::Artboard;
use crate::core::registry;
use crate::reset::AnimationReset;
use crate::state_machine::{InputInstance, InputValue, StateMachine, StateMachineInstance};
use crate::target::PropertyTarget;

#[derive(Clone, Debug, Default)]
pub struct PropertyRecorder {
    properties: AnimationReset,
    /// One entry per input, triggers included so indices line up.
    inputs: Vec<InputValue>,
}

impl PropertyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.properties.clear();
        self.inputs.clear();
    }

    /// Records the inputs and every keyed property of the artboard's first
    /// state machine. Inputs take their default values.
    pub fn record_artboard(&mut self, artboard: &Artboard) {
        self.clear();
        let Some(machine) = artboard.state_machines().first() else {
            return;
        };
        self.inputs = machine
            .inputs
            .iter()
            .map(|input| InputInstance::from_definition(input).value)
            .collect();
        self.record_properties(machine, artboard);
    }

    /// Like [`record_artboard`](Self::record_artboard) but takes the live
    /// input values of `instance`.
    pub fn record_instance(&mut self, instance: &StateMachineInstance, target: &dyn PropertyTarget) {
        self.clear();
        self.inputs = instance
            .inputs()
            .iter()
            .map(|input| input.value.clone())
            .collect();
        self.record_properties(instance.machine(), target);
    }

    fn record_properties(&mut self, machine: &StateMachine, target: &dyn PropertyTarget) {
        let mut entries: Vec<(u32, Vec<u16>)> = Vec::new();
        let mut slots: HashMap<u32, usize> = HashMap::new();
        let states = machine.layers.iter().flat_map(|layer| layer.states.iter());
        for animation in states.flat_map(|state| state.animations()) {
            for object in &animation.keyed_objects {
                let slot = *slots.entry(object.object_id).or_insert_with(|| {
                    entries.push((object.object_id, Vec::new()));
                    entries.len() - 1
                });
                for property in object.properties.iter().filter(|p| !p.is_callback()) {
                    let Some(key) = property.key() else {
                        continue;
                    };
                    let recordable = matches!(
                        registry::property_field_type(key),
                        Some(
                            FieldType::Double
                                | FieldType::Color
                                | FieldType::Uint
                                | FieldType::String
                                | FieldType::Bool
                        )
                    );
                    if recordable && !entries[slot].1.contains(&key) {
                        entries[slot].1.push(key);
                    }
                }
            }
        }
        self.properties.snapshot(target, &entries);
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    pub fn inputs(&self) -> &[InputValue] {
        &self.inputs
    }

    /// Writes the recorded property values back.
    pub fn apply(&self, target: &mut dyn PropertyTarget) {
        self.properties.apply(target);
    }

    /// Restores recorded number and bool inputs by index. Triggers are left
    /// alone. Returns how many inputs were restored.
    pub fn apply_inputs(&self, instance: &mut StateMachineInstance) -> usize {
        let mut restored = 0;
        for (index, value) in self.inputs.iter().enumerate() {
            if matches!(value, InputValue::Trigger { .. }) {
                continue;
            }
            if instance.restore_input(index, value.clone()) {
                restored += 1;
            }
        }
        restored
    }
}
