//! Property snapshots that can be replayed to undo animation writes, and the
//! shared pool that recycles their buffers.
//!
//! A snapshot is a flat byte buffer of
//! `objectId varuint | count varuint | (key varuint | value)*` groups. Values
//! use the registry field type of their key, so the buffer reads back without
//! any side table.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use vizij_rive_codec::{BinaryReader, BinaryWriter, FieldType, PropertyValue};

use crate::animation::LinearAnimation;
use crate::core::registry;
use crate::target::PropertyTarget;

#[derive(Clone, Debug, Default)]
pub struct AnimationReset {
    writer: BinaryWriter,
}

/// Values collected per object before they are written, keeping first-seen order.
#[derive(Default)]
struct Collected {
    objects: Vec<(u32, Vec<(u16, PropertyValue)>)>,
    index: HashMap<u32, usize>,
}

impl Collected {
    fn contains(&self, object_id: u32, key: u16) -> bool {
        self.index
            .get(&object_id)
            .is_some_and(|&i| self.objects[i].1.iter().any(|(k, _)| *k == key))
    }

    fn push(&mut self, object_id: u32, key: u16, value: PropertyValue) {
        let slot = *self.index.entry(object_id).or_insert_with(|| {
            self.objects.push((object_id, Vec::new()));
            self.objects.len() - 1
        });
        self.objects[slot].1.push((key, value));
    }
}

impl AnimationReset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.size() == 0
    }

    pub fn size(&self) -> usize {
        self.writer.size()
    }

    pub fn clear(&mut self) {
        self.writer.clear();
    }

    /// Appends one object's group.
    pub fn write_object(&mut self, object_id: u32, values: &[(u16, PropertyValue)]) {
        if values.is_empty() {
            return;
        }
        self.writer.write_var_uint(u64::from(object_id));
        self.writer.write_var_uint(values.len() as u64);
        for (key, value) in values {
            self.writer.write_var_uint(u64::from(*key));
            value.write(&mut self.writer);
        }
    }

    /// Records the current value of every listed property that exists on `target`.
    pub fn snapshot(&mut self, target: &dyn PropertyTarget, entries: &[(u32, Vec<u16>)]) {
        let mut collected = Collected::default();
        for (object_id, keys) in entries {
            for &key in keys {
                if collected.contains(*object_id, key) {
                    continue;
                }
                if let Some(value) = target.property(*object_id, key) {
                    collected.push(*object_id, key, value);
                }
            }
        }
        self.write_collected(collected);
    }

    /// Records every double and color property keyed by `animations`. With
    /// `use_first_as_baseline` the first animation's first keyframe values
    /// are stored instead of the live ones.
    pub fn fill_from_animations(
        &mut self,
        animations: &[&LinearAnimation],
        target: &dyn PropertyTarget,
        use_first_as_baseline: bool,
    ) {
        let mut collected = Collected::default();
        for (index, animation) in animations.iter().enumerate() {
            let baseline = use_first_as_baseline && index == 0;
            for object in &animation.keyed_objects {
                for property in object.properties.iter().filter(|p| !p.is_callback()) {
                    let Some(key) = property.key() else {
                        continue;
                    };
                    if !matches!(
                        registry::property_field_type(key),
                        Some(FieldType::Double | FieldType::Color)
                    ) || collected.contains(object.object_id, key)
                    {
                        continue;
                    }
                    let value = if baseline {
                        property.first().and_then(|k| k.value.to_property_value())
                    } else {
                        target.property(object.object_id, key)
                    };
                    if let Some(value) = value {
                        collected.push(object.object_id, key, value);
                    }
                }
            }
        }
        self.write_collected(collected);
    }

    fn write_collected(&mut self, collected: Collected) {
        for (object_id, values) in &collected.objects {
            self.write_object(*object_id, values);
        }
    }

    /// Writes every recorded value back onto `target`.
    pub fn apply(&self, target: &mut dyn PropertyTarget) {
        let mut reader = BinaryReader::new(self.writer.bytes());
        while !reader.is_eof() {
            let object_id = reader.read_var_uint32();
            let count = reader.read_var_uint32();
            for _ in 0..count {
                let key = reader.read_var_uint32() as u16;
                let Some(field_type) = registry::property_field_type(key) else {
                    log::warn!("reset buffer holds unknown property {key}");
                    return;
                };
                let value = PropertyValue::read(field_type, &mut reader);
                if reader.did_overflow() {
                    return;
                }
                target.set_property(object_id, key, value);
            }
        }
    }
}

/// Free list of reset buffers shared by every state machine of a file.
#[derive(Debug)]
pub struct ResetPool {
    free: Mutex<Vec<AnimationReset>>,
    capacity: usize,
}

impl ResetPool {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            free: Mutex::new(Vec::new()),
            capacity,
        })
    }

    /// An empty reset, recycled when one is available.
    pub fn acquire(&self) -> AnimationReset {
        self.free.lock().pop().unwrap_or_default()
    }

    /// Clears `reset` and keeps it for reuse while under capacity.
    pub fn release(&self, mut reset: AnimationReset) {
        reset.clear();
        let mut free = self.free.lock();
        if free.len() < self.capacity {
            free.push(reset);
        }
    }

    /// Buffers currently waiting in the pool.
    pub fn resources_count(&self) -> usize {
        self.free.lock().len()
    }

    pub fn release_resources(&self) {
        self.free.lock().clear();
    }

    /// Acquires a reset and fills it from `animations`.
    pub fn from_animations(
        self: &Arc<Self>,
        animations: &[&LinearAnimation],
        target: &dyn PropertyTarget,
        use_first_as_baseline: bool,
    ) -> PooledReset {
        let mut reset = self.acquire();
        reset.fill_from_animations(animations, target, use_first_as_baseline);
        PooledReset {
            pool: Arc::clone(self),
            reset: Some(reset),
        }
    }
}

/// A reset on loan from a [`ResetPool`]; returns itself to the pool on drop.
#[derive(Debug)]
pub struct PooledReset {
    pool: Arc<ResetPool>,
    reset: Option<AnimationReset>,
}

impl PooledReset {
    pub fn apply(&self, target: &mut dyn PropertyTarget) {
        if let Some(reset) = &self.reset {
            reset.apply(target);
        }
    }

    pub fn reset(&self) -> Option<&AnimationReset> {
        self.reset.as_ref()
    }
}

impl Drop for PooledReset {
    fn drop(&mut self) {
        if let Some(reset) = self.reset.take() {
            self.pool.release(reset);
        }
    }
}
