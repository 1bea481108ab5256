//! Keyed objects and keyed properties: the per-target tracks of an animation.

use vizij_rive_codec::PropertyValue;

use crate::animation::keyframe::{InterpolationType, KeyFrame};
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::scene::set_u32;
use crate::target::PropertyTarget;

/// Receives callback keyframes crossed while a timeline advances.
pub trait KeyedCallbackReporter {
    /// `elapsed_seconds` is how long ago, in animation time, the keyframe
    /// was crossed.
    fn report_keyed_callback(&mut self, object_id: u32, property_key: u32, elapsed_seconds: f32);
}

/// A crossed callback keyframe, as collected by a `Vec` reporter.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedCallback {
    pub object_id: u32,
    pub property_key: u32,
    pub elapsed_seconds: f32,
}

impl KeyedCallbackReporter for Vec<KeyedCallback> {
    fn report_keyed_callback(&mut self, object_id: u32, property_key: u32, elapsed_seconds: f32) {
        self.push(KeyedCallback {
            object_id,
            property_key,
            elapsed_seconds,
        });
    }
}

/// Keyframes for one property of one object, ordered by time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyedProperty {
    pub property_key: u32,
    pub keyframes: Vec<KeyFrame>,
}

impl KeyedProperty {
    /// The property this track drives, or `None` when the stored key does
    /// not fit a property key.
    pub fn key(&self) -> Option<u16> {
        u16::try_from(self.property_key).ok()
    }

    /// Tracks made of callback keyframes report instead of applying.
    pub fn is_callback(&self) -> bool {
        self.keyframes.first().is_some_and(|k| k.value.is_callback())
    }

    pub fn first(&self) -> Option<&KeyFrame> {
        self.keyframes.first()
    }

    /// Index of the first keyframe at or after `seconds`, or `len` past the end.
    pub fn closest_frame_index(&self, seconds: f32) -> usize {
        let Some(last) = self.keyframes.last() else {
            return 0;
        };
        if seconds > last.seconds {
            return self.keyframes.len();
        }
        let mut start = 0usize;
        let mut end = self.keyframes.len();
        while start < end {
            let mid = (start + end) / 2;
            let closest = self.keyframes[mid].seconds;
            if closest < seconds {
                start = mid + 1;
            } else if closest > seconds {
                end = mid;
            } else {
                return mid;
            }
        }
        start
    }

    pub fn apply(&self, target: &mut dyn PropertyTarget, object_id: u32, seconds: f32, mix: f32) {
        if self.keyframes.is_empty() || self.is_callback() {
            return;
        }
        let Some(key) = self.key() else {
            return;
        };
        let index = self.closest_frame_index(seconds);
        if index == 0 {
            self.keyframes[0].apply(target, object_id, key, mix);
        } else if index < self.keyframes.len() {
            let from = &self.keyframes[index - 1];
            let to = &self.keyframes[index];
            if seconds == to.seconds {
                to.apply(target, object_id, key, mix);
            } else if from.interpolation() == InterpolationType::Hold {
                from.apply(target, object_id, key, mix);
            } else {
                from.apply_interpolation(target, object_id, key, seconds, to, mix);
            }
        } else {
            self.keyframes[index - 1].apply(target, object_id, key, mix);
        }
    }

    /// Reports every callback keyframe between `from` and `to`. The segment
    /// is half open at `from` unless `include_from` is set.
    pub fn report_keyed_callbacks(
        &self,
        reporter: &mut dyn KeyedCallbackReporter,
        object_id: u32,
        from: f32,
        to: f32,
        include_from: bool,
    ) {
        if from == to || !self.is_callback() {
            return;
        }
        let forward = from < to;
        let crossed = |seconds: f32| {
            let past_from = if forward { seconds > from } else { seconds < from };
            let before_to = if forward { seconds <= to } else { seconds >= to };
            (past_from || (include_from && seconds == from)) && before_to
        };
        let mut report = |frame: &KeyFrame| {
            reporter.report_keyed_callback(object_id, self.property_key, (to - frame.seconds).abs());
        };
        if forward {
            self.keyframes.iter().filter(|k| crossed(k.seconds)).for_each(&mut report);
        } else {
            self.keyframes.iter().rev().filter(|k| crossed(k.seconds)).for_each(&mut report);
        }
    }
}

impl Core for KeyedProperty {
    fn core_type(&self) -> u16 {
        tk::KEYED_PROPERTY
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        (key == pk::KEYED_PROPERTY_KEY).then_some(PropertyValue::Uint(self.property_key))
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        key == pk::KEYED_PROPERTY_KEY && set_u32(&mut self.property_key, value)
    }
}

/// All keyed properties an animation drives on a single object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyedObject {
    pub object_id: u32,
    pub properties: Vec<KeyedProperty>,
}

impl KeyedObject {
    pub fn apply(&self, target: &mut dyn PropertyTarget, seconds: f32, mix: f32) {
        for property in &self.properties {
            property.apply(target, self.object_id, seconds, mix);
        }
    }

    pub fn report_keyed_callbacks(
        &self,
        reporter: &mut dyn KeyedCallbackReporter,
        from: f32,
        to: f32,
        include_from: bool,
    ) {
        for property in &self.properties {
            property.report_keyed_callbacks(reporter, self.object_id, from, to, include_from);
        }
    }
}

impl Core for KeyedObject {
    fn core_type(&self) -> u16 {
        tk::KEYED_OBJECT
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        (key == pk::KEYED_OBJECT_ID).then_some(PropertyValue::Uint(self.object_id))
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        key == pk::KEYED_OBJECT_ID && set_u32(&mut self.object_id, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::keyframe::KeyFrameValue;
    use hashbrown::HashMap;

    #[derive(Default)]
    struct Store(HashMap<(u32, u16), PropertyValue>);

    impl PropertyTarget for Store {
        fn property(&self, object_id: u32, property_key: u16) -> Option<PropertyValue> {
            self.0.get(&(object_id, property_key)).cloned()
        }

        fn set_property(&mut self, object_id: u32, property_key: u16, value: PropertyValue) -> bool {
            self.0.insert((object_id, property_key), value);
            true
        }
    }

    fn track(frames: &[(f32, f32, u32)]) -> KeyedProperty {
        KeyedProperty {
            property_key: pk::X as u32,
            keyframes: frames
                .iter()
                .map(|(s, v, interp)| {
                    let mut kf = KeyFrame::new(KeyFrameValue::Double(*v));
                    kf.seconds = *s;
                    kf.interpolation_type = *interp;
                    kf
                })
                .collect(),
        }
    }

    fn x(store: &Store) -> f32 {
        store.0[&(1, pk::X)].as_double().unwrap()
    }

    #[test]
    fn closest_index_brackets_time() {
        let t = track(&[(0.0, 0.0, 1), (1.0, 10.0, 1), (2.0, 20.0, 1)]);
        assert_eq!(t.closest_frame_index(-1.0), 0);
        assert_eq!(t.closest_frame_index(0.0), 0);
        assert_eq!(t.closest_frame_index(0.5), 1);
        assert_eq!(t.closest_frame_index(1.0), 1);
        assert_eq!(t.closest_frame_index(1.5), 2);
        assert_eq!(t.closest_frame_index(2.0), 2);
        assert_eq!(t.closest_frame_index(2.5), 3);
    }

    #[test]
    fn applies_linear_hold_and_ends() {
        let t = track(&[(1.0, 10.0, 1), (2.0, 20.0, 0), (3.0, 30.0, 1)]);
        let mut store = Store::default();
        t.apply(&mut store, 1, 0.0, 1.0);
        assert_eq!(x(&store), 10.0);
        t.apply(&mut store, 1, 1.5, 1.0);
        assert_eq!(x(&store), 15.0);
        t.apply(&mut store, 1, 2.5, 1.0);
        assert_eq!(x(&store), 20.0, "hold keeps the from value");
        t.apply(&mut store, 1, 3.0, 1.0);
        assert_eq!(x(&store), 30.0);
        t.apply(&mut store, 1, 9.0, 1.0);
        assert_eq!(x(&store), 30.0);
    }

    fn callbacks(seconds: &[f32]) -> KeyedProperty {
        KeyedProperty {
            property_key: 9,
            keyframes: seconds
                .iter()
                .map(|s| {
                    let mut kf = KeyFrame::new(KeyFrameValue::Callback);
                    kf.seconds = *s;
                    kf
                })
                .collect(),
        }
    }

    fn crossed(track: &KeyedProperty, from: f32, to: f32, include_from: bool) -> Vec<f32> {
        let mut reported: Vec<KeyedCallback> = Vec::new();
        track.report_keyed_callbacks(&mut reported, 4, from, to, include_from);
        reported.iter().map(|c| c.elapsed_seconds).collect()
    }

    #[test]
    fn callbacks_report_half_open_segments() {
        let t = callbacks(&[0.0, 0.5, 1.0]);
        assert_eq!(crossed(&t, 0.0, 0.5, false), vec![0.0]);
        assert_eq!(crossed(&t, 0.0, 0.5, true), vec![0.5, 0.0]);
        assert_eq!(crossed(&t, 0.5, 1.0, false), vec![0.0]);
        assert!(crossed(&t, 0.6, 0.9, true).is_empty());
        assert!(crossed(&t, 0.5, 0.5, true).is_empty());
    }

    /// It should walk backward segments from the end toward the start.
    #[test]
    fn callbacks_report_in_reverse() {
        let t = callbacks(&[0.0, 0.5, 1.0]);
        assert_eq!(crossed(&t, 1.0, 0.25, false), vec![0.25]);
        assert_eq!(crossed(&t, 1.0, 0.0, true), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn callback_tracks_never_write_values() {
        let t = callbacks(&[0.0]);
        let mut store = Store::default();
        t.apply(&mut store, 1, 0.0, 1.0);
        assert!(store.0.is_empty());
        let mut reported: Vec<KeyedCallback> = Vec::new();
        track(&[(0.0, 1.0, 1)]).report_keyed_callbacks(&mut reported, 1, 0.0, 1.0, true);
        assert!(reported.is_empty());
    }

    /// It should refuse keys wider than a property key instead of truncating.
    #[test]
    fn oversized_property_keys_do_not_alias() {
        let mut t = track(&[(0.0, 5.0, 1)]);
        t.property_key = 65536 + u32::from(pk::X);
        assert_eq!(t.key(), None);
        let mut store = Store::default();
        t.apply(&mut store, 1, 0.0, 1.0);
        assert!(store.0.get(&(1, pk::X)).is_none());
    }

    #[test]
    fn partial_mix_blends_with_current() {
        let t = track(&[(0.0, 100.0, 1)]);
        let mut store = Store::default();
        store.set_property(1, pk::X, PropertyValue::Double(0.0));
        t.apply(&mut store, 1, 0.0, 0.25);
        assert_eq!(x(&store), 25.0);
    }
}
