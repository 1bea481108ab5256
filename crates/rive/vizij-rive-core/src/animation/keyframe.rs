//! Typed keyframes and their interpolation onto a property.

use std::sync::Arc;

use vizij_rive_codec::PropertyValue;

use crate::animation::interpolator::Interpolator;
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::scene::set_u32;
use crate::target::{lerp_color, PropertyTarget};

/// How a keyframe moves toward the next one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InterpolationType {
    Hold,
    Linear,
    Cubic,
}

impl InterpolationType {
    pub fn from_value(value: u32) -> Self {
        match value {
            0 => InterpolationType::Hold,
            2 => InterpolationType::Cubic,
            _ => InterpolationType::Linear,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum KeyFrameValue {
    Double(f32),
    Color(u32),
    Id(u32),
    Bool(bool),
    String(String),
    /// Marks a moment on the timeline. Carries no value and is reported
    /// instead of applied.
    Callback,
}

impl KeyFrameValue {
    fn value_key(&self) -> Option<u16> {
        match self {
            KeyFrameValue::Double(_) => Some(pk::KEYFRAME_DOUBLE_VALUE),
            KeyFrameValue::Color(_) => Some(pk::KEYFRAME_COLOR_VALUE),
            KeyFrameValue::Id(_) => Some(pk::KEYFRAME_ID_VALUE),
            KeyFrameValue::Bool(_) => Some(pk::KEYFRAME_BOOL_VALUE),
            KeyFrameValue::String(_) => Some(pk::KEYFRAME_STRING_VALUE),
            KeyFrameValue::Callback => None,
        }
    }

    pub fn to_property_value(&self) -> Option<PropertyValue> {
        Some(match self {
            KeyFrameValue::Double(v) => PropertyValue::Double(*v),
            KeyFrameValue::Color(v) => PropertyValue::Color(*v),
            KeyFrameValue::Id(v) => PropertyValue::Uint(*v),
            KeyFrameValue::Bool(v) => PropertyValue::Bool(*v),
            KeyFrameValue::String(v) => PropertyValue::String(v.clone()),
            KeyFrameValue::Callback => return None,
        })
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, KeyFrameValue::Callback)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyFrame {
    pub frame: u32,
    pub interpolation_type: u32,
    /// `u32::MAX` when the keyframe has no interpolator.
    pub interpolator_id: u32,
    pub value: KeyFrameValue,
    pub(crate) seconds: f32,
    pub(crate) interpolator: Option<Arc<Interpolator>>,
}

impl KeyFrame {
    pub fn new(value: KeyFrameValue) -> Self {
        Self {
            frame: 0,
            interpolation_type: 1,
            interpolator_id: u32::MAX,
            value,
            seconds: 0.0,
            interpolator: None,
        }
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    pub fn interpolation(&self) -> InterpolationType {
        InterpolationType::from_value(self.interpolation_type)
    }

    pub(crate) fn compute_seconds(&mut self, fps: u32) {
        self.seconds = if fps == 0 {
            0.0
        } else {
            self.frame as f32 / fps as f32
        };
    }

    /// Writes this keyframe's value as-is, blended by `mix`.
    pub fn apply(&self, target: &mut dyn PropertyTarget, object_id: u32, property_key: u16, mix: f32) {
        match &self.value {
            KeyFrameValue::Double(v) => target.mix_double(object_id, property_key, *v, mix),
            KeyFrameValue::Color(v) => target.mix_color(object_id, property_key, *v, mix),
            other => {
                if let Some(value) = other.to_property_value() {
                    target.set_property(object_id, property_key, value);
                }
            }
        }
    }

    /// Interpolates from this keyframe toward `next` at `seconds`.
    ///
    /// Only doubles and colors interpolate; other values hold.
    pub fn apply_interpolation(
        &self,
        target: &mut dyn PropertyTarget,
        object_id: u32,
        property_key: u16,
        seconds: f32,
        next: &KeyFrame,
        mix: f32,
    ) {
        let span = next.seconds - self.seconds;
        let mut f = if span > 0.0 {
            (seconds - self.seconds) / span
        } else {
            1.0
        };
        match (&self.value, &next.value) {
            (KeyFrameValue::Double(from), KeyFrameValue::Double(to)) => {
                let value = match &self.interpolator {
                    Some(interp) => interp.transform_value(*from, *to, f),
                    None => from + (to - from) * f,
                };
                target.mix_double(object_id, property_key, value, mix);
            }
            (KeyFrameValue::Color(from), KeyFrameValue::Color(to)) => {
                if let Some(interp) = &self.interpolator {
                    f = interp.transform(f);
                }
                target.mix_color(object_id, property_key, lerp_color(*from, *to, f), mix);
            }
            _ => self.apply(target, object_id, property_key, mix),
        }
    }
}

impl Core for KeyFrame {
    fn core_type(&self) -> u16 {
        match self.value {
            KeyFrameValue::Double(_) => tk::KEYFRAME_DOUBLE,
            KeyFrameValue::Color(_) => tk::KEYFRAME_COLOR,
            KeyFrameValue::Id(_) => tk::KEYFRAME_ID,
            KeyFrameValue::Bool(_) => tk::KEYFRAME_BOOL,
            KeyFrameValue::String(_) => tk::KEYFRAME_STRING,
            KeyFrameValue::Callback => tk::KEYFRAME_CALLBACK,
        }
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::FRAME => Some(PropertyValue::Uint(self.frame)),
            pk::INTERPOLATION_TYPE => Some(PropertyValue::Uint(self.interpolation_type)),
            pk::INTERPOLATOR_ID => Some(PropertyValue::Uint(self.interpolator_id)),
            key if Some(key) == self.value.value_key() => self.value.to_property_value(),
            _ => None,
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::FRAME => set_u32(&mut self.frame, value),
            pk::INTERPOLATION_TYPE => set_u32(&mut self.interpolation_type, value),
            pk::INTERPOLATOR_ID => set_u32(&mut self.interpolator_id, value),
            _ => {
                let slot = &mut self.value;
                match (slot, value) {
                    (KeyFrameValue::Double(s), PropertyValue::Double(v))
                        if key == pk::KEYFRAME_DOUBLE_VALUE =>
                    {
                        *s = v
                    }
                    (KeyFrameValue::Color(s), PropertyValue::Color(v))
                        if key == pk::KEYFRAME_COLOR_VALUE =>
                    {
                        *s = v
                    }
                    (KeyFrameValue::Id(s), PropertyValue::Uint(v)) if key == pk::KEYFRAME_ID_VALUE => {
                        *s = v
                    }
                    (KeyFrameValue::Bool(s), PropertyValue::Bool(v))
                        if key == pk::KEYFRAME_BOOL_VALUE =>
                    {
                        *s = v
                    }
                    (KeyFrameValue::String(s), PropertyValue::String(v))
                        if key == pk::KEYFRAME_STRING_VALUE =>
                    {
                        *s = v
                    }
                    _ => return false,
                }
                true
            }
        }
    }
}
