//! LinearAnimation: a named timeline of keyed objects.

use serde::{Deserialize, Serialize};
use vizij_rive_codec::PropertyValue;

use crate::animation::keyed::{KeyedCallbackReporter, KeyedObject};
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::scene::{set_bool, set_f32, set_u32};
use crate::target::PropertyTarget;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loop {
    OneShot,
    Loop,
    PingPong,
}

impl Loop {
    pub fn from_value(value: u32) -> Self {
        match value {
            1 => Loop::Loop,
            2 => Loop::PingPong,
            _ => Loop::OneShot,
        }
    }

    pub fn value(self) -> u32 {
        match self {
            Loop::OneShot => 0,
            Loop::Loop => 1,
            Loop::PingPong => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearAnimation {
    pub name: String,
    pub fps: u32,
    /// Length in frames.
    pub duration: u32,
    pub speed: f32,
    pub loop_value: u32,
    pub work_start: u32,
    pub work_end: u32,
    pub enable_work_area: bool,
    /// Snap sampled time down to whole frames.
    pub quantize: bool,
    pub keyed_objects: Vec<KeyedObject>,
}

impl Default for LinearAnimation {
    fn default() -> Self {
        Self {
            name: String::new(),
            fps: 60,
            duration: 60,
            speed: 1.0,
            loop_value: 0,
            work_start: u32::MAX,
            work_end: u32::MAX,
            enable_work_area: false,
            quantize: false,
            keyed_objects: Vec::new(),
        }
    }
}

impl LinearAnimation {
    pub fn loop_type(&self) -> Loop {
        Loop::from_value(self.loop_value)
    }

    /// First frame of the playable range.
    pub fn start_frame(&self) -> u32 {
        if self.enable_work_area {
            self.work_start
        } else {
            0
        }
    }

    /// Last frame of the playable range.
    pub fn end_frame(&self) -> u32 {
        if self.enable_work_area {
            self.work_end
        } else {
            self.duration
        }
    }

    fn frames_to_seconds(&self, frames: u32) -> f32 {
        if self.fps == 0 {
            0.0
        } else {
            frames as f32 / self.fps as f32
        }
    }

    pub fn start_seconds(&self) -> f32 {
        self.frames_to_seconds(self.start_frame())
    }

    pub fn end_seconds(&self) -> f32 {
        self.frames_to_seconds(self.end_frame())
    }

    pub fn duration_seconds(&self) -> f32 {
        (self.end_seconds() - self.start_seconds()).abs()
    }

    /// Where playback begins given the animation's own speed.
    pub fn start_time(&self) -> f32 {
        if self.speed >= 0.0 {
            self.start_seconds()
        } else {
            self.end_seconds()
        }
    }

    /// Where reversed playback begins given the animation's own speed.
    pub fn end_time(&self) -> f32 {
        if self.speed >= 0.0 {
            self.end_seconds()
        } else {
            self.start_seconds()
        }
    }

    /// Time actually sampled for `seconds`, floored to a frame when quantized.
    pub fn global_to_local_seconds(&self, seconds: f32) -> f32 {
        if self.quantize && self.fps > 0 {
            let fps = self.fps as f32;
            (seconds * fps).floor() / fps
        } else {
            seconds
        }
    }

    /// Applies every keyed object at `seconds`.
    pub fn apply(&self, target: &mut dyn PropertyTarget, seconds: f32, mix: f32) {
        let seconds = self.global_to_local_seconds(seconds);
        for object in &self.keyed_objects {
            object.apply(target, seconds, mix);
        }
    }

    /// Reports callback keyframes crossed moving from `from` to `to`.
    pub fn report_keyed_callbacks(
        &self,
        reporter: &mut dyn KeyedCallbackReporter,
        from: f32,
        to: f32,
        include_from: bool,
    ) {
        for object in &self.keyed_objects {
            object.report_keyed_callbacks(reporter, from, to, include_from);
        }
    }

    /// Converts keyframe frame numbers to seconds. Run once after import.
    pub(crate) fn compute_keyframe_seconds(&mut self) {
        let fps = self.fps;
        for property in self
            .keyed_objects
            .iter_mut()
            .flat_map(|o| o.properties.iter_mut())
        {
            for keyframe in &mut property.keyframes {
                keyframe.compute_seconds(fps);
            }
        }
    }
}

impl Core for LinearAnimation {
    fn core_type(&self) -> u16 {
        tk::LINEAR_ANIMATION
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        Some(match key {
            pk::ANIMATION_NAME => PropertyValue::String(self.name.clone()),
            pk::FPS => PropertyValue::Uint(self.fps),
            pk::DURATION => PropertyValue::Uint(self.duration),
            pk::SPEED => PropertyValue::Double(self.speed),
            pk::LOOP_VALUE => PropertyValue::Uint(self.loop_value),
            pk::WORK_START => PropertyValue::Uint(self.work_start),
            pk::WORK_END => PropertyValue::Uint(self.work_end),
            pk::ENABLE_WORK_AREA => PropertyValue::Bool(self.enable_work_area),
            pk::QUANTIZE => PropertyValue::Bool(self.quantize),
            _ => return None,
        })
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, value) {
            (pk::ANIMATION_NAME, PropertyValue::String(v)) => {
                self.name = v;
                true
            }
            (pk::FPS, v) => set_u32(&mut self.fps, v),
            (pk::DURATION, v) => set_u32(&mut self.duration, v),
            (pk::SPEED, v) => set_f32(&mut self.speed, v),
            (pk::LOOP_VALUE, v) => set_u32(&mut self.loop_value, v),
            (pk::WORK_START, v) => set_u32(&mut self.work_start, v),
            (pk::WORK_END, v) => set_u32(&mut self.work_end, v),
            (pk::ENABLE_WORK_AREA, v) => set_bool(&mut self.enable_work_area, v),
            (pk::QUANTIZE, v) => set_bool(&mut self.quantize, v),
            _ => false,
        }
    }
}
