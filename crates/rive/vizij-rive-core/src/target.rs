//! Property access seam between timelines and the object graph.
//!
//! Keyframes write through [`PropertyTarget`] so they never hold references
//! into the artboard arena. The artboard implements it and marks dirt on
//! every write that changes a value.

use vizij_rive_codec::PropertyValue;

/// Addressable property store keyed by object id and property key.
pub trait PropertyTarget {
    fn property(&self, object_id: u32, property_key: u16) -> Option<PropertyValue>;

    /// Returns false when the object or key does not exist or the value has the wrong type.
    fn set_property(&mut self, object_id: u32, property_key: u16, value: PropertyValue) -> bool;

    /// Blends a double toward `value`. A mix of 1 writes `value` exactly.
    fn mix_double(&mut self, object_id: u32, property_key: u16, value: f32, mix: f32) {
        let value = if mix == 1.0 {
            value
        } else {
            let current = self
                .property(object_id, property_key)
                .and_then(|v| v.as_double())
                .unwrap_or(0.0);
            current * (1.0 - mix) + value * mix
        };
        self.set_property(object_id, property_key, PropertyValue::Double(value));
    }

    /// Blends an ARGB color channel-wise toward `value`.
    fn mix_color(&mut self, object_id: u32, property_key: u16, value: u32, mix: f32) {
        let value = if mix == 1.0 {
            value
        } else {
            let current = self
                .property(object_id, property_key)
                .and_then(|v| v.as_color())
                .unwrap_or(0);
            lerp_color(current, value, mix)
        };
        self.set_property(object_id, property_key, PropertyValue::Color(value));
    }
}

#[inline]
fn channel(color: u32, shift: u32) -> f32 {
    ((color >> shift) & 0xff) as f32
}

/// Per-channel ARGB lerp, rounded to the nearest integer channel value.
pub fn lerp_color(from: u32, to: u32, mix: f32) -> u32 {
    let mixi = 1.0 - mix;
    let mut out = 0u32;
    for shift in [24, 16, 8, 0] {
        let v = (channel(from, shift) * mixi + channel(to, shift) * mix)
            .round()
            .clamp(0.0, 255.0) as u32;
        out |= v << shift;
    }
    out
}

/// Scales the alpha channel of an ARGB color.
pub fn color_with_opacity(color: u32, opacity: f32) -> u32 {
    let alpha = (channel(color, 24) * opacity).round().clamp(0.0, 255.0) as u32;
    (color & 0x00ff_ffff) | (alpha << 24)
}
