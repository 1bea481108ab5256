//! Renderer-facing collaborator interfaces and the path geometry handed to them.
//!
//! The core never rasterizes. It builds [`RawPath`]s in world space and asks
//! a host [`Factory`] for backend objects, then issues draw calls through a
//! host [`Renderer`].

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::{Mat2D, Vec2D};

/// Bezier handle distance for a quarter circle.
const CIRCLE_CONSTANT: f32 = 0.552_284_8;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathVerb {
    Move(Vec2D),
    Line(Vec2D),
    Cubic(Vec2D, Vec2D, Vec2D),
    Close,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    verbs: Vec<PathVerb>,
}

impl RawPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.verbs.push(PathVerb::Move(Vec2D::new(x, y)));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.verbs.push(PathVerb::Line(Vec2D::new(x, y)));
    }

    pub fn cubic_to(&mut self, c1: Vec2D, c2: Vec2D, to: Vec2D) {
        self.verbs.push(PathVerb::Cubic(c1, c2, to));
    }

    pub fn close(&mut self) {
        self.verbs.push(PathVerb::Close);
    }

    pub fn add_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        self.move_to(left, top);
        self.line_to(right, top);
        self.line_to(right, bottom);
        self.line_to(left, bottom);
        self.close();
    }

    /// Rectangle with the same radius on every corner, clamped to half the
    /// shorter side.
    pub fn add_rounded_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32, radius: f32) {
        let radius = radius.min((right - left).abs() / 2.0).min((bottom - top).abs() / 2.0);
        if radius <= 0.0 {
            self.add_rect(left, top, right, bottom);
            return;
        }
        let k = radius * (1.0 - CIRCLE_CONSTANT);
        self.move_to(left + radius, top);
        self.line_to(right - radius, top);
        self.cubic_to(
            Vec2D::new(right - k, top),
            Vec2D::new(right, top + k),
            Vec2D::new(right, top + radius),
        );
        self.line_to(right, bottom - radius);
        self.cubic_to(
            Vec2D::new(right, bottom - k),
            Vec2D::new(right - k, bottom),
            Vec2D::new(right - radius, bottom),
        );
        self.line_to(left + radius, bottom);
        self.cubic_to(
            Vec2D::new(left + k, bottom),
            Vec2D::new(left, bottom - k),
            Vec2D::new(left, bottom - radius),
        );
        self.line_to(left, top + radius);
        self.cubic_to(
            Vec2D::new(left, top + k),
            Vec2D::new(left + k, top),
            Vec2D::new(left + radius, top),
        );
        self.close();
    }

    pub fn add_oval(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        let cx = (left + right) / 2.0;
        let cy = (top + bottom) / 2.0;
        let rx = (right - left) / 2.0;
        let ry = (bottom - top) / 2.0;
        let ox = rx * CIRCLE_CONSTANT;
        let oy = ry * CIRCLE_CONSTANT;
        self.move_to(cx, top);
        self.cubic_to(
            Vec2D::new(cx + ox, top),
            Vec2D::new(right, cy - oy),
            Vec2D::new(right, cy),
        );
        self.cubic_to(
            Vec2D::new(right, cy + oy),
            Vec2D::new(cx + ox, bottom),
            Vec2D::new(cx, bottom),
        );
        self.cubic_to(
            Vec2D::new(cx - ox, bottom),
            Vec2D::new(left, cy + oy),
            Vec2D::new(left, cy),
        );
        self.cubic_to(
            Vec2D::new(left, cy - oy),
            Vec2D::new(cx - ox, top),
            Vec2D::new(cx, top),
        );
        self.close();
    }

    /// Appends `other` with every point mapped through `transform`.
    pub fn add_path(&mut self, other: &RawPath, transform: &Mat2D) {
        self.verbs.extend(other.verbs.iter().map(|verb| match *verb {
            PathVerb::Move(p) => PathVerb::Move(transform.transform(p)),
            PathVerb::Line(p) => PathVerb::Line(transform.transform(p)),
            PathVerb::Cubic(a, b, c) => PathVerb::Cubic(
                transform.transform(a),
                transform.transform(b),
                transform.transform(c),
            ),
            PathVerb::Close => PathVerb::Close,
        }));
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn from_value(value: u32) -> Self {
        match value {
            1 => FillRule::EvenOdd,
            _ => FillRule::NonZero,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    SrcOver,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Maps the serialized blend mode value; unknown values draw as SrcOver.
    pub fn from_value(value: u32) -> Self {
        match value {
            14 => BlendMode::Screen,
            15 => BlendMode::Overlay,
            16 => BlendMode::Darken,
            17 => BlendMode::Lighten,
            18 => BlendMode::ColorDodge,
            19 => BlendMode::ColorBurn,
            20 => BlendMode::HardLight,
            21 => BlendMode::SoftLight,
            22 => BlendMode::Difference,
            23 => BlendMode::Exclusion,
            24 => BlendMode::Multiply,
            25 => BlendMode::Hue,
            26 => BlendMode::Saturation,
            27 => BlendMode::Color,
            28 => BlendMode::Luminosity,
            _ => BlendMode::SrcOver,
        }
    }
}

/// Backend path. Renderers recover their concrete type through `as_any`.
pub trait RenderPath: Debug {
    fn as_any(&self) -> &dyn Any;
}

pub trait RenderPaint: Debug {
    /// Solid ARGB color.
    fn color(&mut self, argb: u32);
    fn blend_mode(&mut self, mode: BlendMode);
    fn as_any(&self) -> &dyn Any;
}

pub trait RenderImage: Debug {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

pub trait RenderFont: Debug {}

/// Creates backend resources. Implemented by the host renderer.
pub trait Factory {
    fn make_render_path(&mut self, path: &RawPath, fill_rule: FillRule) -> Box<dyn RenderPath>;
    fn make_render_paint(&mut self) -> Box<dyn RenderPaint>;
    fn decode_image(&mut self, bytes: &[u8]) -> Option<Arc<dyn RenderImage>>;
    fn decode_font(&mut self, bytes: &[u8]) -> Option<Arc<dyn RenderFont>>;
}

/// Receives draw calls in paint order.
pub trait Renderer {
    fn save(&mut self);
    fn restore(&mut self);
    fn transform(&mut self, transform: &Mat2D);
    fn draw_path(&mut self, path: &dyn RenderPath, paint: &dyn RenderPaint);
    fn clip_path(&mut self, path: &dyn RenderPath);
    fn draw_image(&mut self, image: &dyn RenderImage, blend_mode: BlendMode, opacity: f32);
}
