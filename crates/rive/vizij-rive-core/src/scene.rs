//! Scene components: the artboard root, nodes, shapes, paths, paints and images.
//!
//! Each type embeds its base type as a field and falls through to it for
//! property keys it does not own, mirroring the serialized type chain.

use std::sync::Arc;

use vizij_rive_codec::PropertyValue;

use crate::component::ComponentBase;
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::Core;
use crate::math::Mat2D;
use crate::render::{RawPath, RenderImage};

pub(crate) fn set_f32(slot: &mut f32, value: PropertyValue) -> bool {
    match value {
        PropertyValue::Double(v) => {
            *slot = v;
            true
        }
        _ => false,
    }
}

pub(crate) fn set_u32(slot: &mut u32, value: PropertyValue) -> bool {
    match value {
        PropertyValue::Uint(v) => {
            *slot = v;
            true
        }
        _ => false,
    }
}

pub(crate) fn set_bool(slot: &mut bool, value: PropertyValue) -> bool {
    match value {
        PropertyValue::Bool(v) => {
            *slot = v;
            true
        }
        _ => false,
    }
}

/// Root object of every artboard, always id 0.
#[derive(Clone, Debug)]
pub struct ArtboardNode {
    pub component: ComponentBase,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub clip: bool,
}

impl Default for ArtboardNode {
    fn default() -> Self {
        Self {
            component: ComponentBase::default(),
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
            clip: true,
        }
    }
}

impl Core for ArtboardNode {
    fn core_type(&self) -> u16 {
        tk::ARTBOARD
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        let v = match key {
            pk::ARTBOARD_WIDTH => self.width,
            pk::ARTBOARD_HEIGHT => self.height,
            pk::ARTBOARD_X => self.x,
            pk::ARTBOARD_Y => self.y,
            pk::ARTBOARD_ORIGIN_X => self.origin_x,
            pk::ARTBOARD_ORIGIN_Y => self.origin_y,
            pk::ARTBOARD_CLIP => return Some(PropertyValue::Bool(self.clip)),
            _ => return self.component.own_property(key),
        };
        Some(PropertyValue::Double(v))
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::ARTBOARD_WIDTH => set_f32(&mut self.width, value),
            pk::ARTBOARD_HEIGHT => set_f32(&mut self.height, value),
            pk::ARTBOARD_X => set_f32(&mut self.x, value),
            pk::ARTBOARD_Y => set_f32(&mut self.y, value),
            pk::ARTBOARD_ORIGIN_X => set_f32(&mut self.origin_x, value),
            pk::ARTBOARD_ORIGIN_Y => set_f32(&mut self.origin_y, value),
            pk::ARTBOARD_CLIP => set_bool(&mut self.clip, value),
            _ => self.component.set_own_property(key, value),
        }
    }
}

/// Rotation, scale and opacity plus the computed world state.
#[derive(Clone, Debug)]
pub struct TransformBase {
    pub component: ComponentBase,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
    pub(crate) local: Mat2D,
    pub(crate) world: Mat2D,
    pub(crate) render_opacity: f32,
}

impl Default for TransformBase {
    fn default() -> Self {
        Self {
            component: ComponentBase::default(),
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            local: Mat2D::IDENTITY,
            world: Mat2D::IDENTITY,
            render_opacity: 1.0,
        }
    }
}

impl TransformBase {
    pub fn world_transform(&self) -> Mat2D {
        self.world
    }

    pub fn render_opacity(&self) -> f32 {
        self.render_opacity
    }

    pub(crate) fn own_property(&self, key: u16) -> Option<PropertyValue> {
        let v = match key {
            pk::ROTATION => self.rotation,
            pk::SCALE_X => self.scale_x,
            pk::SCALE_Y => self.scale_y,
            pk::OPACITY => self.opacity,
            _ => return self.component.own_property(key),
        };
        Some(PropertyValue::Double(v))
    }

    pub(crate) fn set_own_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::ROTATION => set_f32(&mut self.rotation, value),
            pk::SCALE_X => set_f32(&mut self.scale_x, value),
            pk::SCALE_Y => set_f32(&mut self.scale_y, value),
            pk::OPACITY => set_f32(&mut self.opacity, value),
            _ => self.component.set_own_property(key, value),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub transform: TransformBase,
    pub x: f32,
    pub y: f32,
}

impl Node {
    pub(crate) fn local_transform(&self) -> Mat2D {
        let t = &self.transform;
        Mat2D::compose(self.x, self.y, t.rotation, t.scale_x, t.scale_y)
    }

    pub(crate) fn own_property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::X => Some(PropertyValue::Double(self.x)),
            pk::Y => Some(PropertyValue::Double(self.y)),
            _ => self.transform.own_property(key),
        }
    }

    pub(crate) fn set_own_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::X => set_f32(&mut self.x, value),
            pk::Y => set_f32(&mut self.y, value),
            _ => self.transform.set_own_property(key, value),
        }
    }
}

impl Core for Node {
    fn core_type(&self) -> u16 {
        tk::NODE
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        self.own_property(key)
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        self.set_own_property(key, value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Drawable {
    pub node: Node,
    pub blend_mode: u32,
}

impl Drawable {
    pub(crate) fn own_property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::BLEND_MODE => Some(PropertyValue::Uint(self.blend_mode)),
            _ => self.node.own_property(key),
        }
    }

    pub(crate) fn set_own_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::BLEND_MODE => set_u32(&mut self.blend_mode, value),
            _ => self.node.set_own_property(key, value),
        }
    }
}

/// Container for paths and paints; draws its paths with each visible fill.
#[derive(Clone, Debug, Default)]
pub struct Shape {
    pub drawable: Drawable,
}

impl Core for Shape {
    fn core_type(&self) -> u16 {
        tk::SHAPE
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        self.drawable.own_property(key)
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        self.drawable.set_own_property(key, value)
    }
}

/// Path whose geometry is derived from a width, height and origin.
#[derive(Clone, Debug)]
pub struct ParametricPath {
    pub node: Node,
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub(crate) local_path: RawPath,
}

impl Default for ParametricPath {
    fn default() -> Self {
        Self {
            node: Node::default(),
            width: 0.0,
            height: 0.0,
            origin_x: 0.5,
            origin_y: 0.5,
            local_path: RawPath::new(),
        }
    }
}

impl ParametricPath {
    pub fn local_path(&self) -> &RawPath {
        &self.local_path
    }

    /// Bounds in local space: `(left, top, right, bottom)`.
    pub(crate) fn bounds(&self) -> (f32, f32, f32, f32) {
        let left = -self.origin_x * self.width;
        let top = -self.origin_y * self.height;
        (left, top, left + self.width, top + self.height)
    }

    pub(crate) fn own_property(&self, key: u16) -> Option<PropertyValue> {
        let v = match key {
            pk::PATH_WIDTH => self.width,
            pk::PATH_HEIGHT => self.height,
            pk::PATH_ORIGIN_X => self.origin_x,
            pk::PATH_ORIGIN_Y => self.origin_y,
            _ => return self.node.own_property(key),
        };
        Some(PropertyValue::Double(v))
    }

    pub(crate) fn set_own_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::PATH_WIDTH => set_f32(&mut self.width, value),
            pk::PATH_HEIGHT => set_f32(&mut self.height, value),
            pk::PATH_ORIGIN_X => set_f32(&mut self.origin_x, value),
            pk::PATH_ORIGIN_Y => set_f32(&mut self.origin_y, value),
            _ => self.node.set_own_property(key, value),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rectangle {
    pub path: ParametricPath,
    pub corner_radius: f32,
}

impl Rectangle {
    pub(crate) fn rebuild_path(&mut self) {
        let (l, t, r, b) = self.path.bounds();
        let mut raw = RawPath::new();
        raw.add_rounded_rect(l, t, r, b, self.corner_radius);
        self.path.local_path = raw;
    }
}

impl Core for Rectangle {
    fn core_type(&self) -> u16 {
        tk::RECTANGLE
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::CORNER_RADIUS => Some(PropertyValue::Double(self.corner_radius)),
            _ => self.path.own_property(key),
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::CORNER_RADIUS => set_f32(&mut self.corner_radius, value),
            _ => self.path.set_own_property(key, value),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Ellipse {
    pub path: ParametricPath,
}

impl Ellipse {
    pub(crate) fn rebuild_path(&mut self) {
        let (l, t, r, b) = self.path.bounds();
        let mut raw = RawPath::new();
        raw.add_oval(l, t, r, b);
        self.path.local_path = raw;
    }
}

impl Core for Ellipse {
    fn core_type(&self) -> u16 {
        tk::ELLIPSE
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        self.path.own_property(key)
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        self.path.set_own_property(key, value)
    }
}

#[derive(Clone, Debug)]
pub struct Fill {
    pub component: ComponentBase,
    pub is_visible: bool,
    pub fill_rule: u32,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            component: ComponentBase::default(),
            is_visible: true,
            fill_rule: 0,
        }
    }
}

impl Core for Fill {
    fn core_type(&self) -> u16 {
        tk::FILL
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::IS_VISIBLE => Some(PropertyValue::Bool(self.is_visible)),
            pk::FILL_RULE => Some(PropertyValue::Uint(self.fill_rule)),
            _ => self.component.own_property(key),
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::IS_VISIBLE => set_bool(&mut self.is_visible, value),
            pk::FILL_RULE => set_u32(&mut self.fill_rule, value),
            _ => self.component.set_own_property(key, value),
        }
    }
}

/// Single ARGB color for the fill it is parented to.
#[derive(Clone, Debug)]
pub struct SolidColor {
    pub component: ComponentBase,
    pub color_value: u32,
    pub(crate) render_color: u32,
}

impl Default for SolidColor {
    fn default() -> Self {
        Self {
            component: ComponentBase::default(),
            color_value: 0xff74_7474,
            render_color: 0xff74_7474,
        }
    }
}

impl SolidColor {
    /// Color with alpha scaled by the owning shape's render opacity.
    pub fn render_color(&self) -> u32 {
        self.render_color
    }
}

impl Core for SolidColor {
    fn core_type(&self) -> u16 {
        tk::SOLID_COLOR
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::COLOR_VALUE => Some(PropertyValue::Color(self.color_value)),
            _ => self.component.own_property(key),
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, value) {
            (pk::COLOR_VALUE, PropertyValue::Color(v)) => {
                self.color_value = v;
                true
            }
            (key, value) => self.component.set_own_property(key, value),
        }
    }
}

/// Drawable that renders a decoded image asset.
#[derive(Clone, Debug)]
pub struct Image {
    pub drawable: Drawable,
    pub asset_id: u32,
    pub(crate) image: Option<Arc<dyn RenderImage>>,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            drawable: Drawable::default(),
            asset_id: u32::MAX,
            image: None,
        }
    }
}

impl Image {
    pub fn render_image(&self) -> Option<&Arc<dyn RenderImage>> {
        self.image.as_ref()
    }
}

impl Core for Image {
    fn core_type(&self) -> u16 {
        tk::IMAGE
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            pk::IMAGE_ASSET_ID => Some(PropertyValue::Uint(self.asset_id)),
            _ => self.drawable.own_property(key),
        }
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match key {
            pk::IMAGE_ASSET_ID => set_u32(&mut self.asset_id, value),
            _ => self.drawable.set_own_property(key, value),
        }
    }
}
