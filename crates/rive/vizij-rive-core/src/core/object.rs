//! The [`Core`] property protocol and the closed set of runtime objects.

use vizij_rive_codec::{BinaryReader, PropertyValue};

use crate::animation::{
    CubicEaseInterpolator, ElasticInterpolator, KeyFrame, KeyedObject, KeyedProperty,
    LinearAnimation,
};
use crate::assets::{FileAsset, FileAssetContents};
use crate::component::ComponentBase;
use crate::core::registry;
use crate::file::Backboard;
use crate::scene::{
    ArtboardNode, Ellipse, Fill, Image, Node, Rectangle, Shape, SolidColor, TransformBase,
};
use crate::state_machine::{
    BlendAnimation1D, LayerState, StateMachine, StateMachineInput, StateMachineLayer,
    StateTransition, TransitionCondition,
};

/// Keyed property access shared by every serialized object.
pub trait Core {
    fn core_type(&self) -> u16;

    /// Current value of a property this object owns.
    fn property(&self, key: u16) -> Option<PropertyValue>;

    /// Stores `value`. Returns false when the key is not owned or the value
    /// has the wrong type.
    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool;

    fn is_type_of(&self, type_key: u16) -> bool {
        registry::is_type_of(self.core_type(), type_key)
    }

    /// Reads one property payload for `key` and stores it. Returns false for
    /// keys the registry does not know; nothing is consumed in that case.
    fn deserialize(&mut self, key: u16, reader: &mut BinaryReader<'_>) -> bool {
        let Some(field_type) = registry::property_field_type(key) else {
            return false;
        };
        let value = PropertyValue::read(field_type, reader);
        if !self.set_property(key, value) {
            log::trace!("type {} ignores property {key}", self.core_type());
        }
        true
    }
}

/// Every object the importer can instantiate.
#[derive(Clone, Debug)]
pub enum CoreObject {
    Artboard(ArtboardNode),
    Node(Node),
    Shape(Shape),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Fill(Fill),
    SolidColor(SolidColor),
    Image(Image),

    Backboard(Backboard),
    FileAsset(FileAsset),
    FileAssetContents(FileAssetContents),

    CubicEase(CubicEaseInterpolator),
    Elastic(ElasticInterpolator),
    LinearAnimation(LinearAnimation),
    KeyedObject(KeyedObject),
    KeyedProperty(KeyedProperty),
    KeyFrame(KeyFrame),

    StateMachine(StateMachine),
    Input(StateMachineInput),
    Layer(StateMachineLayer),
    State(LayerState),
    BlendAnimation(BlendAnimation1D),
    Transition(StateTransition),
    Condition(TransitionCondition),
}

macro_rules! each_object {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            CoreObject::Artboard($inner) => $body,
            CoreObject::Node($inner) => $body,
            CoreObject::Shape($inner) => $body,
            CoreObject::Rectangle($inner) => $body,
            CoreObject::Ellipse($inner) => $body,
            CoreObject::Fill($inner) => $body,
            CoreObject::SolidColor($inner) => $body,
            CoreObject::Image($inner) => $body,
            CoreObject::Backboard($inner) => $body,
            CoreObject::FileAsset($inner) => $body,
            CoreObject::FileAssetContents($inner) => $body,
            CoreObject::CubicEase($inner) => $body,
            CoreObject::Elastic($inner) => $body,
            CoreObject::LinearAnimation($inner) => $body,
            CoreObject::KeyedObject($inner) => $body,
            CoreObject::KeyedProperty($inner) => $body,
            CoreObject::KeyFrame($inner) => $body,
            CoreObject::StateMachine($inner) => $body,
            CoreObject::Input($inner) => $body,
            CoreObject::Layer($inner) => $body,
            CoreObject::State($inner) => $body,
            CoreObject::BlendAnimation($inner) => $body,
            CoreObject::Transition($inner) => $body,
            CoreObject::Condition($inner) => $body,
        }
    };
}

impl Core for CoreObject {
    fn core_type(&self) -> u16 {
        each_object!(self, o => o.core_type())
    }

    fn property(&self, key: u16) -> Option<PropertyValue> {
        each_object!(self, o => o.property(key))
    }

    fn set_property(&mut self, key: u16, value: PropertyValue) -> bool {
        each_object!(self, o => o.set_property(key, value))
    }
}

impl CoreObject {
    /// Graph data for objects that take part in the dependency engine.
    pub fn component(&self) -> Option<&ComponentBase> {
        Some(match self {
            CoreObject::Artboard(o) => &o.component,
            CoreObject::Node(o) => &o.transform.component,
            CoreObject::Shape(o) => &o.drawable.node.transform.component,
            CoreObject::Rectangle(o) => &o.path.node.transform.component,
            CoreObject::Ellipse(o) => &o.path.node.transform.component,
            CoreObject::Image(o) => &o.drawable.node.transform.component,
            CoreObject::Fill(o) => &o.component,
            CoreObject::SolidColor(o) => &o.component,
            _ => return None,
        })
    }

    pub fn component_mut(&mut self) -> Option<&mut ComponentBase> {
        Some(match self {
            CoreObject::Artboard(o) => &mut o.component,
            CoreObject::Node(o) => &mut o.transform.component,
            CoreObject::Shape(o) => &mut o.drawable.node.transform.component,
            CoreObject::Rectangle(o) => &mut o.path.node.transform.component,
            CoreObject::Ellipse(o) => &mut o.path.node.transform.component,
            CoreObject::Image(o) => &mut o.drawable.node.transform.component,
            CoreObject::Fill(o) => &mut o.component,
            CoreObject::SolidColor(o) => &mut o.component,
            _ => return None,
        })
    }

    /// Transform state of nodes, shapes, paths and images.
    pub fn transform(&self) -> Option<&TransformBase> {
        Some(match self {
            CoreObject::Node(o) => &o.transform,
            CoreObject::Shape(o) => &o.drawable.node.transform,
            CoreObject::Rectangle(o) => &o.path.node.transform,
            CoreObject::Ellipse(o) => &o.path.node.transform,
            CoreObject::Image(o) => &o.drawable.node.transform,
            _ => return None,
        })
    }

    pub fn transform_mut(&mut self) -> Option<&mut TransformBase> {
        Some(match self {
            CoreObject::Node(o) => &mut o.transform,
            CoreObject::Shape(o) => &mut o.drawable.node.transform,
            CoreObject::Rectangle(o) => &mut o.path.node.transform,
            CoreObject::Ellipse(o) => &mut o.path.node.transform,
            CoreObject::Image(o) => &mut o.drawable.node.transform,
            _ => return None,
        })
    }

    /// The node part of anything with a local transform.
    pub fn node(&self) -> Option<&Node> {
        Some(match self {
            CoreObject::Node(o) => o,
            CoreObject::Shape(o) => &o.drawable.node,
            CoreObject::Rectangle(o) => &o.path.node,
            CoreObject::Ellipse(o) => &o.path.node,
            CoreObject::Image(o) => &o.drawable.node,
            _ => return None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.component().map(|c| c.name.as_str())
    }
}
