//! Static registry: property field types, the type hierarchy and the
//! factory for concrete core objects.

use vizij_rive_codec::FieldType;

use crate::animation::{CubicEaseInterpolator, ElasticInterpolator, KeyFrame, KeyFrameValue};
use crate::animation::{KeyedObject, KeyedProperty, LinearAnimation};
use crate::assets::{AssetKind, FileAsset, FileAssetContents};
use crate::core::keys::{property_key as pk, type_key as tk};
use crate::core::object::CoreObject;
use crate::file::Backboard;
use crate::scene::{ArtboardNode, Ellipse, Fill, Image, Node, Rectangle, Shape, SolidColor};
use crate::state_machine::{
    BlendAnimation1D, ConditionKind, InputKind, LayerState, StateKind, StateMachine,
    StateMachineInput, StateMachineLayer, StateTransition, TransitionCondition,
};

/// Field type of every property key this runtime understands.
pub fn property_field_type(key: u16) -> Option<FieldType> {
    use FieldType::*;
    Some(match key {
        pk::NAME
        | pk::ASSET_NAME
        | pk::ANIMATION_NAME
        | pk::STATE_MACHINE_COMPONENT_NAME
        | pk::KEYFRAME_STRING_VALUE => String,

        pk::PARENT_ID
        | pk::BLEND_MODE
        | pk::FILL_RULE
        | pk::IMAGE_ASSET_ID
        | pk::FILE_ASSET_ID
        | pk::KEYED_OBJECT_ID
        | pk::KEYED_PROPERTY_KEY
        | pk::FPS
        | pk::DURATION
        | pk::LOOP_VALUE
        | pk::WORK_START
        | pk::WORK_END
        | pk::FRAME
        | pk::INTERPOLATION_TYPE
        | pk::INTERPOLATOR_ID
        | pk::KEYFRAME_ID_VALUE
        | pk::ANIMATION_STATE_ANIMATION_ID
        | pk::STATE_TO_ID
        | pk::TRANSITION_FLAGS
        | pk::CONDITION_INPUT_ID
        | pk::CONDITION_OP_VALUE
        | pk::TRANSITION_DURATION
        | pk::TRANSITION_EXIT_TIME
        | pk::BLEND_ANIMATION_ANIMATION_ID
        | pk::BLEND_STATE_1D_INPUT_ID
        | pk::TRANSITION_INTERPOLATION_TYPE
        | pk::TRANSITION_INTERPOLATOR_ID
        | pk::LAYER_STATE_FLAGS
        | pk::TRANSITION_RANDOM_WEIGHT
        | pk::ELASTIC_EASING => Uint,

        pk::ARTBOARD_WIDTH
        | pk::ARTBOARD_HEIGHT
        | pk::ARTBOARD_X
        | pk::ARTBOARD_Y
        | pk::ARTBOARD_ORIGIN_X
        | pk::ARTBOARD_ORIGIN_Y
        | pk::X
        | pk::Y
        | pk::ROTATION
        | pk::SCALE_X
        | pk::SCALE_Y
        | pk::OPACITY
        | pk::PATH_WIDTH
        | pk::PATH_HEIGHT
        | pk::PATH_ORIGIN_X
        | pk::PATH_ORIGIN_Y
        | pk::CORNER_RADIUS
        | pk::DRAWABLE_ASSET_WIDTH
        | pk::DRAWABLE_ASSET_HEIGHT
        | pk::SPEED
        | pk::ANIMATION_STATE_SPEED
        | pk::CUBIC_X1
        | pk::CUBIC_Y1
        | pk::CUBIC_X2
        | pk::CUBIC_Y2
        | pk::KEYFRAME_DOUBLE_VALUE
        | pk::NUMBER_INPUT_VALUE
        | pk::NUMBER_CONDITION_VALUE
        | pk::BLEND_ANIMATION_1D_VALUE
        | pk::ELASTIC_AMPLITUDE
        | pk::ELASTIC_PERIOD => Double,

        pk::COLOR_VALUE | pk::KEYFRAME_COLOR_VALUE => Color,

        pk::ARTBOARD_CLIP
        | pk::IS_VISIBLE
        | pk::ENABLE_WORK_AREA
        | pk::QUANTIZE
        | pk::KEYFRAME_BOOL_VALUE
        | pk::BOOL_INPUT_VALUE => Bool,

        pk::FILE_ASSET_BYTES => Bytes,

        _ => return None,
    })
}

/// Direct base type in the serialized type hierarchy.
pub fn base_type(type_key: u16) -> Option<u16> {
    Some(match type_key {
        tk::ARTBOARD => tk::WORLD_TRANSFORM_COMPONENT,
        tk::WORLD_TRANSFORM_COMPONENT => tk::CONTAINER_COMPONENT,
        tk::CONTAINER_COMPONENT => tk::COMPONENT,
        tk::TRANSFORM_COMPONENT => tk::WORLD_TRANSFORM_COMPONENT,
        tk::NODE => tk::TRANSFORM_COMPONENT,
        tk::DRAWABLE | tk::PATH => tk::NODE,
        tk::SHAPE | tk::IMAGE => tk::DRAWABLE,
        tk::PARAMETRIC_PATH => tk::PATH,
        tk::RECTANGLE | tk::ELLIPSE => tk::PARAMETRIC_PATH,
        tk::SHAPE_PAINT => tk::CONTAINER_COMPONENT,
        tk::FILL => tk::SHAPE_PAINT,
        tk::SOLID_COLOR => tk::COMPONENT,

        tk::KEYFRAME_DOUBLE
        | tk::KEYFRAME_COLOR
        | tk::KEYFRAME_ID
        | tk::KEYFRAME_BOOL
        | tk::KEYFRAME_STRING
        | tk::KEYFRAME_CALLBACK => tk::KEYFRAME,
        tk::LINEAR_ANIMATION | tk::STATE_MACHINE => tk::ANIMATION,
        tk::CUBIC_EASE_INTERPOLATOR => tk::CUBIC_INTERPOLATOR,

        tk::STATE_MACHINE_INPUT | tk::STATE_MACHINE_LAYER => tk::STATE_MACHINE_COMPONENT,
        tk::STATE_MACHINE_NUMBER | tk::STATE_MACHINE_BOOL | tk::STATE_MACHINE_TRIGGER => {
            tk::STATE_MACHINE_INPUT
        }
        tk::LAYER_STATE | tk::STATE_TRANSITION => tk::STATE_MACHINE_LAYER_COMPONENT,
        tk::ANIMATION_STATE | tk::ANY_STATE | tk::ENTRY_STATE | tk::EXIT_STATE | tk::BLEND_STATE => {
            tk::LAYER_STATE
        }
        tk::BLEND_STATE_1D => tk::BLEND_STATE,
        tk::BLEND_ANIMATION_1D => tk::BLEND_ANIMATION,
        tk::TRANSITION_TRIGGER_CONDITION | tk::TRANSITION_VALUE_CONDITION => {
            tk::TRANSITION_CONDITION
        }
        tk::TRANSITION_NUMBER_CONDITION | tk::TRANSITION_BOOL_CONDITION => {
            tk::TRANSITION_VALUE_CONDITION
        }

        tk::FILE_ASSET => tk::ASSET,
        tk::DRAWABLE_ASSET | tk::FONT_ASSET => tk::FILE_ASSET,
        tk::IMAGE_ASSET => tk::DRAWABLE_ASSET,
        _ => return None,
    })
}

/// Whether `type_key` is `base` or derives from it.
pub fn is_type_of(type_key: u16, base: u16) -> bool {
    let mut current = Some(type_key);
    while let Some(key) = current {
        if key == base {
            return true;
        }
        current = base_type(key);
    }
    false
}

/// Builds a default instance of a concrete type, or `None` for types this
/// runtime does not instantiate.
pub fn make_core_instance(type_key: u16) -> Option<CoreObject> {
    use CoreObject as C;
    Some(match type_key {
        tk::ARTBOARD => C::Artboard(ArtboardNode::default()),
        tk::NODE => C::Node(Node::default()),
        tk::SHAPE => C::Shape(Shape::default()),
        tk::RECTANGLE => C::Rectangle(Rectangle::default()),
        tk::ELLIPSE => C::Ellipse(Ellipse::default()),
        tk::FILL => C::Fill(Fill::default()),
        tk::SOLID_COLOR => C::SolidColor(SolidColor::default()),
        tk::IMAGE => C::Image(Image::default()),

        tk::BACKBOARD => C::Backboard(Backboard::default()),
        tk::IMAGE_ASSET => C::FileAsset(FileAsset::new(AssetKind::Image)),
        tk::FONT_ASSET => C::FileAsset(FileAsset::new(AssetKind::Font)),
        tk::FILE_ASSET_CONTENTS => C::FileAssetContents(FileAssetContents::default()),

        tk::CUBIC_EASE_INTERPOLATOR => C::CubicEase(CubicEaseInterpolator::default()),
        tk::ELASTIC_INTERPOLATOR => C::Elastic(ElasticInterpolator::default()),
        tk::LINEAR_ANIMATION => C::LinearAnimation(LinearAnimation::default()),
        tk::KEYED_OBJECT => C::KeyedObject(KeyedObject::default()),
        tk::KEYED_PROPERTY => C::KeyedProperty(KeyedProperty::default()),
        tk::KEYFRAME_DOUBLE => C::KeyFrame(KeyFrame::new(KeyFrameValue::Double(0.0))),
        tk::KEYFRAME_COLOR => C::KeyFrame(KeyFrame::new(KeyFrameValue::Color(0))),
        tk::KEYFRAME_ID => C::KeyFrame(KeyFrame::new(KeyFrameValue::Id(0))),
        tk::KEYFRAME_BOOL => C::KeyFrame(KeyFrame::new(KeyFrameValue::Bool(false))),
        tk::KEYFRAME_STRING => C::KeyFrame(KeyFrame::new(KeyFrameValue::String(String::new()))),
        tk::KEYFRAME_CALLBACK => C::KeyFrame(KeyFrame::new(KeyFrameValue::Callback)),

        tk::STATE_MACHINE => C::StateMachine(StateMachine::default()),
        tk::STATE_MACHINE_NUMBER => C::Input(StateMachineInput::new("", InputKind::Number(0.0))),
        tk::STATE_MACHINE_BOOL => C::Input(StateMachineInput::new("", InputKind::Bool(false))),
        tk::STATE_MACHINE_TRIGGER => C::Input(StateMachineInput::new("", InputKind::Trigger)),
        tk::STATE_MACHINE_LAYER => C::Layer(StateMachineLayer::default()),
        tk::ENTRY_STATE => C::State(LayerState::new(StateKind::Entry)),
        tk::ANY_STATE => C::State(LayerState::new(StateKind::Any)),
        tk::EXIT_STATE => C::State(LayerState::new(StateKind::Exit)),
        tk::ANIMATION_STATE => C::State(LayerState::animation_state(u32::MAX)),
        tk::BLEND_STATE_1D => C::State(LayerState::new(StateKind::Blend1D {
            input_id: u32::MAX,
            animations: Vec::new(),
        })),
        tk::BLEND_ANIMATION_1D => C::BlendAnimation(BlendAnimation1D::default()),
        tk::STATE_TRANSITION => C::Transition(StateTransition::default()),
        tk::TRANSITION_TRIGGER_CONDITION => C::Condition(TransitionCondition {
            input_id: u32::MAX,
            op_value: 0,
            kind: ConditionKind::Trigger,
        }),
        tk::TRANSITION_BOOL_CONDITION => C::Condition(TransitionCondition {
            input_id: u32::MAX,
            op_value: 0,
            kind: ConditionKind::Bool,
        }),
        tk::TRANSITION_NUMBER_CONDITION => C::Condition(TransitionCondition {
            input_id: u32::MAX,
            op_value: 0,
            kind: ConditionKind::Number { value: 0.0 },
        }),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::Core;

    #[test]
    fn hierarchy_walks_to_component() {
        assert!(is_type_of(tk::RECTANGLE, tk::PATH));
        assert!(is_type_of(tk::RECTANGLE, tk::NODE));
        assert!(is_type_of(tk::SHAPE, tk::DRAWABLE));
        assert!(is_type_of(tk::ARTBOARD, tk::COMPONENT));
        assert!(is_type_of(tk::FILL, tk::SHAPE_PAINT));
        assert!(!is_type_of(tk::FILL, tk::NODE));
        assert!(is_type_of(tk::TRANSITION_BOOL_CONDITION, tk::TRANSITION_CONDITION));
        assert!(is_type_of(tk::IMAGE_ASSET, tk::FILE_ASSET));
        assert!(!is_type_of(tk::NODE, tk::SHAPE));
    }

    #[test]
    fn factory_types_match_keys() {
        for key in [
            tk::ARTBOARD,
            tk::NODE,
            tk::SHAPE,
            tk::RECTANGLE,
            tk::ELLIPSE,
            tk::FILL,
            tk::SOLID_COLOR,
            tk::IMAGE,
            tk::IMAGE_ASSET,
            tk::FONT_ASSET,
            tk::KEYFRAME_COLOR,
            tk::KEYFRAME_STRING,
            tk::KEYFRAME_CALLBACK,
            tk::STATE_MACHINE_TRIGGER,
            tk::BLEND_STATE_1D,
            tk::TRANSITION_NUMBER_CONDITION,
            tk::ELASTIC_INTERPOLATOR,
        ] {
            let object = make_core_instance(key).unwrap();
            assert_eq!(object.core_type(), key);
        }
        assert!(make_core_instance(tk::COMPONENT).is_none());
        assert!(make_core_instance(999).is_none());
    }

    #[test]
    fn field_types() {
        assert_eq!(property_field_type(pk::NAME), Some(FieldType::String));
        assert_eq!(property_field_type(pk::X), Some(FieldType::Double));
        assert_eq!(property_field_type(pk::COLOR_VALUE), Some(FieldType::Color));
        assert_eq!(property_field_type(pk::IS_VISIBLE), Some(FieldType::Bool));
        assert_eq!(property_field_type(pk::PARENT_ID), Some(FieldType::Uint));
        assert_eq!(property_field_type(pk::FILE_ASSET_BYTES), Some(FieldType::Bytes));
        assert_eq!(property_field_type(pk::QUANTIZE), Some(FieldType::Bool));
        assert_eq!(property_field_type(pk::ANIMATION_STATE_SPEED), Some(FieldType::Double));
        assert_eq!(property_field_type(9999), None);
    }
}
