//! Type and property keys as they appear in `.riv` files.

pub mod type_key {
    pub const ARTBOARD: u16 = 1;
    pub const NODE: u16 = 2;
    pub const SHAPE: u16 = 3;
    pub const ELLIPSE: u16 = 4;
    pub const RECTANGLE: u16 = 7;
    pub const COMPONENT: u16 = 10;
    pub const CONTAINER_COMPONENT: u16 = 11;
    pub const PATH: u16 = 12;
    pub const DRAWABLE: u16 = 13;
    pub const PARAMETRIC_PATH: u16 = 15;
    pub const SOLID_COLOR: u16 = 18;
    pub const FILL: u16 = 20;
    pub const SHAPE_PAINT: u16 = 21;
    pub const BACKBOARD: u16 = 23;
    pub const KEYED_OBJECT: u16 = 25;
    pub const KEYED_PROPERTY: u16 = 26;
    pub const ANIMATION: u16 = 27;
    pub const CUBIC_EASE_INTERPOLATOR: u16 = 28;
    pub const KEYFRAME: u16 = 29;
    pub const KEYFRAME_DOUBLE: u16 = 30;
    pub const LINEAR_ANIMATION: u16 = 31;
    pub const KEYFRAME_COLOR: u16 = 37;
    pub const TRANSFORM_COMPONENT: u16 = 38;
    pub const KEYFRAME_ID: u16 = 50;
    pub const STATE_MACHINE: u16 = 53;
    pub const STATE_MACHINE_COMPONENT: u16 = 54;
    pub const STATE_MACHINE_INPUT: u16 = 55;
    pub const STATE_MACHINE_NUMBER: u16 = 56;
    pub const STATE_MACHINE_LAYER: u16 = 57;
    pub const STATE_MACHINE_TRIGGER: u16 = 58;
    pub const STATE_MACHINE_BOOL: u16 = 59;
    pub const LAYER_STATE: u16 = 60;
    pub const ANIMATION_STATE: u16 = 61;
    pub const ANY_STATE: u16 = 62;
    pub const ENTRY_STATE: u16 = 63;
    pub const EXIT_STATE: u16 = 64;
    pub const STATE_TRANSITION: u16 = 65;
    pub const STATE_MACHINE_LAYER_COMPONENT: u16 = 66;
    pub const TRANSITION_CONDITION: u16 = 67;
    pub const TRANSITION_TRIGGER_CONDITION: u16 = 68;
    pub const TRANSITION_VALUE_CONDITION: u16 = 69;
    pub const TRANSITION_NUMBER_CONDITION: u16 = 70;
    pub const TRANSITION_BOOL_CONDITION: u16 = 71;
    pub const BLEND_STATE: u16 = 72;
    pub const BLEND_ANIMATION: u16 = 74;
    pub const BLEND_ANIMATION_1D: u16 = 75;
    pub const BLEND_STATE_1D: u16 = 76;
    pub const KEYFRAME_BOOL: u16 = 84;
    pub const WORLD_TRANSFORM_COMPONENT: u16 = 91;
    pub const ASSET: u16 = 99;
    pub const IMAGE: u16 = 100;
    pub const FILE_ASSET: u16 = 103;
    pub const DRAWABLE_ASSET: u16 = 104;
    pub const IMAGE_ASSET: u16 = 105;
    pub const FILE_ASSET_CONTENTS: u16 = 106;
    pub const CUBIC_INTERPOLATOR: u16 = 139;
    pub const FONT_ASSET: u16 = 141;
    pub const KEYFRAME_STRING: u16 = 142;
    pub const KEYFRAME_CALLBACK: u16 = 173;
    pub const ELASTIC_INTERPOLATOR: u16 = 171;
}

pub mod property_key {
    // Component
    pub const NAME: u16 = 4;
    pub const PARENT_ID: u16 = 5;

    // Artboard
    pub const ARTBOARD_WIDTH: u16 = 7;
    pub const ARTBOARD_HEIGHT: u16 = 8;
    pub const ARTBOARD_X: u16 = 9;
    pub const ARTBOARD_Y: u16 = 10;
    pub const ARTBOARD_ORIGIN_X: u16 = 11;
    pub const ARTBOARD_ORIGIN_Y: u16 = 12;
    pub const ARTBOARD_CLIP: u16 = 196;

    // Node / TransformComponent / WorldTransformComponent
    pub const X: u16 = 13;
    pub const Y: u16 = 14;
    pub const ROTATION: u16 = 15;
    pub const SCALE_X: u16 = 16;
    pub const SCALE_Y: u16 = 17;
    pub const OPACITY: u16 = 18;

    // ParametricPath / Rectangle
    pub const PATH_WIDTH: u16 = 20;
    pub const PATH_HEIGHT: u16 = 21;
    pub const PATH_ORIGIN_X: u16 = 123;
    pub const PATH_ORIGIN_Y: u16 = 124;
    pub const CORNER_RADIUS: u16 = 31;

    // Drawable / paints
    pub const BLEND_MODE: u16 = 23;
    pub const COLOR_VALUE: u16 = 37;
    pub const FILL_RULE: u16 = 40;
    pub const IS_VISIBLE: u16 = 41;

    // Image
    pub const IMAGE_ASSET_ID: u16 = 206;

    // Assets
    pub const ASSET_NAME: u16 = 203;
    pub const FILE_ASSET_ID: u16 = 204;
    pub const DRAWABLE_ASSET_WIDTH: u16 = 207;
    pub const DRAWABLE_ASSET_HEIGHT: u16 = 208;
    pub const FILE_ASSET_BYTES: u16 = 212;

    // Keyed data
    pub const KEYED_OBJECT_ID: u16 = 51;
    pub const KEYED_PROPERTY_KEY: u16 = 53;

    // Animation / LinearAnimation
    pub const ANIMATION_NAME: u16 = 55;
    pub const FPS: u16 = 56;
    pub const DURATION: u16 = 57;
    pub const SPEED: u16 = 58;
    pub const LOOP_VALUE: u16 = 59;
    pub const WORK_START: u16 = 60;
    pub const WORK_END: u16 = 61;
    pub const ENABLE_WORK_AREA: u16 = 62;
    pub const QUANTIZE: u16 = 376;

    // Cubic interpolators
    pub const CUBIC_X1: u16 = 63;
    pub const CUBIC_Y1: u16 = 64;
    pub const CUBIC_X2: u16 = 65;
    pub const CUBIC_Y2: u16 = 66;

    // KeyFrame
    pub const FRAME: u16 = 67;
    pub const INTERPOLATION_TYPE: u16 = 68;
    pub const INTERPOLATOR_ID: u16 = 69;
    pub const KEYFRAME_DOUBLE_VALUE: u16 = 70;
    pub const KEYFRAME_COLOR_VALUE: u16 = 88;
    pub const KEYFRAME_ID_VALUE: u16 = 122;
    pub const KEYFRAME_BOOL_VALUE: u16 = 181;
    pub const KEYFRAME_STRING_VALUE: u16 = 280;

    // State machine
    pub const STATE_MACHINE_COMPONENT_NAME: u16 = 138;
    pub const NUMBER_INPUT_VALUE: u16 = 140;
    pub const BOOL_INPUT_VALUE: u16 = 141;
    pub const ANIMATION_STATE_ANIMATION_ID: u16 = 149;
    pub const ANIMATION_STATE_SPEED: u16 = 292;
    pub const STATE_TO_ID: u16 = 151;
    pub const TRANSITION_FLAGS: u16 = 152;
    pub const CONDITION_INPUT_ID: u16 = 155;
    pub const CONDITION_OP_VALUE: u16 = 156;
    pub const NUMBER_CONDITION_VALUE: u16 = 157;
    pub const TRANSITION_DURATION: u16 = 158;
    pub const TRANSITION_EXIT_TIME: u16 = 160;
    pub const BLEND_ANIMATION_ANIMATION_ID: u16 = 165;
    pub const BLEND_ANIMATION_1D_VALUE: u16 = 166;
    pub const BLEND_STATE_1D_INPUT_ID: u16 = 167;
    pub const TRANSITION_INTERPOLATION_TYPE: u16 = 349;
    pub const TRANSITION_INTERPOLATOR_ID: u16 = 350;
    pub const LAYER_STATE_FLAGS: u16 = 536;
    pub const TRANSITION_RANDOM_WEIGHT: u16 = 537;

    // Elastic interpolator
    pub const ELASTIC_EASING: u16 = 405;
    pub const ELASTIC_AMPLITUDE: u16 = 406;
    pub const ELASTIC_PERIOD: u16 = 407;
}
