//! Timelines: interpolators, keyframes, keyed tracks and linear animations.

pub mod instance;
pub mod interpolator;
pub mod keyed;
pub mod keyframe;
pub mod linear_animation;

pub use instance::LinearAnimationInstance;
pub use interpolator::{
    CubicEaseInterpolator, CubicInterpolatorSolver, Easing, ElasticEase, ElasticInterpolator,
    Interpolator,
};
pub use keyed::{KeyedCallback, KeyedCallbackReporter, KeyedObject, KeyedProperty};
pub use keyframe::{InterpolationType, KeyFrame, KeyFrameValue};
pub use linear_animation::{LinearAnimation, Loop};
