//! Vizij Rive Core (engine-agnostic)
//!
//! Runtime for `.riv` vector animation files: imports the binary object
//! stream into artboards, orders their components into a dependency graph,
//! plays linear animations and layered state machines onto them and issues
//! draw calls through host-provided [`Factory`] and [`Renderer`] seams.
//!
//! Typical use: [`File::import`] the bytes, take an [`Artboard`] instance,
//! start a player with [`Artboard::play_state_machine`], then call
//! [`Artboard::update`] once per frame and [`Artboard::draw`] to render.

pub mod animation;
pub mod artboard;
pub mod assets;
pub mod component;
pub mod config;
pub mod core;
pub mod dependency;
pub mod error;
pub mod file;
mod importer;
pub mod ids;
pub mod inputs;
pub mod math;
pub mod outputs;
pub mod player;
pub mod recorder;
pub mod render;
pub mod reset;
pub mod scene;
pub mod state_machine;
pub mod target;

// Re-exports for hosts
pub use animation::{
    CubicInterpolatorSolver, ElasticEase, Interpolator, KeyFrame, KeyFrameValue, KeyedCallback,
    KeyedCallbackReporter, LinearAnimation, LinearAnimationInstance, Loop,
};
pub use artboard::Artboard;
pub use assets::{AssetKind, FileAsset, FileAssetResolver, InMemoryResolver};
pub use component::ComponentDirt;
pub use config::{Config, Features};
pub use core::{Core, CoreObject};
pub use error::{GraphError, ImportError, ImportResult, StatusCode};
pub use file::{Backboard, File};
pub use ids::{ObjectId, PlayerId};
pub use inputs::{Inputs, PlayerCommand};
pub use math::{Mat2D, Vec2D};
pub use outputs::{CoreEvent, Outputs};
pub use player::{Playback, Player};
pub use recorder::PropertyRecorder;
pub use render::{BlendMode, Factory, FillRule, RawPath, RenderImage, RenderPaint, RenderPath, Renderer};
pub use reset::{AnimationReset, ResetPool};
pub use state_machine::{InputValue, StateMachine, StateMachineInstance};
pub use target::PropertyTarget;
pub use vizij_rive_codec::{BinaryReader, BinaryWriter, FieldType, PropertyValue, RuntimeHeader};
