//! State machines: layered graphs of states driven by typed inputs.

pub mod condition;
pub mod input;
pub mod instance;
pub mod layer;
pub mod machine;
pub mod state;
pub mod transition;

pub use condition::{ConditionKind, ConditionOp, TransitionCondition};
pub use input::{InputInstance, InputKind, InputValue, StateMachineInput};
pub use instance::{LayerInstance, StateChange, StateInstance, StateMachineInstance};
pub use layer::StateMachineLayer;
pub use machine::StateMachine;
pub use state::{BlendAnimation1D, LayerState, LayerStateFlags, StateKind};
pub use transition::{AllowTransition, StateTransition, TransitionFlags};
