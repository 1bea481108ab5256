//! Core object model: type/property keys, the registry and the object enum.

pub mod keys;
pub mod object;
pub mod registry;

pub use object::{Core, CoreObject};
