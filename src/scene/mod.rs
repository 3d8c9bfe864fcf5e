//! # Scene Module
//!
//! Owned entity storage for one simulation session. Entities are named,
//! optionally parented, and carry a local transform, a color, a logical model and
//! an enabled flag. World transforms are resolved by composing through parent
//! handles; entities never own each other.
//!
//! ## Key Components
//!
//! - [`EntityStore`] - Owned collection indexed by [`EntityHandle`] and by name
//! - [`Entity`] / [`EntityDesc`] - Entity state and its fluent creation builder
//! - [`Transform`] - Position, Euler rotation (degrees) and scale
//! - [`Color`] - RGBA color with the lab palette

pub mod color;
pub mod entity;
pub mod store;

pub use color::Color;
pub use entity::{Entity, EntityDesc, EntityHandle, Model, Transform};
pub use store::EntityStore;
