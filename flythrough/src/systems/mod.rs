#![allow(missing_docs)]
pub mod physics;
pub mod update_global_transform;

pub use physics::physics_system;
pub use update_global_transform::update_global_transform_system;
