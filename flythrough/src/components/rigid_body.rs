use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// A component that links an entity to its rigid body (and that body's collider) in the
/// [`crate::contexts::PhysicsContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigidBody {
    /// Handle into [`crate::contexts::PhysicsContext::rigid_bodies`]
    pub handle: RigidBodyHandle,
    /// Handle into [`crate::contexts::PhysicsContext::colliders`]
    pub collider: ColliderHandle,
}
