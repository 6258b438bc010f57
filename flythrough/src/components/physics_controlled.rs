/// A "tag" component to indicate to the [`crate::systems::physics_system`] that this entity should
/// have its [`super::LocalTransform`] set to the position of its rigid body in the physics simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsControlled {}
