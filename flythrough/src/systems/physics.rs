use hecs::World;

use crate::{
    components::{LocalTransform, PhysicsControlled, RigidBody},
    contexts::PhysicsContext,
};

/// Physics system
/// Steps the physics simulation by `delta_seconds`, then copies the position of every
/// [`PhysicsControlled`] rigid body back into its entity's [`LocalTransform`]
pub fn physics_system(world: &mut World, physics_context: &mut PhysicsContext, delta_seconds: f32) {
    physics_context.update(delta_seconds);

    for (_, (rigid_body, local_transform)) in world
        .query::<(&RigidBody, &mut LocalTransform)>()
        .with::<&PhysicsControlled>()
        .iter()
    {
        if let Some(body) = physics_context.rigid_bodies.get(rigid_body.handle) {
            local_transform.update_from_isometry(body.position());
        }
    }
}
