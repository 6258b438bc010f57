use flythrough::rapier3d::na as nalgebra;
use flythrough::{
    components::LocalTransform,
    contexts::PhysicsContext,
    glam::Vec3,
    hecs::{Entity, World},
    rapier3d::prelude::{vector, Vector},
};
use log::debug;

use crate::config::Propulsion;

/// A handle to the thing that flies at the player. We don't own the entity; we only push it around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingObject {
    pub entity: Entity,
    pub propulsion: Propulsion,
    /// Metres per second
    pub speed: f32,
    parked: bool,
}

impl MovingObject {
    /// Objects start out parked
    pub fn new(entity: Entity, propulsion: Propulsion, speed: f32) -> Self {
        Self {
            entity,
            propulsion,
            speed,
            parked: true,
        }
    }

    pub fn is_parked(&self) -> bool {
        self.parked
    }

    /// Move the object `speed * delta_seconds` metres along its own backward axis.
    /// Physics propelled objects are moved by the simulation instead, so this does nothing for them.
    pub fn advance(&mut self, world: &mut World, delta_seconds: f32) {
        if self.propulsion != Propulsion::Kinematic {
            return;
        }
        match world.get::<&mut LocalTransform>(self.entity) {
            Ok(mut local_transform) => {
                let step = local_transform.backward() * self.speed * delta_seconds;
                local_transform.translation += step;
            }
            Err(e) => debug!("Unable to move {:?}: {e}", self.entity),
        }
    }

    /// Set the object going. For physics propelled objects this wakes the rigid body and sends it
    /// backward at `speed`.
    pub fn resume(&mut self, world: &World, physics_context: &mut PhysicsContext) {
        self.parked = false;
        if self.propulsion != Propulsion::Physics {
            return;
        }
        match physics_context.get_rigid_body(world, self.entity) {
            Ok(rigid_body) => {
                let backward = rigid_body.position().rotation * vector![0., 0., 1.];
                rigid_body.wake_up(true);
                rigid_body.set_linvel(backward * self.speed, true);
            }
            Err(e) => debug!("Unable to resume {:?}: {e}", self.entity),
        }
    }

    /// Stop the object where it is. Physics propelled objects lose their velocity and are put to sleep.
    pub fn park(&mut self, world: &World, physics_context: &mut PhysicsContext) {
        self.parked = true;
        if self.propulsion != Propulsion::Physics {
            return;
        }
        match physics_context.get_rigid_body(world, self.entity) {
            Ok(rigid_body) => {
                rigid_body.set_linvel(Vector::zeros(), false);
                rigid_body.set_angvel(Vector::zeros(), false);
                rigid_body.sleep();
            }
            Err(e) => debug!("Unable to park {:?}: {e}", self.entity),
        }
    }

    /// Where the object is right now, if it still exists
    pub fn translation(&self, world: &World) -> Option<Vec3> {
        world
            .get::<&LocalTransform>(self.entity)
            .ok()
            .map(|t| t.translation)
    }
}
