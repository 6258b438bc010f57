use anyhow::{anyhow, Result};
use hecs::{Entity, World};
use rapier3d::prelude::*;

use crate::components::RigidBody as RigidBodyComponent;

/// The longest step we'll hand to rapier. Anything longer (eg. after a breakpoint or a long
/// stall loading assets) is clamped so bodies don't tunnel through each other.
const MAX_TIMESTEP: f32 = 1. / 20.;

pub struct PhysicsContext {
    pub physics_pipeline: PhysicsPipeline,
    pub gravity: Vector<Real>,
    pub query_pipeline: QueryPipeline,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhase,
    pub narrow_phase: NarrowPhase,
    pub rigid_bodies: RigidBodySet,
    pub island_manager: IslandManager,
    pub integration_parameters: IntegrationParameters,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl Default for PhysicsContext {
    fn default() -> Self {
        // Objects in this world float until something pushes them.
        let gravity = vector![0.0, 0.0, 0.0];
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1. / crate::DEFAULT_FRAME_RATE;

        PhysicsContext {
            physics_pipeline: PhysicsPipeline::new(),
            gravity,
            query_pipeline: QueryPipeline::new(),
            colliders: ColliderSet::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            island_manager: IslandManager::new(),
            integration_parameters,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }
}

impl PhysicsContext {
    /// Advance the simulation by `delta_seconds`
    pub fn update(&mut self, delta_seconds: f32) {
        if delta_seconds <= 0. {
            return;
        }
        self.integration_parameters.dt = delta_seconds.min(MAX_TIMESTEP);

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn create_rigid_body_and_collider(
        &mut self,
        entity: Entity,
        rigid_body: RigidBody,
        mut collider: Collider,
    ) -> RigidBodyComponent {
        collider.user_data = entity.to_bits().get() as _;

        let handle = self.rigid_bodies.insert(rigid_body);
        let collider =
            self.colliders
                .insert_with_parent(collider, handle, &mut self.rigid_bodies);

        RigidBodyComponent { handle, collider }
    }

    pub fn get_rigid_body<'a>(
        &'a mut self,
        world: &World,
        entity: Entity,
    ) -> Result<&'a mut RigidBody> {
        let handle = world.get::<&RigidBodyComponent>(entity)?.handle;
        self.rigid_bodies
            .get_mut(handle)
            .ok_or_else(|| anyhow!("Unable to get Rigid Body for handle!"))
    }
}
