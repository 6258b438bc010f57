use flythrough::rapier3d::na as nalgebra;
use flythrough::{
    components::{
        Camera, Environment, GlobalTransform, Info, LocalTransform, Material, Parent,
        PhysicsControlled, PointLight, Primitive,
    },
    contexts::PhysicsContext,
    glam::Vec3,
    hecs::{Entity, World},
    rapier3d::prelude::{vector, ColliderBuilder, RigidBodyBuilder},
    FlythroughResult,
};

use crate::{
    config::{Config, Propulsion},
    resources::MovingObject,
};

pub const CAMERA_POSITION: Vec3 = Vec3::new(0., 1.6, 0.);
pub const LIGHT_POSITION: Vec3 = Vec3::new(0., 2.5, 0.);
pub const CUBE_START: Vec3 = Vec3::new(0.5, 1.6, -10.);
pub const CUBE_SIZE: f32 = 0.1;
pub const CUBE_MASS: f32 = 1.;
pub const CUBE_COLOR: Vec3 = Vec3::new(0.284, 0.73, 0.831);

/// The entities that make up the stage
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub camera: Entity,
    pub light: Entity,
    pub environment: Entity,
    pub cube: Entity,
    pub moving_object: MovingObject,
}

/// Put the camera, light, backdrop and cube into the world.
///
/// With kinematic propulsion the cube hangs off a "cubeRoot" group, and it's the group that moves.
/// With physics propulsion the cube gets a sleeping rigid body and moves itself.
pub fn add_scene(
    config: &Config,
    world: &mut World,
    physics_context: &mut PhysicsContext,
) -> FlythroughResult<Scene> {
    let camera = Camera::new(
        config.camera.fov_degrees,
        config.camera.near,
        config.camera.far,
    );
    let camera = world.spawn((
        Info::new("camera"),
        camera,
        LocalTransform::from_translation(CAMERA_POSITION),
        GlobalTransform::default(),
    ));

    let light = world.spawn((
        Info::new("light"),
        PointLight {
            intensity: 1.,
            diffuse: Vec3::splat(0.25),
        },
        LocalTransform::from_translation(LIGHT_POSITION),
        GlobalTransform::default(),
    ));

    let environment = world.spawn((Info::new("environment"), Environment::default()));

    let info = Info::new("cube");
    let primitive = Primitive::Box { size: CUBE_SIZE };
    let material = Material::emissive(CUBE_COLOR);

    let (cube, moving) = match config.propulsion {
        Propulsion::Kinematic => {
            let root = world.spawn((
                Info::new("cubeRoot"),
                LocalTransform::from_translation(CUBE_START),
                GlobalTransform::default(),
            ));
            let cube = world.spawn((
                info,
                primitive,
                material,
                LocalTransform::default(),
                GlobalTransform::default(),
                Parent(root),
            ));
            (cube, root)
        }
        Propulsion::Physics => {
            let cube = world.spawn((
                info,
                primitive,
                material,
                LocalTransform::from_translation(CUBE_START),
                GlobalTransform::default(),
                PhysicsControlled {},
            ));
            let half_extent = CUBE_SIZE / 2.;
            let rigid_body = RigidBodyBuilder::dynamic()
                .translation(vector![CUBE_START.x, CUBE_START.y, CUBE_START.z])
                .sleeping(true)
                .build();
            let collider = ColliderBuilder::cuboid(half_extent, half_extent, half_extent)
                .mass(CUBE_MASS)
                .build();
            let rigid_body =
                physics_context.create_rigid_body_and_collider(cube, rigid_body, collider);
            world
                .insert_one(cube, rigid_body)
                .map_err(anyhow::Error::from)?;
            (cube, cube)
        }
    };

    Ok(Scene {
        camera,
        light,
        environment,
        cube,
        moving_object: MovingObject::new(moving, config.propulsion, config.speed),
    })
}
