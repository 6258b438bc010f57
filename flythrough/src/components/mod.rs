/// The flat-screen camera
pub mod camera;
/// Ground and skybox
pub mod environment;
/// Where an entity is in global space
pub mod global_transform;
/// Names for entities
pub mod info;
/// Where an entity is relative to its parent
pub mod local_transform;
/// Surface colours
pub mod material;
/// Entity hierarchies
pub mod parent;
/// Tag for entities moved by the physics simulation
pub mod physics_controlled;
/// Lights
pub mod point_light;
/// Built in shapes
pub mod primitive;
/// Links between entities and rapier rigid bodies
pub mod rigid_body;

pub use camera::Camera;
pub use environment::Environment;
pub use global_transform::GlobalTransform;
pub use info::Info;
pub use local_transform::LocalTransform;
pub use material::Material;
pub use parent::Parent;
pub use physics_controlled::PhysicsControlled;
pub use point_light::PointLight;
pub use primitive::Primitive;
pub use rigid_body::RigidBody;
