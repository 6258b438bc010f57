use glam::Vec3;

/// The backdrop of the scene: a flat ground plane and a skybox surrounding the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Width and depth of the ground plane, in metres
    pub ground_size: f32,
    /// Edge length of the skybox cube, in metres
    pub skybox_size: f32,
    /// Linear RGB
    pub skybox_color: Vec3,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ground_size: 50.,
            skybox_size: 50.,
            skybox_color: Vec3::ZERO,
        }
    }
}
