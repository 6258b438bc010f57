use glam::Vec3;

/// A light that shines in all directions from the entity's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Brightness, where 1 is unscaled
    pub intensity: f32,
    /// Diffuse colour, linear RGB
    pub diffuse: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            intensity: 1.,
            diffuse: Vec3::ONE,
        }
    }
}
