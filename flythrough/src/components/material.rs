use glam::Vec3;

/// A simple unlit-ish material. Colours are linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Colour lit by the scene's lights
    pub diffuse: Vec3,
    /// Colour of highlights
    pub specular: Vec3,
    /// Colour given off regardless of lighting
    pub emissive: Vec3,
}

impl Material {
    /// A material that glows with a single colour and has no highlights
    pub fn emissive(color: Vec3) -> Self {
        Self {
            diffuse: color,
            specular: Vec3::ZERO,
            emissive: color,
        }
    }
}
