use glam::Mat4;

/// The default vertical field of view, in degrees
pub const DEFAULT_FOV_DEGREES: f32 = 90.;
/// The default near clipping plane, in metres
pub const DEFAULT_NEAR: f32 = 0.1;
/// The default far clipping plane, in metres
pub const DEFAULT_FAR: f32 = 100.;

/// A component that describes the viewer's camera when the user is *not* in an immersive session.
/// Once the headset takes over, the views come from the XR runtime instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view, in radians
    pub fov_y: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Width divided by height of the surface being drawn to
    pub aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_FOV_DEGREES, DEFAULT_NEAR, DEFAULT_FAR)
    }
}

impl Camera {
    /// Create a camera with a field of view given in degrees and a square aspect ratio
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_degrees.to_radians(),
            near,
            far,
            aspect_ratio: 1.,
        }
    }

    /// Call this when the surface being drawn to changes size. Zero sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
    }

    /// The right handed projection matrix for this camera
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }
}
