use glam::{Affine3A, Quat, Vec3};
use rapier3d::na;
use serde::{Deserialize, Serialize};

/// The component's position relative to its parent.
///
/// There are two ways to set an entity's position:
///
/// 1. **Game controlled** - just modify the [`LocalTransform`] and the entity will be moved relative to its
/// [`super::Parent`], if it has one.
/// 1. **Physics controlled** - if the entity has a [`super::RigidBody`] and the [`super::PhysicsControlled`]
/// tag, then [`crate::systems::physics_system`] will overwrite this with the body's position in the
/// physics simulation each frame.
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct LocalTransform {
    /// The translation of the entity
    pub translation: Vec3,
    /// The rotation of the entity
    pub rotation: Quat,
    /// The non-uniform scale of the entity
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Create a `LocalTransform` at the given position, with no rotation and a scale of one
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert the `LocalTransform` into an affine transform
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Update the translation and rotation from a rapier [`na::Isometry3`]
    pub fn update_from_isometry(&mut self, isometry: &na::Isometry3<f32>) {
        let t = isometry.translation.vector;
        let r = isometry.rotation.quaternion().coords;
        self.translation = Vec3::new(t.x, t.y, t.z);
        self.rotation = Quat::from_xyzw(r.x, r.y, r.z, r.w);
    }

    /// The direction this entity is facing. OpenXR is right handed, so this is -Z in local space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The opposite of [`LocalTransform::forward`]: +Z in local space.
    pub fn backward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rapier3d::na as nalgebra;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    pub fn test_backward_follows_rotation() {
        let mut transform = LocalTransform::default();
        assert_relative_eq!(transform.backward(), Vec3::Z);
        assert_relative_eq!(transform.forward(), Vec3::NEG_Z);

        // A quarter turn about Y points the back of the entity down +X
        transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
        assert_relative_eq!(transform.backward(), Vec3::X, epsilon = 1e-6);
    }

    #[test]
    pub fn test_update_from_isometry() {
        let isometry = na::Isometry3::new(na::vector![1.0, 2.0, 3.0], na::vector![0.0, FRAC_PI_2, 0.0]);
        let mut transform = LocalTransform::default();
        transform.update_from_isometry(&isometry);

        assert_relative_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(
            transform.rotation,
            Quat::from_rotation_y(FRAC_PI_2),
            epsilon = 1e-6
        );
    }
}
