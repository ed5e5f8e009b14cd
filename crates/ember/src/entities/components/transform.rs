use crate::entities::Component;
use glam::{Mat4, Vec3};

/// Represents a 3D entity transform, as separate translation, rotation and scale vectors.
///
/// The matrices are derived data, filled in every frame by
/// [`TransformSystem`](crate::systems::TransformSystem) (local) and
/// [`LinkSystem`](crate::systems::LinkSystem) (world).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    pub translation: Vec3,
    /// Euler angles in radians, applied X, then Y, then Z.
    pub rotation: Vec3,
    pub scale: Vec3,

    pub local_matrix: Mat4,
    pub world_matrix: Mat4,
    /// Whether the last recomputation changed the local matrix.
    pub is_dirty: bool,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }
}

impl TransformComponent {
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            is_dirty: true,
        }
    }

    /// Composes the local matrix out of the current fields, as
    /// `Scale · RotateX · RotateY · RotateZ · Translate`.
    pub fn compose_local(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_translation(self.translation)
    }

    /// Adds the provided vector to this transform's translation.
    #[inline]
    pub fn translate(&mut self, v: Vec3) {
        self.translation += v;
    }

    /// Returns the world space position, as of the last world matrix update.
    #[inline]
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }
}
