use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

#[derive(Copy, Clone, Pod, Zeroable, Debug, Default)]
#[repr(C)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Builds a plane from `ax + by + cz + d = 0` coefficients, normalizing the normal.
    pub fn from_coefficients(coefficients: Vec4) -> Plane {
        let length = coefficients.xyz().length();
        let scaled = if length > 0.0 {
            coefficients / length
        } else {
            coefficients
        };
        Plane {
            normal: scaled.xyz(),
            distance: scaled.w,
        }
    }

    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}
