use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::math::aabb::AABB;
use crate::math::plane::Plane;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Frustum {
    // Planes are in the order: left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Default for Frustum {
    fn default() -> Self {
        Frustum::from_projection_view(&Mat4::IDENTITY)
    }
}

impl Frustum {
    /// Extracts the clip planes of a GL style (-1..1 depth) projection-view matrix.
    /// Plane normals point into the frustum.
    pub fn from_projection_view(projection_view: &Mat4) -> Frustum {
        let row = |i: usize| projection_view.row(i);
        let (x, y, z, w) = (row(0), row(1), row(2), row(3));

        let planes = [w + x, w - x, w + y, w - y, w + z, w - z].map(Plane::from_coefficients);

        Frustum { planes }
    }

    pub fn update(&mut self, projection_view: &Mat4) {
        *self = Frustum::from_projection_view(projection_view);
    }

    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        let center = aabb.center();
        let extent = aabb.extent();

        for plane in &self.planes {
            let r = extent.dot(plane.normal.abs());
            let d = plane.distance_to_point(center);

            if d < -r {
                return false;
            }
        }
        true
    }
}
