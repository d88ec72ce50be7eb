pub mod aabb;
pub mod frustum;
pub mod plane;
