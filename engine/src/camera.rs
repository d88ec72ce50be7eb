use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            eye: Vec3::new(0.0, 64.0, 0.0),
            target: Vec3::new(0.0, 64.0, -1.0),
            up: Vec3::Y,
            fov_y_radians: 70.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1500.0,
        }
    }
}

// These impls could be moved to renderer, but in theory we might want to build game logic
// that depends on a player's view as well.
impl Camera {
    pub fn position(&self) -> Vec3 {
        self.eye
    }

    pub fn set_resolution(&mut self, resolution: Vec2) {
        if resolution.y > 0.0 {
            self.aspect = resolution.x / resolution.y;
        }
    }

    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, self.aspect, self.near, self.far)
    }

    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn get_projection_view_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }
}
