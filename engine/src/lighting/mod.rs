pub mod light;
pub mod sky_light;
