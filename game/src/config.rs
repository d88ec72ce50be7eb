use engine::{config::config_manager::Config, limits::VIEW_DISTANCE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Number of frames to run before exiting
    pub frames: u32,
    /// Half-width of the generated world, in chunks
    pub world_radius: i32,
    pub seed: u32,
    pub orbit_radius: f32,
    pub orbit_height: f32,
    /// Radians per second
    pub orbit_speed: f32,
}

impl Config for ClientConfig {
    fn get_path() -> &'static str {
        "client.ron"
    }

    fn is_valid(&self) -> bool {
        (1..=VIEW_DISTANCE).contains(&self.world_radius) && self.orbit_radius >= 0.0
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            world_radius: 4,
            seed: 1337,
            orbit_radius: 48.0,
            orbit_height: 96.0,
            orbit_speed: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ClientConfig = ron::from_str("(frames: 10, seed: 7)").unwrap();
        assert_eq!(config.frames, 10);
        assert_eq!(config.seed, 7);
        assert_eq!(config.world_radius, ClientConfig::default().world_radius);
        assert!(config.is_valid());
    }

    #[test]
    fn test_world_radius_is_limited() {
        let config = ClientConfig {
            world_radius: VIEW_DISTANCE + 1,
            ..Default::default()
        };
        assert!(!config.is_valid());
    }
}
