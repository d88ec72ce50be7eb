pub mod renderer_config;
pub mod rendering;
