pub mod config_manager;
pub mod engine_config;
