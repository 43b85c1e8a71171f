pub mod generate_config;
pub mod map;
