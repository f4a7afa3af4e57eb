pub mod load_config;
pub mod load_handlers;
