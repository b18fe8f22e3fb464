// Infrastructure layer - file-backed adapters and configuration
pub mod config;
pub mod json_source;
pub mod memory_source;
pub mod png_export;
pub mod preference_store;
