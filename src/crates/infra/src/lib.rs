pub mod repository;

pub mod metadata;
pub use metadata::OmdbClient;

pub mod config;
pub use config::{AdminConfig, DatabaseConfig, OmdbConfig, ServerConfig};

pub mod auth;
