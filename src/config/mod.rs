//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CatalogConfig, IngestionConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
