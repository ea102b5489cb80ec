//! Core connector infrastructure

pub mod config;
pub mod constants;
pub mod status;

pub use config::{CacheBackendType, CacheConfig, ConfigError, ConnectorSettings, MappingRule};
pub use status::{ConnectorStatus, StatusKind};
