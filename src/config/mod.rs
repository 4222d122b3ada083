//! Configuration Management
//!
//! Settings loaded from files and environment variables.

pub mod settings;

pub use settings::{
    CorsSettings, DatabaseSettings, KybSettings, RedisSettings, RegistrySettings, ServerSettings,
    Settings,
};
