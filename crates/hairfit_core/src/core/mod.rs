//! # Core Module
//!
//! Shared configuration for every subsystem of the placement tool.

pub mod config;

pub use config::{
    ApplicationConfig,
    AssetConfig,
    CameraConfig,
    EngineConfig,
    PlacementConfig,
    ViewportConfig,
};
pub use crate::config::{Config, ConfigError};
