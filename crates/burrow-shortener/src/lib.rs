//! URL shortener service implementation.
//!
//! This crate provides the resolution service on top of any storage backend
//! and the settings used to pick that backend at startup. Core types are
//! re-exported from `burrow_core`.

pub mod config;
pub mod service;

pub use burrow_core::{
    BatchEntry, BatchItem, ShortCode, Shortened, Shortener, ShortenerError, StorageError,
};
pub use config::{ConfigError, Settings, StorageBackend};
pub use service::ShortenerService;
