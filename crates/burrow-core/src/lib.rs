//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the types shared by the code generator, the storage
//! backends and the resolution service.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{InsertOutcome, Mapping, Repository};
pub use shortcode::ShortCode;
pub use shortener::{BatchEntry, BatchItem, Shortened, Shortener};
