//! Storage backends for the Burrow URL shortener.
//!
//! Three interchangeable [`Repository`] implementations:
//! [`InMemoryRepository`], [`FileRepository`] (in-memory plus a JSON
//! snapshot on disk) and [`PgRepository`].

pub mod file;
pub mod memory;
pub mod postgres;
pub mod snapshot;

pub use burrow_core::repository::{InsertOutcome, Mapping, Repository};
pub use burrow_core::StorageError;
pub use file::FileRepository;
pub use memory::InMemoryRepository;
pub use postgres::PgRepository;
