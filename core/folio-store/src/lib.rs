//! SQLite storage layer for folio.
//!
//! Provides persistent storage for share records, profiles, the
//! section/project/link/feature graph, and append-only view events.
//!
//! # Architecture
//!
//! - One [`SqliteStore`] per process, shared behind an `Arc`
//! - The schema is created idempotently on open
//! - Creation order is the only persisted order: reads sort by
//!   `created_at` then row id (UUID v7, itself time-ordered)
//! - The public resolution path reaches this crate only through the
//!   `ShareBackend` trait; owner-side writes go through `ShareAdmin`

mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::SqliteStore;
