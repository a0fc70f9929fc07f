//! Core type definitions for folio.
//!
//! This crate defines the fundamental types used throughout the share
//! pipeline:
//! - Row identifiers for owners, sections, projects, links and features
//!   (UUID v7)
//! - [`ShareToken`] — the opaque public share identifier, with format
//!   validation that runs before any backend call
//! - [`sanitize`] — stripping of markup-unsafe characters from
//!   owner-authored text
//!
//! All relational model types (profiles, sections, view events, etc.)
//! belong in `folio-model`, not here.

mod ids;
mod sanitize;
mod token;

pub use ids::{FeatureId, LinkId, OwnerId, ProjectId, SectionId, ViewId};
pub use sanitize::sanitize;
pub use token::{ShareToken, TokenError};
