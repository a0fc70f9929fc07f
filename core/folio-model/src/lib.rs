//! Portfolio data model for folio.
//!
//! Defines the relational shapes the share pipeline reads and writes:
//! - [`ShareRecord`] — one per owner, maps the current share token to its
//!   owner and carries the visibility flag
//! - [`ProfileData`] / [`SectionData`] / [`ProjectData`] / [`LinkData`] /
//!   [`FeatureData`] — the normalized public snapshot, in persisted
//!   creation order
//! - [`ViewEvent`] — append-only analytics record of an anonymous visit
//! - [`ShareBackend`] / [`ShareAdmin`] — the traits the resolver and the
//!   owner-side link manager speak to storage through
//!
//! These types are consumed by the store, the resolver, and (as JSON) the
//! HTTP view-model endpoint. They form the contract between the public
//! rendering path and the owner's editing surface.

mod backend;
mod portfolio;
mod record;
mod view;

pub use backend::{BackendError, BackendResult, ShareAdmin, ShareBackend};
pub use portfolio::{FeatureData, LinkData, ProfileData, ProjectData, SectionData};
pub use record::ShareRecord;
pub use view::ViewEvent;
