//! Share resolution and view recording for folio.
//!
//! This crate is the heart of the public pipeline:
//! - [`resolve`] turns a candidate share identifier into a normalized view
//!   model or a unified not-found outcome, failing closed on every
//!   ambiguous or erroneous path
//! - [`ViewRecorder`] reports a successful resolution as an analytics
//!   event, at most once per view, fire-and-forget
//! - [`ShareLinkManager`] is the owner-side surface that creates, rotates
//!   and toggles share links
//!
//! Nothing here renders; the presentation shell in `folio-server` consumes
//! [`Resolution`] and decides what the visitor sees.

mod manager;
mod recorder;
mod resolver;

pub use manager::{ShareLinkManager, ShareLinkStatus};
pub use recorder::ViewRecorder;
pub use resolver::{resolve, Resolution, FETCH_TIMEOUT};
