//! Record-linkage workflows.
//!
//! Each workflow call runs as its own tokio task and reports through a
//! notification primitive instead of a return value:
//! - lookups and listings replace the value in a [`LatestSlot`],
//! - saves fire a one-shot [`SaveOutcome`] on an [`EventChannel`].
//!
//! Storage failures never escape a workflow; they degrade to an absent value
//! or a failed save event. Caller-side preconditions (plate length, non-blank
//! user) are documented on each entry point and are not re-checked here.
//!
//! [`LatestSlot`]: patente_core::LatestSlot
//! [`EventChannel`]: patente_core::EventChannel

pub mod list;
pub mod lookup;
pub mod save;
pub mod scan;

pub use list::ListWorkflow;
pub use lookup::LookupWorkflow;
pub use save::{SaveOutcome, SaveWorkflow};
pub use scan::{PlateScan, ScanWorkflow};

#[cfg(test)]
pub(crate) mod testing;
