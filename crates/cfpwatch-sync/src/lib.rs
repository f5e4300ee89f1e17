// Upstream refresh: pull conference records from the ccfddl dataset, map
// them onto the local record format and merge them into the per-record
// directory without clobbering hand-curated fields.

pub mod error;
pub mod merge;
pub mod pipeline;
pub mod transform;
pub mod upstream;

pub use error::SyncError;
