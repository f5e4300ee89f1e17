// Library root: the conference record model and the pure logic shared by the
// dashboard, the CLI and the upstream sync.

pub mod conference;
pub mod config;
pub mod country;
pub mod deadline;
pub mod filter;
pub mod loader;
pub mod tags;
