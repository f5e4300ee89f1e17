// Library root: re-exports all modules so integration tests and the binary
// can reach the crate's public API.

pub mod app;
pub mod cli;
pub mod list;
pub mod protocol;
pub mod share;
pub mod tui;
