// Library root: re-exports the event loop, protocol types, and TUI so
// integration tests can drive them.

pub mod app;
pub mod protocol;
pub mod tui;
