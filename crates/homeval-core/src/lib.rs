// Library root: property valuation state, request orchestration, and the
// Prediction Service client. The terminal front end lives in homeval-tui.

pub mod config;
pub mod display;
pub mod orchestrator;
pub mod prediction;
pub mod store;
