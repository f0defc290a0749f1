//! Application layer - Services that use ports.

pub mod orchestrator;

pub use orchestrator::{RemuxError, RemuxService};
