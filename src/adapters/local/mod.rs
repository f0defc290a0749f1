//! Local adapters for running the pipeline without AWS.

pub mod audit;
pub mod fs;

pub use audit::JsonlAuditLog;
pub use fs::FsAdapter;
