//! Bucket Filler - S3-triggered MP4 to FLV remuxing
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (events, jobs, audit records, ffmpeg invocation)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations
//! - application/: The remux orchestrator
//! - config: Environment configuration
//!
//! # Features
//! - `aws`: S3 storage and DynamoDB audit log adapters
//! - `local`: Filesystem storage and JSON-lines audit log adapters

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use application::{RemuxError, RemuxService};
pub use config::RemuxConfig;

#[cfg(feature = "local")]
pub use config::LocalConfig;
