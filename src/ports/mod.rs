//! Ports - Trait definitions implemented by adapters.

use std::error::Error;

pub mod audit;
pub mod storage;

/// Error type returned across port boundaries.
pub type BoxError = Box<dyn Error + Send + Sync>;
