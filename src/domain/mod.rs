//! Domain layer - Pure business logic.

// ffmpeg remux invocation
pub mod av;

pub mod audit;
pub mod event;
pub mod jobs;
