//! Audio/Video domain modules.

pub mod cmd;

pub use cmd::{FfmpegRemuxer, RemuxExecutor, TranscodeError};
