use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{ChildStderr, Command as TokioCommand};
use tracing::{info, warn, Instrument};

/// Container format forced on the remux output.
pub const TARGET_FORMAT: &str = "flv";

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("error starting ffmpeg at {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not open ffmpeg stderr")]
    MissingStderr,

    #[error("error waiting for ffmpeg: {0}")]
    Wait(#[source] io::Error),

    #[error("ffmpeg output reader failed: {0}")]
    Drain(#[source] tokio::task::JoinError),

    #[error("ffmpeg exited with status {code:?}")]
    Failed { code: Option<i32> },
}

impl TranscodeError {
    /// The executable could not be run at all, so no later job can succeed either.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::MissingStderr)
    }
}

/// Remux a local input file into a local output file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemuxExecutor: Send + Sync {
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

pub struct FfmpegRemuxer {
    ffmpeg_path: PathBuf,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

/// Arguments for a stream-copy remux into the target container.
pub fn remux_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-loglevel", "warning", "-hide_banner", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args.extend(["-c", "copy", "-f", TARGET_FORMAT].iter().map(OsString::from));
    args.push(output.as_os_str().to_owned());
    args
}

/// Read `reader` line by line and hand every non-blank, trimmed line to `on_line`.
pub async fn capture_output<R, F>(reader: R, mut on_line: F) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if !line.is_empty() {
            on_line(line);
        }
    }
}

fn spawn_stderr_reader(stderr: ChildStderr) -> tokio::task::JoinHandle<()> {
    tokio::spawn(
        async move {
            let result = capture_output(stderr, |line| warn!("{}", line)).await;
            if let Err(e) = result {
                warn!(error = %e, "unable to read ffmpeg output");
            }
        }
        .in_current_span(),
    )
}

#[async_trait]
impl RemuxExecutor for FfmpegRemuxer {
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let span = tracing::info_span!(
            "ffmpeg",
            video_input = %input.display(),
            destination_file = %output.display()
        );

        async {
            info!("starting remux");

            let mut child = TokioCommand::new(&self.ffmpeg_path)
                .args(remux_args(input, output))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| TranscodeError::Spawn {
                    program: self.ffmpeg_path.display().to_string(),
                    source,
                })?;

            let stderr = child.stderr.take().ok_or(TranscodeError::MissingStderr)?;
            let drain = spawn_stderr_reader(stderr);

            // Both the exit status and the drained output must be in before we return.
            let status = child.wait().await;
            let drained = drain.await;
            let status = status.map_err(TranscodeError::Wait)?;
            drained.map_err(TranscodeError::Drain)?;

            if !status.success() {
                return Err(TranscodeError::Failed {
                    code: status.code(),
                });
            }

            info!("remux complete");
            Ok::<(), TranscodeError>(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remux_args_contract() {
        let args = remux_args(Path::new("/tmp/in.mp4"), Path::new("/tmp/out.flv"));
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();

        assert_eq!(
            args,
            vec![
                "-loglevel",
                "warning",
                "-hide_banner",
                "-i",
                "/tmp/in.mp4",
                "-c",
                "copy",
                "-f",
                "flv",
                "/tmp/out.flv",
            ]
        );
    }

    #[tokio::test]
    async fn test_capture_output_skips_blank_lines() {
        let input: &[u8] = b"  first warning  \n\n   \r\nsecond\nlast without newline";
        let mut lines = Vec::new();

        capture_output(input, |line| lines.push(line.to_string()))
            .await
            .unwrap();

        assert_eq!(lines, vec!["first warning", "second", "last without newline"]);
    }

    #[tokio::test]
    async fn test_capture_output_tolerates_invalid_utf8() {
        let input: &[u8] = b"bad \xff byte\n";
        let mut lines = Vec::new();

        capture_output(input, |line| lines.push(line.to_string()))
            .await
            .unwrap();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("bad"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_fatal() {
        let remuxer = FfmpegRemuxer::new("/nonexistent/bin/ffmpeg");
        let err = remuxer
            .remux(Path::new("/tmp/in.mp4"), Path::new("/tmp/out.flv"))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscodeError::Spawn { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_failed_exit_is_not_fatal() {
        assert!(!TranscodeError::Failed { code: Some(1) }.is_fatal());
    }
}
