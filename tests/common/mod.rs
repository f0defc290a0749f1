use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Stands in for ffmpeg: copies the `-i` input to the last argument.
/// Inputs named `*broken*` fail, inputs named `*chatty*` flood stderr first.
const FAKE_FFMPEG: &str = r#"#!/bin/sh
prev=""
for arg in "$@"; do
    if [ "$prev" = "-i" ]; then input="$arg"; fi
    prev="$arg"
done
case "$input" in
    *broken*)
        echo "$input: Invalid data found when processing input" >&2
        exit 3
        ;;
    *chatty*)
        i=0
        while [ $i -lt 20000 ]; do
            echo "frame $i: non-monotonous DTS in output stream" >&2
            i=$((i+1))
        done
        ;;
esac
echo "   Stream #0:1: Audio: aac, guessed channel layout   " >&2
echo "" >&2
cp "$input" "$prev"
"#;

static FAKE_BIN: OnceLock<(TempDir, PathBuf)> = OnceLock::new();

/// Path of the fake ffmpeg, written once per test binary so no test execs it
/// while another still holds it open for writing.
pub fn fake_ffmpeg() -> &'static Path {
    let (_, path) = FAKE_BIN.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ffmpeg");
        std::fs::write(&path, FAKE_FFMPEG).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    });
    path
}
