//! Combining silent video and narration audio.

use std::path::Path;

use melies_error::MeliesResult;
use tracing::info;

use crate::process::{self, CommandSpec};

/// Muxes a silent video and a narration track into the final video.
///
/// Streams are copied, not re-encoded, except for the audio track which is
/// encoded to AAC so the container is playable everywhere. `-shortest`
/// trims the result to the shorter input, so narration never trails over a
/// finished animation or vice versa.
#[derive(Debug, Clone)]
pub struct Muxer {
    command: String,
}

impl Muxer {
    /// Create a muxer invoking `command`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Mux `silent_video` and `audio` into `output`.
    pub async fn mux(&self, silent_video: &Path, audio: &Path, output: &Path) -> MeliesResult<()> {
        let spec = CommandSpec::new(self.command.as_str())
            .arg("-i")
            .arg(silent_video.display().to_string())
            .arg("-i")
            .arg(audio.display().to_string())
            .args(["-c:v", "copy", "-c:a", "aac", "-shortest"])
            .arg(output.display().to_string());
        process::run(&spec).await?;
        info!(output = %output.display(), "mux completed");
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use melies_error::MeliesErrorKind;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("write script");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("set perms");
        path
    }

    #[tokio::test]
    async fn passes_the_expected_argument_order() {
        let dir = TempDir::new().expect("temp dir");
        let args_path = dir.path().join("args.log");
        let script = format!(
            r#"#!/bin/sh
set -eu
echo "$@" > "{args_file}"
for a in "$@"; do
  out="$a"
done
printf 'muxed' > "$out"
"#,
            args_file = args_path.display()
        );
        let tool = write_script(&dir, "fake-ffmpeg", &script);

        let silent = dir.path().join("silent_1.mp4");
        let audio = dir.path().join("audio_1.wav");
        let output = dir.path().join("final_1.mp4");
        fs::write(&silent, b"video").expect("write silent");
        fs::write(&audio, b"audio").expect("write audio");

        let muxer = Muxer::new(tool.display().to_string());
        muxer.mux(&silent, &audio, &output).await.expect("mux succeeds");

        assert_eq!(fs::read_to_string(&output).expect("read output"), "muxed");

        let args = fs::read_to_string(&args_path).expect("read args");
        let expected = format!(
            "-i {} -i {} -c:v copy -c:a aac -shortest {}",
            silent.display(),
            audio.display(),
            output.display()
        );
        assert_eq!(args.trim_end(), expected);
    }

    #[tokio::test]
    async fn tool_failure_surfaces_stderr() {
        let dir = TempDir::new().expect("temp dir");
        let tool = write_script(
            &dir,
            "fake-ffmpeg",
            "#!/bin/sh\necho \"unknown codec\" >&2\nexit 1\n",
        );

        let muxer = Muxer::new(tool.display().to_string());
        let err = muxer
            .mux(
                &dir.path().join("silent.mp4"),
                &dir.path().join("audio.wav"),
                &dir.path().join("final.mp4"),
            )
            .await
            .expect_err("expected failure");
        match err.kind() {
            MeliesErrorKind::Process(p) => {
                assert!(format!("{p}").contains("unknown codec"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
