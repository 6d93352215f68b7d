//! Driving the external animation renderer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use melies_core::capability::SCENE_CLASS;
use melies_error::{MeliesResult, RenderError, RenderErrorKind};
use tracing::info;

use crate::process::{self, CommandSpec};
use crate::resolve;

/// Renders a generated scene file into a silent video.
///
/// The render tool decides where under the working directory the output
/// lands, so the produced file is located afterwards by a recursive search
/// for the requested file name.
#[derive(Debug, Clone)]
pub struct Renderer {
    command: String,
    quality_flag: String,
    timeout: Option<Duration>,
}

impl Renderer {
    /// Create a renderer invoking `command` with `quality_flag`.
    ///
    /// `timeout` of `None` lets renders run unbounded.
    pub fn new(
        command: impl Into<String>,
        quality_flag: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            command: command.into(),
            quality_flag: quality_flag.into(),
            timeout,
        }
    }

    /// Render `code_path` inside `videos_dir`, producing `output_file_name`.
    ///
    /// Returns the resolved path of the produced file.
    pub async fn render(
        &self,
        code_path: &Path,
        videos_dir: &Path,
        output_file_name: &str,
    ) -> MeliesResult<PathBuf> {
        let spec = CommandSpec::new(self.command.as_str())
            .arg(self.quality_flag.as_str())
            .arg("-o")
            .arg(output_file_name)
            .arg(code_path.display().to_string())
            .arg(SCENE_CLASS)
            .current_dir(videos_dir)
            .timeout(self.timeout);
        let output = process::run(&spec).await?;
        info!(file = %output_file_name, code = ?output.status_code, "renderer finished");

        resolve::find_file(videos_dir, output_file_name).ok_or_else(|| {
            RenderError::new(RenderErrorKind::OutputNotFound {
                file_name: output_file_name.to_string(),
                search_root: videos_dir.display().to_string(),
            })
            .into()
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use melies_error::MeliesErrorKind;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
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
    async fn renders_and_resolves_nested_output() {
        let dir = TempDir::new().expect("temp dir");
        let videos = dir.path().join("videos");
        fs::create_dir(&videos).expect("mkdir");
        let args_path = dir.path().join("args.log");
        let script = format!(
            r#"#!/bin/sh
set -eu
echo "$@" > "{args_file}"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then
    out="$a"
  fi
  prev="$a"
done
mkdir -p media/videos/scene/720p30
printf 'video' > "media/videos/scene/720p30/$out"
"#,
            args_file = args_path.display()
        );
        let tool = write_script(&dir, "fake-renderer", &script);

        let code_path = dir.path().join("scene_1.py");
        fs::write(&code_path, "class ManimScene: pass").expect("write code");

        let renderer = Renderer::new(tool.display().to_string(), "-qm", None);
        let produced = renderer
            .render(&code_path, &videos, "silent_1.mp4")
            .await
            .expect("render succeeds");

        assert!(produced.is_file());
        assert!(produced.ends_with("media/videos/scene/720p30/silent_1.mp4"));

        let args = fs::read_to_string(&args_path).expect("read args");
        assert!(args.contains("-qm"), "quality flag missing: {args}");
        assert!(args.contains("-o silent_1.mp4"), "output name missing: {args}");
        assert!(args.contains("scene_1.py"), "source path missing: {args}");
        assert!(
            args.trim_end().ends_with("ManimScene"),
            "scene class not last: {args}"
        );
    }

    #[tokio::test]
    async fn multi_token_command_reaches_the_tool() {
        let dir = TempDir::new().expect("temp dir");
        let videos = dir.path().join("videos");
        fs::create_dir(&videos).expect("mkdir");
        let args_path = dir.path().join("args.log");
        let script = format!(
            r#"#!/bin/sh
set -eu
echo "$@" > "{args_file}"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then
    out="$a"
  fi
  prev="$a"
done
printf 'video' > "$out"
"#,
            args_file = args_path.display()
        );
        let tool = write_script(&dir, "fake-renderer", &script);

        let code_path = dir.path().join("scene_2.py");
        fs::write(&code_path, "class ManimScene: pass").expect("write code");

        let renderer = Renderer::new(format!("{} render", tool.display()), "-qm", None);
        renderer
            .render(&code_path, &videos, "silent_2.mp4")
            .await
            .expect("render succeeds");

        let args = fs::read_to_string(&args_path).expect("read args");
        assert!(
            args.starts_with("render "),
            "subcommand token not forwarded: {args}"
        );
    }

    #[tokio::test]
    async fn tool_failure_surfaces_exit_and_stderr() {
        let dir = TempDir::new().expect("temp dir");
        let videos = dir.path().join("videos");
        fs::create_dir(&videos).expect("mkdir");
        let tool = write_script(
            &dir,
            "fake-renderer",
            "#!/bin/sh\necho \"render exploded\" >&2\nexit 3\n",
        );

        let code_path = dir.path().join("scene_3.py");
        fs::write(&code_path, "class ManimScene: pass").expect("write code");

        let renderer = Renderer::new(tool.display().to_string(), "-qm", None);
        let err = renderer
            .render(&code_path, &videos, "silent_3.mp4")
            .await
            .expect_err("expected failure");
        match err.kind() {
            MeliesErrorKind::Process(p) => {
                let text = format!("{p}");
                assert!(text.contains("exited with status 3"), "{text}");
                assert!(text.contains("render exploded"), "{text}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn silent_success_without_output_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let videos = dir.path().join("videos");
        fs::create_dir(&videos).expect("mkdir");
        let tool = write_script(&dir, "fake-renderer", "#!/bin/sh\nexit 0\n");

        let code_path = dir.path().join("scene_4.py");
        fs::write(&code_path, "class ManimScene: pass").expect("write code");

        let renderer = Renderer::new(tool.display().to_string(), "-qm", None);
        let err = renderer
            .render(&code_path, &videos, "silent_4.mp4")
            .await
            .expect_err("expected missing output");
        match err.kind() {
            MeliesErrorKind::Render(r) => {
                assert!(matches!(r.kind, RenderErrorKind::OutputNotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
