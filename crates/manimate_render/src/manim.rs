//! Manim CLI renderer.

use crate::RenderSettings;
use async_trait::async_trait;
use manimate_core::{RenderJob, RenderOutcome, ToolAvailability};
use manimate_error::{RenderError, RenderErrorKind, ValidationErrorKind};
use manimate_interface::Renderer;
use manimate_script::screen_source;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

const SCRIPT_FILE: &str = "scene.py";
const MEDIA_DIR: &str = "media";

/// Renders scripts by running the manim CLI in a throwaway directory.
#[derive(Debug, Clone, Default)]
pub struct ManimRenderer {
    settings: RenderSettings,
}

impl ManimRenderer {
    /// Create a renderer.
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Renderer settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn command(&self) -> Command {
        let mut command = Command::new(self.settings.program());
        command
            .args(self.settings.program_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Screen the source before it is ever executed.
    fn screen(&self, source: &str) -> Option<String> {
        match screen_source(source) {
            Ok(report) if report.is_clean() => None,
            Ok(report) => Some(report.to_string()),
            Err(e) => Some(match e.kind {
                ValidationErrorKind::Unparseable(detail) => format!("Syntax error: {}", detail),
                other => format!("Code validation error: {}", other),
            }),
        }
    }
}

#[async_trait]
impl Renderer for ManimRenderer {
    #[instrument(skip(self), fields(program = %self.settings.program()))]
    async fn check_installation(&self) -> ToolAvailability {
        let mut command = self.command();
        command.arg("--version");

        let output = match tokio::time::timeout(
            *self.settings.version_check_timeout(),
            command.output(),
        )
        .await
        {
            Err(_) => {
                return ToolAvailability::Unavailable {
                    reason: "Manim version check timed out".to_string(),
                };
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return ToolAvailability::Unavailable {
                    reason: "Manim not installed".to_string(),
                };
            }
            Ok(Err(e)) => {
                return ToolAvailability::Unavailable {
                    reason: format!("Error checking Manim installation: {}", e),
                };
            }
            Ok(Ok(output)) => output,
        };

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            debug!(version = %version, "Manim available");
            ToolAvailability::Available { version }
        } else {
            ToolAvailability::Unavailable {
                reason: "Manim not found or not working".to_string(),
            }
        }
    }

    #[instrument(
        skip(self, job),
        fields(entry_point = %job.entry_point(), quality = %job.quality())
    )]
    async fn render(&self, job: &RenderJob) -> Result<RenderOutcome, RenderError> {
        if let Some(diagnostic) = self.screen(job.source_code()) {
            warn!(diagnostic = %diagnostic, "Script rejected before rendering");
            return Ok(RenderOutcome::failed(diagnostic));
        }

        let workspace = tempfile::Builder::new()
            .prefix("manimate-")
            .tempdir()
            .map_err(|e| RenderError::new(RenderErrorKind::Workspace(e.to_string())))?;
        let script_path = workspace.path().join(SCRIPT_FILE);
        tokio::fs::write(&script_path, job.source_code())
            .await
            .map_err(|e| {
                RenderError::new(RenderErrorKind::Workspace(format!(
                    "{}: {}",
                    script_path.display(),
                    e
                )))
            })?;

        let entry_point = job.entry_point();
        let mut command = self.command();
        command
            .current_dir(workspace.path())
            .arg(SCRIPT_FILE)
            .arg(entry_point)
            .arg(job.quality().flag())
            .arg("--output_file")
            .arg(format!("{}.mp4", entry_point));

        debug!(workspace = %workspace.path().display(), "Running manim");
        let timeout = *self.settings.timeout();
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "Render timed out");
                return Ok(RenderOutcome::failed(format!(
                    "Manim rendering timed out after {} seconds",
                    timeout.as_secs()
                )));
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(RenderError::new(RenderErrorKind::ToolMissing(format!(
                    "{}: {}",
                    self.settings.program(),
                    e
                ))));
            }
            Ok(Err(e)) => {
                return Err(RenderError::new(RenderErrorKind::Spawn(e.to_string())));
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).into_owned()
            } else {
                stderr.into_owned()
            };
            return Ok(RenderOutcome::failed(format!("Manim error: {}", detail)));
        }

        let Some(video) = find_video(&workspace.path().join(MEDIA_DIR), entry_point).await else {
            return Ok(RenderOutcome::failed("No video file generated"));
        };

        let artifact_path = collect_artifact(&video, job.output_directory(), entry_point).await?;
        info!(artifact = %artifact_path.display(), "Render succeeded");
        Ok(RenderOutcome::Rendered { artifact_path })
    }
}

/// Newest `.mp4` under `media_dir`, preferring one named after the scene.
async fn find_video(media_dir: &Path, entry_point: &str) -> Option<PathBuf> {
    let mut pending = vec![media_dir.to_path_buf()];
    let mut videos = Vec::new();

    while let Some(dir) = pending.pop() {
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            match entry.file_type().await {
                Ok(kind) if kind.is_dir() => pending.push(path),
                Ok(kind) if kind.is_file() => {
                    if path.extension().is_some_and(|ext| ext == "mp4") {
                        let modified = entry.metadata().await.and_then(|m| m.modified()).ok();
                        videos.push((modified, path));
                    }
                }
                _ => {}
            }
        }
    }

    // Newest first; unknown times sort last.
    videos.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    let named = videos
        .iter()
        .position(|(_, path)| path.file_stem().is_some_and(|stem| stem == entry_point));
    match named {
        Some(index) => Some(videos.swap_remove(index).1),
        None => videos.into_iter().next().map(|(_, path)| path),
    }
}

/// Copy the video out of the workspace before it is deleted.
async fn collect_artifact(
    video: &Path,
    output_directory: &Path,
    entry_point: &str,
) -> Result<PathBuf, RenderError> {
    tokio::fs::create_dir_all(output_directory)
        .await
        .map_err(|e| {
            RenderError::new(RenderErrorKind::ArtifactCollection(format!(
                "{}: {}",
                output_directory.display(),
                e
            )))
        })?;

    let short_id = uuid::Uuid::new_v4().simple().to_string();
    let file_name = format!("{}_{}.mp4", entry_point, &short_id[..8]);
    let destination = output_directory.join(file_name);

    tokio::fs::copy(video, &destination).await.map_err(|e| {
        RenderError::new(RenderErrorKind::ArtifactCollection(format!(
            "copy {} to {}: {}",
            video.display(),
            destination.display(),
            e
        )))
    })?;

    Ok(destination)
}
