//! Script archive.

use crate::naming::{DEFAULT_MAX_FRAGMENT_LEN, script_file_name};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use derive_builder::Builder;
use derive_getters::Getters;
use manimate_core::GeneratedScript;
use manimate_error::{StorageError, StorageErrorKind};
use manimate_interface::ScriptStore;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where and how scripts are archived.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct ArchiveSettings {
    /// Directory receiving archived scripts
    scripts_dir: PathBuf,
    /// Cap on the prompt fragment in file names
    #[builder(default = "DEFAULT_MAX_FRAGMENT_LEN")]
    max_prompt_fragment_len: usize,
}

impl ArchiveSettings {
    /// Creates a new builder.
    pub fn builder() -> ArchiveSettingsBuilder {
        ArchiveSettingsBuilder::default()
    }
}

/// Writes successful scripts to the scripts directory with a provenance
/// header.
#[derive(Debug, Clone)]
pub struct ScriptArchiver {
    settings: ArchiveSettings,
}

impl ScriptArchiver {
    /// Create an archiver. The directory is created on first write.
    pub fn new(settings: ArchiveSettings) -> Self {
        Self { settings }
    }

    /// Archive settings.
    pub fn settings(&self) -> &ArchiveSettings {
        &self.settings
    }
}

/// Python docstring recording where a script came from.
pub fn provenance_header(
    script: &GeneratedScript,
    originating_prompt: &str,
    attempt: u32,
    max_attempts: u32,
    generated_at: NaiveDateTime,
) -> String {
    format!(
        "\"\"\"\nManim Script: {scene}\nGenerated: {generated}\nPrompt: {prompt}\nScene: {scene}\nDescription: {description}\nDuration: {duration}s\nAttempt: {attempt}/{max_attempts}\n\"\"\"\n\n",
        scene = script.entry_point_name(),
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
        prompt = docstring_safe(originating_prompt),
        description = docstring_safe(script.description()),
        duration = script.estimated_duration(),
    )
}

/// Names tried after `path` itself is taken: `<stem>_2.py` and upward.
const MAX_NAME_COLLISIONS: u32 = 100;

/// Write `contents` next to `path` through a private temp file, then link it
/// into place without replacing anything already there.
///
/// Returns the path actually written, which carries a numeric suffix when
/// another archive claimed `path` first.
fn write_unique(path: &Path, contents: &[u8]) -> Result<PathBuf, StorageError> {
    let write_error = |target: &Path, e: std::io::Error| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            target.display(),
            e
        )))
    };

    let dir = path
        .parent()
        .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidPath(path.display().to_string())))?;
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidPath(path.display().to_string())))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".manimate-")
        .suffix(".py.tmp")
        .tempfile_in(dir)
        .map_err(|e| write_error(dir, e))?;
    temp.write_all(contents).map_err(|e| write_error(temp.path(), e))?;
    temp.as_file().sync_all().map_err(|e| write_error(temp.path(), e))?;

    let mut candidate = path.to_path_buf();
    for n in 2..=MAX_NAME_COLLISIONS + 1 {
        match temp.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(taken = %candidate.display(), "Archive name in use");
                temp = e.file;
                candidate = dir.join(format!("{}_{}.py", stem, n));
            }
            Err(e) => return Err(write_error(&candidate, e.error)),
        }
    }
    Err(StorageError::new(StorageErrorKind::FileWrite(format!(
        "{}: no free name after {} tries",
        path.display(),
        MAX_NAME_COLLISIONS
    ))))
}

// Keep user text from closing the docstring early.
fn docstring_safe(text: &str) -> String {
    text.replace("\"\"\"", "\\\"\\\"\\\"")
}

#[async_trait]
impl ScriptStore for ScriptArchiver {
    #[tracing::instrument(
        skip(self, script, originating_prompt),
        fields(scene = %script.entry_point_name())
    )]
    async fn persist(
        &self,
        script: &GeneratedScript,
        originating_prompt: &str,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<PathBuf, StorageError> {
        let dir = self.settings.scripts_dir();
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        let now = Local::now().naive_local();
        let file_name = script_file_name(
            originating_prompt,
            script.entry_point_name(),
            attempt,
            now,
            *self.settings.max_prompt_fragment_len(),
        );
        let path = dir.join(&file_name);
        if path.file_name().is_none() || path.parent() != Some(dir.as_path()) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(
                path.display().to_string(),
            )));
        }

        let contents = format!(
            "{}{}",
            provenance_header(script, originating_prompt, attempt, max_attempts, now),
            script.source_code()
        );

        let bytes = contents.len();
        let target = path.clone();
        let path = tokio::task::spawn_blocking(move || write_unique(&target, contents.as_bytes()))
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })??;

        tracing::info!(path = %path.display(), bytes, "Archived script");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn header_records_provenance() {
        let script = GeneratedScript::builder()
            .entry_point_name("CircleScene")
            .description("A circle appears")
            .source_code("class CircleScene(Scene): pass")
            .estimated_duration(4.5)
            .build()
            .expect("complete builder");
        let at = NaiveDate::from_ymd_opt(2025, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .expect("valid timestamp");

        let header = provenance_header(&script, "say \"\"\"hi", 2, 3, at);

        assert!(header.starts_with("\"\"\"\nManim Script: CircleScene\n"));
        assert!(header.contains("Generated: 2025-01-02 03:04:05\n"));
        assert!(header.contains("Duration: 4.5s\n"));
        assert!(header.contains("Attempt: 2/3\n"));
        assert_eq!(header.matches("\"\"\"").count(), 2);
    }

    #[test]
    fn taken_name_gets_numbered_suffix() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("20250102_030405_circle_CircleScene.py");
        std::fs::write(&path, "first")?;

        let second = write_unique(&path, b"second")?;
        let third = write_unique(&path, b"third")?;

        assert_eq!(std::fs::read_to_string(&path)?, "first");
        assert_eq!(second, dir.path().join("20250102_030405_circle_CircleScene_2.py"));
        assert_eq!(std::fs::read_to_string(&second)?, "second");
        assert_eq!(third, dir.path().join("20250102_030405_circle_CircleScene_3.py"));
        assert_eq!(std::fs::read_to_string(&third)?, "third");
        Ok(())
    }
}
