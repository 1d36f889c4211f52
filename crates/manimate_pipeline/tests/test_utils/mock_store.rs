//! Recording script store.

use async_trait::async_trait;
use manimate_core::GeneratedScript;
use manimate_error::{StorageError, StorageErrorKind};
use manimate_interface::ScriptStore;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One recorded persist call.
#[derive(Debug, Clone)]
pub struct Persisted {
    pub entry_point: String,
    pub prompt: String,
    pub attempt: u32,
    pub max_attempts: u32,
}

/// Store that records calls and optionally fails every write.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    fail: bool,
    persisted: Arc<Mutex<Vec<Persisted>>>,
}

impl MockStore {
    /// Store whose writes succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose writes fail.
    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every persist call, in order.
    #[allow(dead_code)]
    pub fn persisted(&self) -> Vec<Persisted> {
        self.persisted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptStore for MockStore {
    async fn persist(
        &self,
        script: &GeneratedScript,
        originating_prompt: &str,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<PathBuf, StorageError> {
        self.persisted.lock().unwrap().push(Persisted {
            entry_point: script.entry_point_name().clone(),
            prompt: originating_prompt.to_string(),
            attempt,
            max_attempts,
        });
        if self.fail {
            return Err(StorageError::new(StorageErrorKind::FileWrite(
                "disk full".to_string(),
            )));
        }
        Ok(PathBuf::from(format!(
            "outputs/scripts/{}.py",
            script.entry_point_name()
        )))
    }
}
