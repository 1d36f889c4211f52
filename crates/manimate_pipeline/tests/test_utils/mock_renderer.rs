//! Scripted renderer.

use async_trait::async_trait;
use manimate_core::{RenderJob, RenderOutcome, ToolAvailability};
use manimate_error::{RenderError, RenderErrorKind};
use manimate_interface::Renderer;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct State {
    availability: ToolAvailability,
    outcomes: VecDeque<Result<RenderOutcome, RenderErrorKind>>,
    jobs: Vec<RenderJob>,
    checks: usize,
}

/// Renderer that answers from a queue and records every job.
#[derive(Debug, Clone)]
pub struct MockRenderer {
    state: Arc<Mutex<State>>,
}

impl MockRenderer {
    /// Available renderer with scripted outcomes.
    pub fn new(outcomes: Vec<Result<RenderOutcome, RenderErrorKind>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                availability: ToolAvailability::Available {
                    version: "Manim Community v0.18.1".to_string(),
                },
                outcomes: outcomes.into(),
                jobs: Vec::new(),
                checks: 0,
            })),
        }
    }

    /// Renderer whose installation check fails.
    #[allow(dead_code)]
    pub fn unavailable(reason: &str) -> Self {
        let renderer = Self::new(Vec::new());
        renderer.state.lock().unwrap().availability = ToolAvailability::Unavailable {
            reason: reason.to_string(),
        };
        renderer
    }

    /// Successful outcome for a media file at `path`.
    #[allow(dead_code)]
    pub fn rendered(path: &str) -> Result<RenderOutcome, RenderErrorKind> {
        Ok(RenderOutcome::Rendered {
            artifact_path: PathBuf::from(path),
        })
    }

    /// Failed outcome with `diagnostic`.
    #[allow(dead_code)]
    pub fn failed(diagnostic: &str) -> Result<RenderOutcome, RenderErrorKind> {
        Ok(RenderOutcome::failed(diagnostic))
    }

    /// Number of render calls received.
    pub fn render_count(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }

    /// Every job received, in order.
    #[allow(dead_code)]
    pub fn jobs(&self) -> Vec<RenderJob> {
        self.state.lock().unwrap().jobs.clone()
    }

    /// Number of installation checks.
    #[allow(dead_code)]
    pub fn check_count(&self) -> usize {
        self.state.lock().unwrap().checks
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn check_installation(&self) -> ToolAvailability {
        let mut state = self.state.lock().unwrap();
        state.checks += 1;
        state.availability.clone()
    }

    async fn render(&self, job: &RenderJob) -> Result<RenderOutcome, RenderError> {
        let mut state = self.state.lock().unwrap();
        state.jobs.push(job.clone());
        match state.outcomes.pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(kind)) => Err(RenderError::new(kind)),
            None => Ok(RenderOutcome::failed("No outcome scripted")),
        }
    }
}
