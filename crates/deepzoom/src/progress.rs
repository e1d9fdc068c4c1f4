//! Build progress events.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

/// An observable step of a pyramid build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    Started {
        source_width: u32,
        source_height: u32,
        num_levels: u32,
    },
    LevelComplete {
        level: u32,
        width: u32,
        height: u32,
        cols: u32,
        rows: u32,
    },
    DescriptorWritten {
        path: PathBuf,
    },
    Finished {
        levels: u32,
        tiles: u64,
    },
}

/// Receives build events in the order they happen.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &BuildEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, event: &BuildEvent) {
        match event {
            BuildEvent::Started {
                source_width,
                source_height,
                num_levels,
            } => info!(
                source_width,
                source_height, num_levels, "Starting Deep Zoom tile generation"
            ),
            BuildEvent::LevelComplete {
                level,
                width,
                height,
                cols,
                rows,
            } => info!(level, width, height, cols, rows, "Level complete"),
            BuildEvent::DescriptorWritten { path } => {
                info!(path = %path.display(), "Descriptor saved")
            }
            BuildEvent::Finished { levels, tiles } => {
                info!(levels, tiles, "Deep Zoom generation complete")
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<BuildEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BuildEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Levels in the order their completion was reported.
    pub fn completed_levels(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BuildEvent::LevelComplete { level, .. } => Some(level),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: &BuildEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
