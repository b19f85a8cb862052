//! Label assignment for moved files.
//!
//! Labels are handed to an external mechanism after a successful move. The
//! production implementation spawns the `tag` command line tool
//! (`tag -a <label,label> <path>`) without waiting for it; finished children
//! are reaped on later requests and the rest when the batch ends.
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Default location of the `tag` tool.
pub const DEFAULT_TAG_COMMAND: &str = "/usr/local/bin/tag";

/// Failure to hand labels to the labeling mechanism.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The label command could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can attach labels to a file.
pub trait LabelAssigner {
    /// Requests that `labels` be attached to `path`. Only called with a
    /// non-empty label set.
    fn assign(&self, path: &Path, labels: &[String]) -> Result<(), LabelError>;

    /// The line reported in dry-run mode instead of calling [`assign`].
    ///
    /// [`assign`]: LabelAssigner::assign
    fn describe(&self, path: &Path, labels: &[String]) -> String;

    /// Waits for requests still in flight. Called once after the last file.
    fn finish(&self) {}
}

/// Runs the `tag` tool for each request.
#[derive(Debug)]
pub struct TagCommand {
    program: PathBuf,
    children: Mutex<Vec<Child>>,
}

impl TagCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Number of spawned label commands not yet reaped.
    pub fn pending(&self) -> usize {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn track(&self, child: Child) {
        let mut children = self.children.lock().unwrap_or_else(PoisonError::into_inner);
        children.retain_mut(|running| !matches!(running.try_wait(), Ok(Some(_))));
        children.push(child);
    }
}

impl Default for TagCommand {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_COMMAND)
    }
}

impl LabelAssigner for TagCommand {
    fn assign(&self, path: &Path, labels: &[String]) -> Result<(), LabelError> {
        let joined = labels.join(",");
        debug!(program = %self.program.display(), labels = %joined, path = %path.display(), "spawning label command");

        Command::new(&self.program)
            .arg("-a")
            .arg(&joined)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map(|child| self.track(child))
            .map_err(|e| LabelError::Spawn {
                program: self.program.clone(),
                source: e,
            })
    }

    fn finish(&self) {
        let children: Vec<Child> = self
            .children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for mut child in children {
            match child.wait() {
                Ok(status) if !status.success() => {
                    warn!(program = %self.program.display(), %status, "label command failed");
                }
                Ok(_) => {}
                Err(e) => warn!(program = %self.program.display(), error = %e, "waiting for label command"),
            }
        }
    }

    fn describe(&self, path: &Path, labels: &[String]) -> String {
        format!(
            "{} -a {} {}",
            self.program.display(),
            labels.join(","),
            path.display()
        )
    }
}

/// Accepts every request and does nothing. Used when labeling is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLabels;

impl LabelAssigner for NoLabels {
    fn assign(&self, _path: &Path, _labels: &[String]) -> Result<(), LabelError> {
        Ok(())
    }

    fn describe(&self, path: &Path, labels: &[String]) -> String {
        format!("labels {} for {} (labeling disabled)", labels.join(","), path.display())
    }
}
