//! Moving classified files into the destination tree.
//!
//! Given a [`Classification`], the executor creates the destination directory
//! (with all missing ancestors), moves the file there and, when the
//! classification carries labels, asks the [`LabelAssigner`] to attach them.
//! In dry-run mode the same paths are computed and returned as a [`MovePlan`]
//! without touching the filesystem.

use crate::classify::{Classification, Destination};
use crate::labels::{LabelAssigner, LabelError};
use crate::scan::CandidateFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Whether the executor touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Create directories, move files, assign labels.
    #[default]
    Live,
    /// Only report what would be done.
    DryRun,
}

/// Errors that leave a file where it was.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Failed to create the destination directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A file with the destination name is already there.
    #[error("Destination {} already exists", path.display())]
    DestinationExists { path: PathBuf },
    /// The rename itself failed (missing source, permissions, other device).
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The actions a matched file leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Directory the file is moved into.
    pub dest_dir: PathBuf,
    /// Full path of the file after the move.
    pub destination: PathBuf,
    pub labels: Vec<String>,
}

impl MovePlan {
    /// Computes the plan for `destination` below `dest_root`.
    pub fn new(dest_root: &Path, destination: &Destination) -> Self {
        let dest_dir = destination
            .subdir
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(dest_root.to_path_buf(), |dir, part| dir.join(part));
        Self {
            destination: dest_dir.join(&destination.file_name),
            dest_dir,
            labels: destination.labels.clone(),
        }
    }

    /// Human readable description of the plan, one action per line.
    pub fn report_lines(&self, source: &Path, labeler: &dyn LabelAssigner) -> Vec<String> {
        let mut lines = vec![
            format!("mkdir -p {}", self.dest_dir.display()),
            format!("mv {} {}", source.display(), self.destination.display()),
        ];
        if self.labels.is_empty() {
            lines.push("no labels added".to_string());
        } else {
            lines.push(labeler.describe(&self.destination, &self.labels));
        }
        lines
    }
}

/// What happened to the labels of a moved file.
#[derive(Debug)]
pub enum LabelStatus {
    /// The classification carried no labels.
    NotRequested,
    /// The labels were handed to the assigner.
    Requested,
    /// The assigner failed. The move stands.
    Failed(LabelError),
}

/// Result of executing one classification.
#[derive(Debug)]
pub enum MoveStatus {
    /// The file was moved.
    Moved(LabelStatus),
    /// Dry run: nothing was changed. Carries the report lines.
    Planned(Vec<String>),
    /// The file was not recognized.
    Skipped,
    /// The file was left in place.
    Failed(ExecuteError),
}

/// Per-file result.
#[derive(Debug)]
pub struct MoveOutcome {
    pub source: PathBuf,
    /// `None` for skipped files.
    pub destination: Option<PathBuf>,
    pub status: MoveStatus,
}

impl MoveOutcome {
    /// True when the file was moved or, in a dry run, would have been.
    pub fn is_success(&self) -> bool {
        matches!(self.status, MoveStatus::Moved(_) | MoveStatus::Planned(_))
    }
}

/// Carries out classifications against one destination root.
pub struct MoveExecutor<'a> {
    dest_root: PathBuf,
    mode: ExecutionMode,
    labeler: &'a dyn LabelAssigner,
}

impl<'a> MoveExecutor<'a> {
    pub fn new(
        dest_root: impl Into<PathBuf>,
        mode: ExecutionMode,
        labeler: &'a dyn LabelAssigner,
    ) -> Self {
        Self {
            dest_root: dest_root.into(),
            mode,
            labeler,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Lets the label assigner wait for outstanding requests.
    pub fn finish(&self) {
        self.labeler.finish();
    }

    /// Executes `classification` for `candidate`.
    ///
    /// Unrecognized files are skipped. Failures never panic or propagate; they
    /// are reported in the returned outcome and the file stays in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use renfiles::classify::ClassificationEngine;
    /// use renfiles::executor::{ExecutionMode, MoveExecutor};
    /// use renfiles::labels::NoLabels;
    /// use renfiles::scan::CandidateFile;
    ///
    /// let candidate = CandidateFile::new("/inbox", "NZZ_20230405.pdf");
    /// let classification = ClassificationEngine::default().classify(&candidate.name).unwrap();
    /// let executor = MoveExecutor::new("/archive", ExecutionMode::DryRun, &NoLabels);
    /// let outcome = executor.execute(&candidate, &classification);
    /// assert!(outcome.is_success());
    /// ```
    pub fn execute(&self, candidate: &CandidateFile, classification: &Classification) -> MoveOutcome {
        let source = candidate.path();
        let Classification::Matched(destination) = classification else {
            return MoveOutcome {
                source,
                destination: None,
                status: MoveStatus::Skipped,
            };
        };

        let plan = MovePlan::new(&self.dest_root, destination);
        let status = match self.mode {
            ExecutionMode::DryRun => {
                MoveStatus::Planned(plan.report_lines(&source, self.labeler))
            }
            ExecutionMode::Live => match Self::move_file(&source, &plan) {
                Ok(()) => MoveStatus::Moved(self.assign_labels(&plan)),
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "move failed");
                    MoveStatus::Failed(e)
                }
            },
        };

        MoveOutcome {
            source,
            destination: Some(plan.destination),
            status,
        }
    }

    fn move_file(source: &Path, plan: &MovePlan) -> Result<(), ExecuteError> {
        fs::create_dir_all(&plan.dest_dir).map_err(|e| ExecuteError::DirectoryCreationFailed {
            path: plan.dest_dir.clone(),
            source: e,
        })?;

        // rename would silently replace an existing file on unix
        if plan.destination.exists() {
            return Err(ExecuteError::DestinationExists {
                path: plan.destination.clone(),
            });
        }

        fs::rename(source, &plan.destination).map_err(|e| ExecuteError::FileMoveFailure {
            from: source.to_path_buf(),
            to: plan.destination.clone(),
            source: e,
        })?;
        debug!(from = %source.display(), to = %plan.destination.display(), "moved");
        Ok(())
    }

    fn assign_labels(&self, plan: &MovePlan) -> LabelStatus {
        if plan.labels.is_empty() {
            return LabelStatus::NotRequested;
        }
        match self.labeler.assign(&plan.destination, &plan.labels) {
            Ok(()) => LabelStatus::Requested,
            Err(e) => {
                warn!(path = %plan.destination.display(), error = %e, "labeling failed");
                LabelStatus::Failed(e)
            }
        }
    }
}
