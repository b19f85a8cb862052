//! Running classification and execution over a list of candidates.
//!
//! Every candidate is handled on its own: a file that cannot be classified or
//! moved is reported and counted, and the batch carries on with the next one.

use crate::classify::{Classification, ClassificationEngine, ClassifyError};
use crate::executor::{ExecutionMode, LabelStatus, MoveExecutor, MoveOutcome, MoveStatus};
use crate::output::OutputFormatter;
use crate::scan::CandidateFile;
use std::fs;
use tracing::warn;

/// Mode and verbosity of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: ExecutionMode,
    /// Report unrecognized names and other intermediate decisions.
    pub verbose: bool,
}

/// Counts of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files moved, or in a dry run, files that would have been moved.
    pub processed: usize,
    /// Unrecognized names and directories.
    pub skipped: usize,
    /// Files left in place because of an error.
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Adds one file report to the counts.
    pub fn record(&mut self, report: &FileReport) {
        match report {
            FileReport::Directory(_) => self.skipped += 1,
            FileReport::Unclassifiable { .. } => self.failed += 1,
            FileReport::Executed { outcome, .. } => match outcome.status {
                MoveStatus::Moved(_) | MoveStatus::Planned(_) => self.processed += 1,
                MoveStatus::Skipped => self.skipped += 1,
                MoveStatus::Failed(_) => self.failed += 1,
            },
        }
    }
}

/// What happened to one candidate.
#[derive(Debug)]
pub enum FileReport {
    /// The candidate is a directory and was ignored.
    Directory(CandidateFile),
    /// A rule matched but could not derive a destination.
    Unclassifiable {
        candidate: CandidateFile,
        error: ClassifyError,
    },
    /// The classification was executed (or skipped when unrecognized).
    Executed {
        candidate: CandidateFile,
        classification: Classification,
        outcome: MoveOutcome,
    },
}

/// Classifies and executes candidates one after another.
pub struct BatchRunner<'a> {
    engine: ClassificationEngine,
    executor: MoveExecutor<'a>,
    options: RunOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(engine: ClassificationEngine, executor: MoveExecutor<'a>, verbose: bool) -> Self {
        let options = RunOptions {
            mode: executor.mode(),
            verbose,
        };
        Self {
            engine,
            executor,
            options,
        }
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Handles a single candidate.
    pub fn process(&self, candidate: &CandidateFile) -> FileReport {
        // the listing should only contain files, but it may be stale
        if fs::metadata(candidate.path()).is_ok_and(|meta| meta.is_dir()) {
            return FileReport::Directory(candidate.clone());
        }

        match self.engine.classify(&candidate.name) {
            Ok(classification) => {
                let outcome = self.executor.execute(candidate, &classification);
                FileReport::Executed {
                    candidate: candidate.clone(),
                    classification,
                    outcome,
                }
            }
            Err(error) => {
                warn!(name = %candidate.name, %error, "classification failed");
                FileReport::Unclassifiable {
                    candidate: candidate.clone(),
                    error,
                }
            }
        }
    }

    /// Lazily processes `candidates` in order. Nothing happens until the
    /// iterator is advanced; stopping early leaves the rest untouched.
    pub fn iter<'s>(
        &'s self,
        candidates: &'s [CandidateFile],
    ) -> impl Iterator<Item = FileReport> + 's {
        candidates.iter().map(|candidate| self.process(candidate))
    }

    /// Processes every candidate, reporting each one, and returns the counts.
    pub fn run(&self, candidates: &[CandidateFile]) -> Summary {
        let progress = match self.options.mode {
            ExecutionMode::Live => Some(OutputFormatter::create_progress_bar(
                candidates.len() as u64,
            )),
            ExecutionMode::DryRun => None,
        };

        let mut summary = Summary::default();
        for report in self.iter(candidates) {
            match &progress {
                Some(pb) => {
                    pb.suspend(|| self.report(&report));
                    pb.inc(1);
                }
                None => self.report(&report),
            }
            summary.record(&report);
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        self.executor.finish();
        summary
    }

    /// Prints the user-facing lines for one report.
    pub fn report(&self, report: &FileReport) {
        let verbose = self.options.verbose;
        match report {
            FileReport::Directory(candidate) => {
                if verbose {
                    OutputFormatter::info(&format!("ignoring directory {}", candidate.name));
                }
            }
            FileReport::Unclassifiable { candidate, error } => {
                OutputFormatter::error(&format!("{}: {}", candidate.name, error));
            }
            FileReport::Executed {
                candidate,
                classification,
                outcome,
            } => {
                if verbose && let Some(dest) = classification.destination() {
                    OutputFormatter::info(&format!(
                        "{} -> {}/{} [{}]",
                        candidate.name,
                        dest.subdir,
                        dest.file_name,
                        dest.labels.join(",")
                    ));
                }
                self.report_outcome(candidate, outcome);
            }
        }
    }

    fn report_outcome(&self, candidate: &CandidateFile, outcome: &MoveOutcome) {
        match &outcome.status {
            MoveStatus::Skipped => {
                if self.options.verbose {
                    OutputFormatter::info(&format!("unrecognized: {}", candidate.name));
                }
            }
            MoveStatus::Planned(lines) => {
                for line in lines {
                    OutputFormatter::dry_run_notice(line);
                }
            }
            MoveStatus::Moved(label_status) => {
                let destination = outcome
                    .destination
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                OutputFormatter::success(&format!("{} -> {}", candidate.name, destination));
                if let LabelStatus::Failed(e) = label_status {
                    OutputFormatter::warning(&format!("labels not assigned: {}", e));
                }
            }
            MoveStatus::Failed(e) => {
                OutputFormatter::error(&format!("conversion of {} failed: {}", candidate.name, e));
            }
        }
    }
}
