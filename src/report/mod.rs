//! Per-file outcomes and the end-of-run summary.

pub mod diff;

pub use diff::{unified_diff, Conformance};

use std::path::PathBuf;

use crate::errors::SortError;
use crate::formatting::Palette;

/// What a run does with non-conforming files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report only, never write.
    Check,
    /// Rewrite files in place.
    Fix,
}

/// Outcome of processing one file.
#[derive(Debug)]
pub enum FileStatus {
    Unchanged,
    /// Needs sorting; in fix mode the file has been rewritten.
    Resorted,
    Failed(SortError),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Unified diff, filled when requested and the file is not conforming.
    pub diff: Option<String>,
}

impl FileReport {
    /// Message written to stderr for this file, if any.
    pub fn message(&self, mode: Mode, palette: &Palette) -> Option<String> {
        let error = palette.error("ERROR:");
        match (&self.status, mode) {
            (FileStatus::Unchanged, _) => None,
            (FileStatus::Resorted, Mode::Check) => Some(format!(
                "{error} {} is incorrectly sorted",
                self.path.display()
            )),
            (FileStatus::Resorted, Mode::Fix) => Some(format!("Sorting {}", self.path.display())),
            (FileStatus::Failed(err), _) => Some(format!("{error} {err}")),
        }
    }
}

/// Counts of file outcomes for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub resorted: usize,
    pub unchanged: usize,
    pub unsortable: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            match report.status {
                FileStatus::Unchanged => summary.unchanged += 1,
                FileStatus::Resorted => summary.resorted += 1,
                FileStatus::Failed(_) => summary.unsortable += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.resorted + self.unchanged + self.unsortable
    }

    /// One-line summary in the wording of `mode`.
    pub fn render(&self, mode: Mode) -> String {
        if self.total() == 0 {
            return "No files are present to be sorted. Nothing to do.".to_string();
        }

        let (resorted, unchanged, unsortable) = match mode {
            Mode::Check => ("would be resorted", "would be left unchanged", "would not be sortable"),
            Mode::Fix => ("resorted", "left unchanged", "not sortable"),
        };
        [
            (self.resorted, resorted),
            (self.unchanged, unchanged),
            (self.unsortable, unsortable),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, phrase)| format!("{} {}", count_files(count, mode), phrase))
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Process exit code for this summary.
    ///
    /// Check mode fails on any file that needs sorting or could not be
    /// sorted; fix mode only on files that could not be sorted.
    pub fn exit_code(&self, mode: Mode) -> i32 {
        let failed = match mode {
            Mode::Check => self.resorted > 0 || self.unsortable > 0,
            Mode::Fix => self.unsortable > 0,
        };
        i32::from(failed)
    }
}

fn count_files(count: usize, mode: Mode) -> String {
    match (mode, count) {
        (Mode::Check, 1) => "1 file".to_string(),
        (Mode::Check, n) => format!("{n} files"),
        (Mode::Fix, 1) => "1 file was".to_string(),
        (Mode::Fix, n) => format!("{n} files were"),
    }
}
