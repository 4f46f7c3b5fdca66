//! The sort command: discover files, sort each one, report.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{load_config, LoadedConfig, SortConfig};
use crate::formatting::Palette;
use crate::io::{self, FileWalker};
use crate::observability::{
    increment_processed, set_current_file, set_phase, set_progress, SortPhase,
};
use crate::report::{unified_diff, Conformance, FileReport, FileStatus, Mode, Summary};
use crate::sorting::sort_source;

/// How files are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: Mode,
    pub show_diff: bool,
    /// Worker threads, 0 for one per core.
    pub jobs: usize,
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Fix,
            show_diff: false,
            jobs: 0,
            parallel: true,
        }
    }
}

/// Sort one file and describe the outcome. Never panics on bad input;
/// every failure ends up in [`FileStatus::Failed`].
pub fn sort_file(path: &Path, config: &SortConfig, options: &RunOptions) -> FileReport {
    let _file = set_current_file(path);
    let _span = tracing::debug_span!("sort_file", path = %path.display()).entered();
    let mut report = FileReport {
        path: path.to_path_buf(),
        status: FileStatus::Unchanged,
        diff: None,
    };

    match process_file(path, config, options) {
        Ok(None) => {}
        Ok(Some(diff)) => {
            report.status = FileStatus::Resorted;
            report.diff = diff;
        }
        Err(err) => {
            if err.is_internal() {
                tracing::error!(path = %path.display(), code = %err.code(), "{err}");
            } else {
                tracing::debug!(path = %path.display(), code = %err.code(), "{err}");
            }
            report.status = FileStatus::Failed(err);
        }
    }
    report
}

/// Read, sort and (in fix mode) write one file.
///
/// `Ok(None)` means the file already conforms; `Ok(Some(diff))` that it
/// needed sorting, with the diff when one was requested.
fn process_file(
    path: &Path,
    config: &SortConfig,
    options: &RunOptions,
) -> crate::errors::Result<Option<Option<String>>> {
    let bytes = {
        let _phase = set_phase(SortPhase::Reading);
        io::read_file(path)?
    };
    let source = io::decode_source(&bytes, path)?;
    let original: &str = &source.text;

    let sorted = {
        let _phase = set_phase(SortPhase::Sorting);
        sort_source(original, path, config)?
    };

    if Conformance::of(original, &sorted).conforms() {
        return Ok(None);
    }
    let diff = options
        .show_diff
        .then(|| unified_diff(path, original, &sorted));
    if options.mode == Mode::Fix {
        let _phase = set_phase(SortPhase::Writing);
        io::write_atomic(path, &source.encode(&sorted, path)?)?;
    }
    Ok(Some(diff))
}

/// Process `files`, returning one report per file in input order.
pub fn sort_files(files: &[PathBuf], config: &SortConfig, options: &RunOptions) -> Vec<FileReport> {
    set_progress(0, files.len());
    let process = |path: &PathBuf| {
        let report = sort_file(path, config, options);
        increment_processed();
        report
    };

    if !options.parallel {
        return files.iter().map(process).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()
    {
        Ok(pool) => pool.install(|| files.par_iter().map(process).collect()),
        Err(e) => {
            tracing::warn!("Failed to build thread pool ({e}), using the global pool");
            files.par_iter().map(process).collect()
        }
    }
}

/// Resolve configuration from the command line and the config file.
pub fn resolve_config(cli: &Cli, start_dir: &Path) -> Result<SortConfig> {
    let _phase = set_phase(SortPhase::ConfigLoading);
    let LoadedConfig {
        mut config, source, ..
    } = load_config(cli.config.as_deref(), start_dir).context("Failed to load configuration")?;
    tracing::info!(?source, "configuration loaded");

    if cli.alpha {
        config.sort_fields = true;
    }
    if let Some(unclassified) = cli.unclassified {
        config.unclassified = unclassified.into();
    }
    config.exclude.extend(cli.exclude.iter().cloned());
    Ok(config)
}

/// Run the command and return the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let palette = Palette::new(cli.color);
    let start_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = resolve_config(&cli, &start_dir)?;

    let options = RunOptions {
        mode: if cli.check { Mode::Check } else { Mode::Fix },
        show_diff: cli.diff,
        jobs: cli.jobs,
        parallel: !cli.no_parallel,
    };

    let files = {
        let _phase = set_phase(SortPhase::FileDiscovery);
        FileWalker::new(cli.paths.clone())
            .with_include_patterns(&cli.include)?
            .with_exclude_patterns(&config.exclude)?
            .walk()
    };
    tracing::info!("Sorting {} files", files.len());

    let reports = sort_files(&files, &config, &options);

    let _phase = set_phase(SortPhase::Reporting);
    let summary = Summary::from_reports(&reports);
    print_reports(&reports, options.mode, &palette)?;
    let exit_code = summary.exit_code(options.mode);
    let line = summary.render(options.mode);
    if exit_code == 0 {
        eprintln!("{}", palette.success(&line));
    } else {
        eprintln!("{}", palette.bold(&line));
    }
    Ok(exit_code)
}

fn print_reports(reports: &[FileReport], mode: Mode, palette: &Palette) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in reports {
        if let Some(message) = report.message(mode, palette) {
            eprintln!("{message}");
        }
        if let Some(diff) = &report.diff {
            out.write_all(palette.diff(diff).as_bytes())
                .context("Failed to write diff")?;
        }
    }
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    const UNSORTED: &str = indoc! {"
        class Sale:
            def action_confirm(self):
                return True
            _name = 'sale.order'
    "};

    #[test]
    fn test_check_mode_does_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sale.py");
        fs::write(&path, UNSORTED).unwrap();

        let options = RunOptions {
            mode: Mode::Check,
            show_diff: true,
            ..RunOptions::default()
        };
        let report = sort_file(&path, &SortConfig::default(), &options);

        assert!(matches!(report.status, FileStatus::Resorted));
        assert!(report.diff.unwrap().contains("+    _name = 'sale.order'"));
        assert_eq!(fs::read_to_string(&path).unwrap(), UNSORTED);
    }

    #[test]
    fn test_fix_mode_rewrites_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sale.py");
        fs::write(&path, UNSORTED).unwrap();

        let report = sort_file(&path, &SortConfig::default(), &RunOptions::default());

        assert!(matches!(report.status, FileStatus::Resorted));
        assert!(report.diff.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("class Sale:\n    _name = 'sale.order'\n"));

        let again = sort_file(&path, &SortConfig::default(), &RunOptions::default());
        assert!(matches!(again.status, FileStatus::Unchanged));
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.py");
        let good = temp.path().join("good.py");
        let missing = temp.path().join("missing.py");
        let latin1 = temp.path().join("latin1.py");
        fs::write(&broken, "class A(:\n    pass\n").unwrap();
        fs::write(&good, UNSORTED).unwrap();
        fs::write(&latin1, b"x = '\xe9'\n").unwrap();

        let files = vec![broken, good, missing, latin1];
        let reports = sort_files(&files, &SortConfig::default(), &RunOptions::default());

        assert_eq!(reports.len(), 4);
        assert!(matches!(reports[0].status, FileStatus::Failed(crate::errors::SortError::Parse { .. })));
        assert!(matches!(reports[1].status, FileStatus::Resorted));
        assert!(matches!(reports[2].status, FileStatus::Failed(crate::errors::SortError::Io { .. })));
        assert!(matches!(reports[3].status, FileStatus::Failed(crate::errors::SortError::Decoding { .. })));

        let summary = Summary::from_reports(&reports);
        assert_eq!(summary.unsortable, 3);
        assert_eq!(summary.exit_code(Mode::Fix), 1);
    }

    #[test]
    fn test_declared_encoding_is_kept_when_rewriting() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("legacy.py");
        fs::write(
            &path,
            b"# -*- coding: latin-1 -*-\nclass A:\n    def f(self):\n        return '\xe9'\n    _x = 1\n",
        )
        .unwrap();

        let report = sort_file(&path, &SortConfig::default(), &RunOptions::default());

        assert!(matches!(report.status, FileStatus::Resorted));
        assert_eq!(
            fs::read(&path).unwrap(),
            b"# -*- coding: latin-1 -*-\nclass A:\n    _x = 1\n\n\n    def f(self):\n        return '\xe9'\n"
        );
    }

    #[test]
    fn test_unknown_encoding_is_unsortable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("odd.py");
        let contents = "# coding=invalid-encoding\nclass A:\n    def f(self):\n        pass\n    _x = 1\n";
        fs::write(&path, contents).unwrap();

        let report = sort_file(&path, &SortConfig::default(), &RunOptions::default());

        let FileStatus::Failed(err) = &report.status else {
            panic!("expected a failure, got {:?}", report.status);
        };
        assert_eq!(
            err.to_string(),
            format!("unknown encoding, 'invalid-encoding', in {}", path.display())
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let temp = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..6)
            .map(|i| {
                let path = temp.path().join(format!("m{i}.py"));
                let text = if i % 2 == 0 { UNSORTED } else { "x = 1\n" };
                fs::write(&path, text).unwrap();
                path
            })
            .collect();
        let check = RunOptions {
            mode: Mode::Check,
            ..RunOptions::default()
        };
        let sequential = RunOptions {
            parallel: false,
            ..check
        };

        let a: Vec<String> = sort_files(&files, &SortConfig::default(), &check)
            .iter()
            .map(|r| format!("{}:{:?}", r.path.display(), matches!(r.status, FileStatus::Resorted)))
            .collect();
        let b: Vec<String> = sort_files(&files, &SortConfig::default(), &sequential)
            .iter()
            .map(|r| format!("{}:{:?}", r.path.display(), matches!(r.status, FileStatus::Resorted)))
            .collect();
        assert_eq!(a, b);
    }
}
