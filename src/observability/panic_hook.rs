//! Crash reports for panics.
//!
//! A panic inside a rayon worker would otherwise only print a message and a
//! source location. The report adds the phase, file and class the worker
//! was handling, plus run progress, so the offending input can be found.

use super::context::{get_current_context, get_progress, SortContext};
use std::fmt::Write as _;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str =
    "================================================================================";

/// Install the crash report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        let report = format_crash_report(
            &extract_panic_message(info),
            location.as_deref(),
            &get_current_context(),
            get_progress(),
        );
        eprintln!();
        eprint!("{report}");
        if std::env::var("RUST_BACKTRACE").is_ok() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        }
    }));
}

/// Render the crash report text.
pub fn format_crash_report(
    message: &str,
    location: Option<&str>,
    context: &SortContext,
    (processed, total): (usize, usize),
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "OSORT CRASH REPORT (osort {VERSION}, {})", std::env::consts::OS);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "panic:    {}", truncate(message, 200));
    if let Some(location) = location {
        let _ = writeln!(out, "location: {location}");
    }

    match &context.phase {
        Some(phase) => {
            let _ = writeln!(out, "phase:    {phase}");
        }
        None => {
            let _ = writeln!(out, "phase:    (not set, crash before sorting started)");
        }
    }
    if let Some(file) = &context.current_file {
        let _ = writeln!(out, "file:     {}", file.display());
    }
    if let Some(class) = &context.current_class {
        let _ = writeln!(out, "class:    {class}");
    }
    if total > 0 {
        let _ = writeln!(out, "progress: {processed} / {total} files");
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(out, "Run with RUST_BACKTRACE=1 for a stack trace.");
    }
    if let Some(file) = &context.current_file {
        let _ = writeln!(
            out,
            "Please include this report and {} when filing an issue.",
            file.display()
        );
    }
    let _ = writeln!(out, "{RULE}");
    out
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::SortPhase;
    use std::path::PathBuf;

    #[test]
    fn test_report_names_file_and_class() {
        let context = SortContext {
            phase: Some(SortPhase::Sorting),
            current_file: Some(PathBuf::from("addons/sale/models/sale.py")),
            current_class: Some("SaleOrder".to_string()),
        };
        let report = format_crash_report("index out of bounds", Some("src/x.rs:1:2"), &context, (3, 9));

        assert!(report.contains("panic:    index out of bounds"));
        assert!(report.contains("location: src/x.rs:1:2"));
        assert!(report.contains("phase:    sorting"));
        assert!(report.contains("file:     addons/sale/models/sale.py"));
        assert!(report.contains("class:    SaleOrder"));
        assert!(report.contains("progress: 3 / 9 files"));
    }

    #[test]
    fn test_report_without_context() {
        let report = format_crash_report("boom", None, &SortContext::new(), (0, 0));
        assert!(report.contains("crash before sorting started"));
        assert!(!report.contains("progress:"));
        assert!(!report.contains("location:"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let result = truncate("ééééééééééé", 6);
        assert_eq!(result, "ééé...");
    }
}
