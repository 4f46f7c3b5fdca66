//! Per-thread record of what the sorter is doing, for crash reports.
//!
//! Each rayon worker keeps its own [`SortContext`] in thread-local storage.
//! Run-wide progress lives in atomic counters. Guards restore the previous
//! context when dropped, so file and class scopes nest.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<SortContext> = const { RefCell::new(SortContext::new()) };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortContext {
    pub phase: Option<SortPhase>,
    pub current_file: Option<PathBuf>,
    pub current_class: Option<String>,
}

impl SortContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_class: None,
        }
    }
}

/// Stage of the pipeline a thread is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPhase {
    ConfigLoading,
    FileDiscovery,
    Reading,
    Parsing,
    Sorting,
    Writing,
    Reporting,
}

impl std::fmt::Display for SortPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ConfigLoading => "config_loading",
            Self::FileDiscovery => "file_discovery",
            Self::Reading => "reading",
            Self::Parsing => "parsing",
            Self::Sorting => "sorting",
            Self::Writing => "writing",
            Self::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// Restores the previous context on drop.
pub struct ContextGuard {
    previous: SortContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(change: impl FnOnce(&mut SortContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        change(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: SortPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

#[must_use]
pub fn set_current_class(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_class = Some(name))
}

pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> SortContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) files of the current run.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}
