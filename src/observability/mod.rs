//! Crash reports and diagnostics.
//!
//! - **Panic hook**: prints a crash report naming the phase, file and class
//!   a thread was working on.
//! - **Context tracking**: thread-local phase/file/class, atomic progress.
//! - **Tracing**: `tracing-subscriber` setup for the binary.
//!
//! ```ignore
//! use osort::observability::{set_current_file, set_phase, SortPhase};
//!
//! let _phase = set_phase(SortPhase::Sorting);
//! let _file = set_current_file(&path);
//! // a panic here is reported with the phase and file
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_class, set_current_file,
    set_phase, set_progress, ContextGuard, SortContext, SortPhase,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::init_tracing;
