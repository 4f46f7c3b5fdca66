//! Sort the members of Odoo model classes into a canonical order.
//!
//! The library entry point is [`sort_source`], which takes the text of a
//! Python file and returns it with the members of every class reordered.
//! Everything else in the file is preserved byte for byte.
//!
//! ```rust
//! use std::path::Path;
//! use osort::{sort_source, SortConfig};
//!
//! let source = "class Sale:\n    def action_confirm(self):\n        pass\n    _name = 'sale.order'\n";
//! let sorted = sort_source(source, Path::new("sale.py"), &SortConfig::default()).unwrap();
//! assert!(sorted.starts_with("class Sale:\n    _name = 'sale.order'\n"));
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod parser;
pub mod report;
pub mod sorting;

pub use crate::config::{load_config, OsortConfig, SortConfig, UnclassifiedPolicy};
pub use crate::errors::{ErrorCode, SortError};
pub use crate::report::{FileReport, FileStatus, Mode, Summary};
pub use crate::sorting::{sort_source, Category};
