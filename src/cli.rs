use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::UnclassifiedPolicy;
use crate::formatting::ColorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum UnclassifiedArg {
    /// Sort unrecognised statements after everything else
    Last,
    /// Leave unrecognised statements where they are
    Keep,
}

impl From<UnclassifiedArg> for UnclassifiedPolicy {
    fn from(arg: UnclassifiedArg) -> Self {
        match arg {
            UnclassifiedArg::Last => UnclassifiedPolicy::Last,
            UnclassifiedArg::Keep => UnclassifiedPolicy::Keep,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "osort")]
#[command(about = "Sort Odoo model class members into canonical order", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Files or directories to sort
    pub paths: Vec<PathBuf>,

    /// Check the files for unsorted members. Exits 1 if anything would
    /// change, without writing
    #[arg(long)]
    pub check: bool,

    /// Print a unified diff of the changes to stdout
    #[arg(long)]
    pub diff: bool,

    /// Sort field declarations alphabetically
    #[arg(long)]
    pub alpha: bool,

    /// Configuration file (defaults to the nearest .osort.toml or pyproject.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only walk files matching this glob (repeatable; default *.py)
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip files matching this glob (repeatable, added to the config list)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Placement of statements no rule recognises
    #[arg(long, value_enum)]
    pub unclassified: Option<UnclassifiedArg>,

    /// Number of worker threads (0 = all cores)
    #[arg(short = 'j', long, default_value_t = 0, env = "OSORT_JOBS")]
    pub jobs: usize,

    /// Process files one at a time
    #[arg(long)]
    pub no_parallel: bool,

    /// When to color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// More diagnostics (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors in diagnostics
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "osort",
            "--check",
            "--diff",
            "--unclassified",
            "keep",
            "--exclude",
            "**/migrations/**",
            "-j",
            "4",
            "-vv",
            "addons",
            "models/sale.py",
        ])
        .unwrap();
        assert!(cli.check);
        assert!(cli.diff);
        assert_eq!(cli.unclassified, Some(UnclassifiedArg::Keep));
        assert_eq!(cli.exclude, vec!["**/migrations/**"]);
        assert_eq!(cli.jobs, 4);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.paths,
            vec![PathBuf::from("addons"), PathBuf::from("models/sale.py")]
        );
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["osort", "-q", "-v"]).is_err());
    }
}
