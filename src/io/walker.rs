use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Collects the Python files a run should process.
///
/// Directories are walked recursively, honouring `.gitignore` and skipping
/// hidden entries. Other paths are taken as explicit files: they bypass the
/// include filter and are returned even when they do not exist, so the
/// caller can report them.
pub struct FileWalker {
    roots: Vec<PathBuf>,
    include_patterns: Vec<glob::Pattern>,
    exclude_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Only walked files matching one of `patterns` are kept. Without
    /// patterns, every `.py` file is.
    pub fn with_include_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.include_patterns = compile(patterns)?;
        Ok(self)
    }

    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude_patterns = compile(patterns)?;
        Ok(self)
    }

    /// Selected files, sorted and without duplicates. Entries that cannot
    /// be read are logged and skipped.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.roots {
            if root.is_dir() {
                self.walk_directory(root, &mut files);
            } else if !self.is_excluded(root) {
                files.push(root.clone());
            }
        }
        files.sort();
        files.dedup();
        files
    }

    fn walk_directory(&self, root: &Path, files: &mut Vec<PathBuf>) {
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .require_git(false)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_some_and(|t| t.is_file()) && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    fn should_process(&self, path: &Path) -> bool {
        let included = if self.include_patterns.is_empty() {
            path.extension().is_some_and(|ext| ext == "py")
        } else {
            self.include_patterns.iter().any(|p| matches(p, path))
        };
        included && !self.is_excluded(path)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_patterns.iter().any(|p| matches(p, path))
    }
}

/// A pattern matches either the whole path or the bare file name.
fn matches(pattern: &glob::Pattern, path: &Path) -> bool {
    pattern.matches_path(path)
        || path
            .file_name()
            .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
}

fn compile(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("invalid glob pattern '{p}'")))
        .collect()
}
