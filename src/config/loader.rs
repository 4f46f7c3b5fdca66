use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{OsortConfig, PyProject};
use super::SortConfig;
use crate::errors::{Result, SortError};

/// Dedicated configuration file name.
pub const CONFIG_FILE_NAME: &str = ".osort.toml";

/// Shared project file carrying a `[tool.osort]` table.
pub const PYPROJECT_FILE_NAME: &str = "pyproject.toml";

/// Directories searched upward from the start directory.
pub const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`
    Explicit(PathBuf),
    /// Found `.osort.toml`
    Discovered(PathBuf),
    /// Found `[tool.osort]` in a `pyproject.toml`
    PyProject(PathBuf),
    Defaults,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SortConfig,
    pub source: ConfigSource,
}

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a `.osort.toml` document and validate it.
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<OsortConfig, String> {
    let config = toml::from_str::<OsortConfig>(contents).map_err(|e| e.message().to_string())?;
    config.resolve().map_err(|e| match e {
        SortError::Config { message, .. } => message,
        other => other.to_string(),
    })?;
    Ok(config)
}

/// `[tool.osort]` of a `pyproject.toml` document, if the table exists.
fn parse_pyproject(contents: &str) -> std::result::Result<Option<OsortConfig>, String> {
    let project = toml::from_str::<PyProject>(contents).map_err(|e| e.message().to_string())?;
    Ok(project.tool.and_then(|tool| tool.osort))
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn load_file(path: &Path) -> Result<OsortConfig> {
    let contents = read_config_file(path)
        .map_err(|e| SortError::config_in(format!("cannot read config: {e}"), path))?;
    parse_and_validate_config(&contents).map_err(|message| SortError::config_in(message, path))
}

fn load_pyproject(path: &Path) -> Result<Option<OsortConfig>> {
    let contents = read_config_file(path)
        .map_err(|e| SortError::config_in(format!("cannot read config: {e}"), path))?;
    let Some(config) = parse_pyproject(&contents).map_err(|m| SortError::config_in(m, path))?
    else {
        return Ok(None);
    };
    config.resolve().map_err(|e| match e {
        SortError::Config { message, .. } => SortError::config_in(message, path),
        other => other,
    })?;
    Ok(Some(config))
}

/// Locate and load the configuration for a run.
///
/// `explicit` wins when given. Otherwise the nearest `.osort.toml` above
/// `start_dir` is used, then the nearest `pyproject.toml` with a
/// `[tool.osort]` table, then the built-in defaults. Any configuration
/// that exists but is invalid is an error; it is never silently ignored.
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> Result<LoadedConfig> {
    let (file, source) = match explicit {
        Some(path) => (load_file(path)?, ConfigSource::Explicit(path.to_path_buf())),
        None => discover(start_dir)?,
    };

    match &source {
        ConfigSource::Defaults => tracing::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        ),
        ConfigSource::Explicit(path)
        | ConfigSource::Discovered(path)
        | ConfigSource::PyProject(path) => {
            tracing::debug!("Loaded config from {}", path.display())
        }
    }

    let config = file.resolve()?;
    Ok(LoadedConfig {
        config,
        source,
    })
}

fn discover(start_dir: &Path) -> Result<(OsortConfig, ConfigSource)> {
    let dedicated = directory_ancestors(start_dir.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());
    if let Some(path) = dedicated {
        return Ok((load_file(&path)?, ConfigSource::Discovered(path)));
    }

    let pyprojects = directory_ancestors(start_dir.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(PYPROJECT_FILE_NAME))
        .filter(|path| path.is_file());
    for path in pyprojects {
        if let Some(config) = load_pyproject(&path)? {
            return Ok((config, ConfigSource::PyProject(path)));
        }
    }

    Ok((OsortConfig::default(), ConfigSource::Defaults))
}
