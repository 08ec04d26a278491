//! Program file resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variable → working directory.

use std::path::{Path, PathBuf};

use crate::validate::{ValidationError, ValidationResult};

/// A discovered program file.
#[derive(Debug, Clone, Default)]
pub struct ProgramPath {
    /// Path to the program file (or None if not found).
    pub path: Option<PathBuf>,

    /// Where the path came from (for diagnostics).
    pub source: ConfigSource,
}

impl ProgramPath {
    /// Directory that relative sample-file paths resolve against.
    pub fn working_dir(&self) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
            _ => Some(PathBuf::from(".")),
        }
    }
}

/// Where a program file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in the working directory under a standard name.
    WorkingDirectory,

    /// Nothing found.
    #[default]
    NotFound,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::WorkingDirectory => write!(f, "working directory"),
            ConfigSource::NotFound => write!(f, "not found"),
        }
    }
}

/// Environment variable naming the program file.
pub const ENV_PROGRAM_PATH: &str = "LDAR_PROGRAM";

/// Standard program file names, in lookup order.
const PROGRAM_FILENAMES: [&str; 3] = ["program.yaml", "program.yml", "program.json"];

/// Resolve the program file path.
///
/// Resolution order:
/// 1. Explicit CLI path
/// 2. `LDAR_PROGRAM` environment variable (if it exists)
/// 3. `program.yaml`, `program.yml` or `program.json` in `cwd`
///
/// An explicit CLI path that does not exist is an error; it never falls
/// through to the later sources.
pub fn resolve_program(cli_path: Option<&Path>, cwd: &Path) -> ValidationResult<ProgramPath> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "{} does not exist",
                path.display()
            )));
        }
        return Ok(ProgramPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        });
    }

    if let Ok(env_path) = std::env::var(ENV_PROGRAM_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(ProgramPath {
                path: Some(path),
                source: ConfigSource::Environment,
            });
        }
    }

    for name in PROGRAM_FILENAMES {
        let path = cwd.join(name);
        if path.is_file() {
            return Ok(ProgramPath {
                path: Some(path),
                source: ConfigSource::WorkingDirectory,
            });
        }
    }

    Ok(ProgramPath::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(
            format!("{}", ConfigSource::WorkingDirectory),
            "working directory"
        );
        assert_eq!(format!("{}", ConfigSource::NotFound), "not found");
    }

    #[test]
    fn working_dir_of_bare_file_is_current_dir() {
        let p = ProgramPath {
            path: Some(PathBuf::from("program.yaml")),
            source: ConfigSource::CliArgument,
        };
        assert_eq!(p.working_dir(), Some(PathBuf::from(".")));

        let nested = ProgramPath {
            path: Some(PathBuf::from("inputs/program.yaml")),
            source: ConfigSource::CliArgument,
        };
        assert_eq!(nested.working_dir(), Some(PathBuf::from("inputs")));
        assert_eq!(ProgramPath::default().working_dir(), None);
    }
}
