use std::fmt;
use std::io;
use std::path::PathBuf;

/// A command spec could not be located by any resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not resolve command `{spec}` (searched NODE_PATH, the package store and node_modules)")]
pub struct ResolutionError {
    pub spec: String,
}

/// A spawned process failed to start or exited unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("empty command line")]
    Empty,

    #[error("could not start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` {}{}", describe_exit(.code), stderr_suffix(.stderr))]
    Exit {
        program: String,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl RunError {
    /// Exit code of the failed process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunError::Exit { code, .. } => *code,
            _ => None,
        }
    }

    /// Captured stderr, empty for spawn failures and inherited stdio.
    pub fn stderr(&self) -> &str {
        match self {
            RunError::Exit { stderr, .. } => stderr,
            _ => "",
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// One violated field constraint found while decoding a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted field path, `$` for the document itself.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A config file was malformed or failed schema validation.
///
/// Carries every violation found, not only the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} {}: {}", .origin.display(), join_violations(.violations))]
pub struct ParseError {
    pub kind: &'static str,
    pub origin: PathBuf,
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the library layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("no control file found under {} (run `jskit init` first)", .root.display())]
    ControlFileMissing { root: PathBuf },

    #[error("failed to install git hooks")]
    Hooks(#[from] git2::Error),

    #[error("invalid settings file {}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_lists_every_violation() {
        let err = ParseError {
            kind: "control file",
            origin: PathBuf::from("/p/control-file.json"),
            violations: vec![
                Violation::new("projectType", "expected one of \"module\", \"commonjs\""),
                Violation::new("hasTestDirectory", "missing required field"),
            ],
        };

        let message = err.to_string();
        assert!(message.contains("/p/control-file.json"));
        assert!(message.contains("projectType: expected one of"));
        assert!(message.contains("hasTestDirectory: missing required field"));
    }

    #[test]
    fn test_run_error_display() {
        let err = RunError::Exit {
            program: "tsc".to_string(),
            code: Some(2),
            stdout: String::new(),
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "`tsc` exited with code 2: boom");
        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.stderr(), "boom");

        let killed = RunError::Exit {
            program: "vite".to_string(),
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(killed.to_string(), "`vite` was terminated by a signal");
    }

    #[test]
    fn test_resolution_error_names_spec() {
        let err = ResolutionError {
            spec: "foo/bar".to_string(),
        };
        assert!(err.to_string().contains("`foo/bar`"));
    }
}
