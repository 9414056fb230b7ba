use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_LINT_TARGET: &str = "src";
const DEFAULT_STYLE_GLOB: &str = "src/**/*.css";
const DEFAULT_PRE_COMMIT: &str = "npx --no-install jskit validate";

/// Per-project overrides read from `jskit.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lint: LintSettings,
    pub hooks: HookSettings,
    pub paths: PathSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintSettings {
    /// Default ESLint target when `jskit lint` gets no argument
    pub target: String,
    /// Default Stylelint glob when `jskit lint-styles` gets no argument
    pub styles: String,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            target: DEFAULT_LINT_TARGET.to_string(),
            styles: DEFAULT_STYLE_GLOB.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    pub enabled: bool,
    /// Command the git pre-commit hook runs
    pub pre_commit: String,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            pre_commit: DEFAULT_PRE_COMMIT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Root-level directories that count as a test directory
    pub test_dirs: Vec<String>,
    /// Root-level Cypress directory
    pub e2e_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            test_dirs: vec!["test".into(), "tests".into(), "__tests__".into()],
            e2e_dir: "cypress".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).map_err(|err| Error::io("failed to read", path, err))?;
        toml::from_str(&contents).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
    }
}
