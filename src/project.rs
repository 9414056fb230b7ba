use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Package name jskit is published under; its own directory inside
/// `node_modules` holds the nested control file.
pub const PACKAGE_NAME: &str = "jskit";

/// Well-known locations inside a consumer project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// Project root
    Root,
    /// `package.json`
    Manifest,
    /// `jskit.toml`
    Settings,
    /// `control-file.json` at the project root
    ControlFile,
    /// `node_modules/jskit/control-file.json`
    NestedControlFile,
    /// `src/`
    Sources,
    TsConfig,
    ViteConfig,
    StylelintConfig,
    EslintConfig,
}

/// A consumer project jskit manages, rooted at the directory holding
/// `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project at `dir`, or at the current directory when `dir` is `None`.
    /// The root is always absolute.
    pub fn locate(dir: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read the current directory")?;
        let root = match dir {
            Some(dir) => cwd.join(dir),
            None => cwd,
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get path for a specific project location
    pub fn path(&self, path_type: ProjectPath) -> PathBuf {
        match path_type {
            ProjectPath::Root => self.root.clone(),
            ProjectPath::Manifest => self.root.join("package.json"),
            ProjectPath::Settings => self.root.join("jskit.toml"),
            ProjectPath::ControlFile => self.root.join("control-file.json"),
            ProjectPath::NestedControlFile => self
                .root
                .join("node_modules")
                .join(PACKAGE_NAME)
                .join("control-file.json"),
            ProjectPath::Sources => self.root.join("src"),
            ProjectPath::TsConfig => self.root.join("tsconfig.json"),
            ProjectPath::ViteConfig => self.root.join("vite.config.ts"),
            ProjectPath::StylelintConfig => self.root.join(".stylelintrc.json"),
            ProjectPath::EslintConfig => self.root.join("eslint.config.mjs"),
        }
    }

    /// Root-relative sibling path for a file name.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
