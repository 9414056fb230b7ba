// Public API
pub mod cli;
pub mod commands;

// Core domain types
pub mod codec;
pub mod control_file;
pub mod error;
pub mod hooks;
pub mod init;
pub mod manifest;
pub mod plugins;
pub mod probe;
pub mod project;
pub mod resolver;
pub mod runner;
pub mod settings;
pub mod stylelint;
pub mod tsconfig;
pub mod writers;

mod ui;

// Re-export main types
pub use control_file::{ControlFile, EslintPlugins};
pub use error::{Error, ParseError, ResolutionError, Result, RunError};
pub use manifest::{PackageManifest, ProjectType};
pub use probe::{DiskProbe, MemoryProbe, Probe};
pub use project::{Project, ProjectPath};
pub use resolver::{resolve, CommandSpec, ResolvedCommand, SearchContext};
pub use settings::Settings;
