//! `jskit init`: configure a consumer project in one linear pass.
//!
//! Stages run in a fixed order and each one either advances or stops the
//! pipeline. The control file is written last, so its presence means every
//! earlier stage succeeded.

use crate::control_file::{self, ControlFile, EslintPlugins};
use crate::error::Error;
use crate::hooks::{self, HookOutcome};
use crate::manifest::PackageManifest;
use crate::plugins;
use crate::project::{Project, ProjectPath, PACKAGE_NAME};
use crate::settings::{PathSettings, Settings};
use crate::writers::{self, FileChange};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const NESTED_TEST_DIR: &str = "__tests__";

/// Lifecycle events npm runs while installing a package. Any other event is
/// a user-invoked `npm run <script>`.
const INSTALL_EVENTS: &[&str] = &["preinstall", "install", "postinstall", "prepare"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ManifestParsed,
    ViteConfigured,
    TypeScriptConfigured,
    PluginsDetected,
    StylelintConfigured,
    GitHooksConfigured,
    EslintFilesWritten,
    ControlFileWritten,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::ManifestParsed => "manifest parsed",
            Stage::ViteConfigured => "vite configured",
            Stage::TypeScriptConfigured => "typescript configured",
            Stage::PluginsDetected => "plugins detected",
            Stage::StylelintConfigured => "stylelint configured",
            Stage::GitHooksConfigured => "git hooks configured",
            Stage::EslintFilesWritten => "eslint files written",
            Stage::ControlFileWritten => "control file written",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment npm sets while running a package's install scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSignal {
    /// `npm_lifecycle_event`
    pub lifecycle_event: Option<String>,
    /// `INIT_CWD`: the directory `npm install` was started from
    pub init_cwd: Option<PathBuf>,
}

impl InstallSignal {
    pub fn from_env() -> Self {
        Self {
            lifecycle_event: env::var("npm_lifecycle_event")
                .ok()
                .filter(|event| !event.is_empty()),
            init_cwd: env::var_os("INIT_CWD").map(PathBuf::from),
        }
    }

    pub fn is_install_script(&self) -> bool {
        self.lifecycle_event
            .as_deref()
            .is_some_and(|event| INSTALL_EVENTS.contains(&event))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Completed(ControlFile),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub root: PathBuf,
    pub stages: Vec<Stage>,
    pub changes: Vec<FileChange>,
    pub hooks: Option<HookOutcome>,
    pub outcome: InitOutcome,
}

/// A stage failed; `stages` ends with [`Stage::Failed`].
#[derive(Debug, thiserror::Error)]
#[error("initialization stopped after stage `{}`", last_reached(.stages))]
pub struct InitFailure {
    pub stages: Vec<Stage>,
    /// Files already written before the failure
    pub changes: Vec<FileChange>,
    #[source]
    pub source: Error,
}

fn last_reached(stages: &[Stage]) -> Stage {
    stages
        .iter()
        .rev()
        .copied()
        .find(|stage| *stage != Stage::Failed)
        .unwrap_or(Stage::Start)
}

/// Pick the project root, or the reason to do nothing at all.
pub fn project_root(cwd: &Path, signal: &InstallSignal) -> Result<PathBuf, String> {
    let root = if signal.is_install_script() {
        signal.init_cwd.clone().unwrap_or_default()
    } else {
        cwd.to_path_buf()
    };

    if root.as_os_str().is_empty() {
        return Err("working directory is empty".to_string());
    }

    if signal.is_install_script() {
        let expected = root.join("node_modules").join(PACKAGE_NAME);
        if !same_dir(cwd, &expected) {
            return Err(format!(
                "{PACKAGE_NAME} is being installed as a dependency of another package"
            ));
        }
    }

    Ok(root)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether the project keeps tests in a dedicated directory.
pub fn has_test_directory(project: &Project, paths: &PathSettings) -> bool {
    if paths
        .test_dirs
        .iter()
        .any(|dir| project.file(dir).is_dir())
    {
        return true;
    }

    WalkDir::new(project.path(ProjectPath::Sources))
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_type().is_dir() && entry.file_name() == NESTED_TEST_DIR)
}

pub fn has_cypress_directory(project: &Project, paths: &PathSettings) -> bool {
    project.file(&paths.e2e_dir).is_dir()
}

struct Pipeline {
    project: Project,
    settings: Settings,
    stages: Vec<Stage>,
    changes: Vec<FileChange>,
    hooks: Option<HookOutcome>,
}

impl Pipeline {
    fn reach(&mut self, stage: Stage) {
        tracing::debug!("init: {}", stage);
        self.stages.push(stage);
    }

    fn record(&mut self, changes: Vec<FileChange>) {
        for change in &changes {
            tracing::debug!("{}", change);
        }
        self.changes.extend(changes);
    }

    fn run(&mut self) -> crate::error::Result<ControlFile> {
        let manifest = PackageManifest::load(&self.project.path(ProjectPath::Manifest))?;
        let project_type = manifest.project_type();
        self.reach(Stage::ManifestParsed);

        let changes = writers::vite::write(&self.project, &manifest)?;
        self.record(changes);
        self.reach(Stage::ViteConfigured);

        let changes = writers::typescript::write(&self.project, project_type, &manifest)?;
        self.record(changes);
        self.reach(Stage::TypeScriptConfigured);

        let eslint_plugins: EslintPlugins = plugins::detect(&manifest);
        self.reach(Stage::PluginsDetected);

        let changes = writers::stylelint::write(&self.project)?;
        self.record(changes);
        self.reach(Stage::StylelintConfigured);

        let hooks = hooks::install(self.project.root(), &self.settings.hooks)?;
        if let HookOutcome::Skipped(reason) = &hooks {
            tracing::debug!("Skipped git hooks: {}", reason);
        }
        self.hooks = Some(hooks);
        self.reach(Stage::GitHooksConfigured);

        let changes = writers::eslint::write(&self.project, &eslint_plugins)?;
        self.record(changes);
        self.reach(Stage::EslintFilesWritten);

        let control = ControlFile {
            working_directory_path: self.project.root().to_path_buf(),
            project_type,
            eslint_plugins,
            has_test_directory: has_test_directory(&self.project, &self.settings.paths),
            has_cypress_directory: has_cypress_directory(&self.project, &self.settings.paths),
        };
        control_file::write(&control, &self.project)?;
        self.reach(Stage::ControlFileWritten);

        Ok(control)
    }
}

/// Run every init stage for the project selected by `cwd` and `signal`.
pub fn run(cwd: &Path, signal: &InstallSignal) -> Result<InitReport, InitFailure> {
    let root = match project_root(cwd, signal) {
        Ok(root) => root,
        Err(reason) => {
            tracing::debug!("Skipping init: {}", reason);
            return Ok(InitReport {
                root: cwd.to_path_buf(),
                stages: vec![Stage::Start, Stage::Done],
                changes: Vec::new(),
                hooks: None,
                outcome: InitOutcome::Skipped(reason),
            });
        }
    };

    let project = Project::new(&root);
    let settings = match Settings::load(&project.path(ProjectPath::Settings)) {
        Ok(settings) => settings,
        Err(source) => {
            return Err(InitFailure {
                stages: vec![Stage::Start, Stage::Failed],
                changes: Vec::new(),
                source,
            })
        }
    };

    tracing::debug!("Initializing {}", root.display());
    let mut pipeline = Pipeline {
        project,
        settings,
        stages: vec![Stage::Start],
        changes: Vec::new(),
        hooks: None,
    };

    match pipeline.run() {
        Ok(control) => {
            pipeline.reach(Stage::Done);
            Ok(InitReport {
                root,
                stages: pipeline.stages,
                changes: pipeline.changes,
                hooks: pipeline.hooks,
                outcome: InitOutcome::Completed(control),
            })
        }
        Err(source) => {
            pipeline.reach(Stage::Failed);
            Err(InitFailure {
                stages: pipeline.stages,
                changes: pipeline.changes,
                source,
            })
        }
    }
}
