use crate::cli::{Cli, Commands};
use crate::control_file::{self, ControlFile};
use crate::error::RunError;
use crate::probe::DiskProbe;
use crate::project::{Project, ProjectPath};
use crate::resolver::{self, CommandSpec, ResolvedCommand, SearchContext};
use crate::runner::{self, RunOptions};
use crate::settings::Settings;
use anyhow::{Context as _, Result};

mod build;
mod e2e;
mod init;
mod lint;
mod lint_styles;
mod start;
mod status;
mod typecheck;
mod validate;
mod which;

pub(crate) const ESLINT: &str = "eslint/bin/eslint.js";
pub(crate) const STYLELINT: &str = "stylelint/bin/stylelint.mjs";
pub(crate) const TSC: &str = "typescript/bin/tsc";
pub(crate) const VITE: &str = "vite/bin/vite.js";
pub(crate) const VITEST: &str = "vitest/vitest.mjs";
pub(crate) const CYPRESS: &str = "cypress/bin/cypress";

/// Per-invocation state shared by every command.
pub struct Context {
    project: Project,
    search_path: Option<String>,
}

impl Context {
    pub fn new(project: Project, search_path: Option<String>) -> Self {
        Self {
            project,
            search_path: search_path.map(|roots| absolute_roots(&roots)),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn settings(&self) -> Result<Settings> {
        let path = self.project.path(ProjectPath::Settings);
        Settings::load(&path).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn control_file(&self) -> Result<ControlFile> {
        Ok(control_file::read(&self.project, &DiskProbe)?)
    }

    /// Resolve a tool with a fresh search context.
    pub fn resolve(&self, spec: &str) -> Result<ResolvedCommand> {
        let probe = DiskProbe;
        let context = SearchContext::new(self.project.root(), self.search_path.clone(), &probe);
        Ok(resolver::resolve(&context, &CommandSpec::new(spec))?)
    }

    fn options(&self, options: RunOptions) -> RunOptions {
        options.in_dir(self.project.root())
    }

    /// Run a tool in the project root with the console passed through.
    pub fn run_tool(&self, spec: &str, args: &[&str]) -> Result<()> {
        let command = self.resolve(spec)?;
        runner::run_sync(&command.command_line(args), &self.options(RunOptions::inherited()))?;
        Ok(())
    }

    /// Run a tool in the project root and capture its output.
    pub fn capture_tool(
        &self,
        command: &ResolvedCommand,
        args: &[&str],
    ) -> std::result::Result<String, RunError> {
        runner::run_sync(&command.command_line(args), &self.options(RunOptions::captured()))
    }

    pub fn inherited(&self) -> RunOptions {
        self.options(RunOptions::inherited())
    }
}

/// Anchor relative search roots at the current directory.
fn absolute_roots(roots: &str) -> String {
    roots
        .split(':')
        .map(|root| match std::path::absolute(root) {
            Ok(path) if !root.is_empty() => path.display().to_string(),
            _ => root.to_string(),
        })
        .collect::<Vec<_>>()
        .join(":")
}

pub fn execute(cli: Cli) -> Result<()> {
    let project = Project::locate(cli.project_dir.as_deref())?;
    let context = Context::new(project, cli.search_path);

    match cli.command {
        Commands::Init => init::execute(&context),

        Commands::Lint { target } => lint::execute(&context, target),

        Commands::LintStyles { glob } => lint_styles::execute(&context, glob),

        Commands::Typecheck => typecheck::execute(&context),

        Commands::Test => test::execute(&context),

        Commands::E2e => e2e::execute(&context),

        Commands::Build => build::execute(&context),

        Commands::Start => start::execute(&context),

        Commands::Validate => validate::execute(&context),

        Commands::Which { command } => which::execute(&context, &command),

        Commands::Status => status::execute(&context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_relative_search_roots_become_absolute() {
        let cwd = env::current_dir().unwrap();
        let roots = absolute_roots("/opt/node_modules::vendor/node_modules");
        assert_eq!(
            roots,
            format!("/opt/node_modules::{}", cwd.join("vendor/node_modules").display())
        );
    }
}
