//! The persisted record of what `jskit init` detected.

use crate::codec::{self, FieldChecker, Schema};
use crate::error::{Error, Result};
use crate::manifest::ProjectType;
use crate::probe::Probe;
use crate::project::{Project, ProjectPath};
use crate::writers;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional ESLint plugin sets, one flag per detected library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EslintPlugins {
    pub react: bool,
    pub vitest: bool,
    pub jest_dom: bool,
    pub cypress: bool,
    pub testing_library_react: bool,
    pub tanstack_query: bool,
}

impl EslintPlugins {
    pub const FIELDS: &'static [&'static str] = &[
        "react",
        "vitest",
        "jestDom",
        "cypress",
        "testingLibraryReact",
        "tanstackQuery",
    ];

    /// Names of the enabled flags, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        let flags = [
            self.react,
            self.vitest,
            self.jest_dom,
            self.cypress,
            self.testing_library_react,
            self.tanstack_query,
        ];
        Self::FIELDS
            .iter()
            .zip(flags)
            .filter_map(|(name, on)| on.then_some(*name))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlFile {
    pub working_directory_path: PathBuf,
    pub project_type: ProjectType,
    pub eslint_plugins: EslintPlugins,
    pub has_test_directory: bool,
    pub has_cypress_directory: bool,
}

impl Schema for ControlFile {
    const KIND: &'static str = "control file";

    fn check(fields: &mut FieldChecker<'_>) {
        fields.string("workingDirectoryPath", true);
        fields.literal("projectType", true, ProjectType::LITERALS, false);
        fields.object("eslintPlugins", true);
        for plugin in EslintPlugins::FIELDS {
            fields.boolean(&format!("eslintPlugins.{plugin}"), true);
        }
        fields.boolean("hasTestDirectory", true);
        fields.boolean("hasCypressDirectory", true);
    }
}

/// Candidate locations, in lookup order.
pub fn candidates(project: &Project) -> [PathBuf; 2] {
    [
        project.path(ProjectPath::ControlFile),
        project.path(ProjectPath::NestedControlFile),
    ]
}

/// Read the first control file that exists.
pub fn read(project: &Project, probe: &dyn Probe) -> Result<ControlFile> {
    let path = candidates(project)
        .into_iter()
        .find(|candidate| probe.exists(candidate))
        .ok_or_else(|| Error::ControlFileMissing {
            root: project.root().to_path_buf(),
        })?;

    tracing::debug!("Reading control file {}", path.display());
    load(&path)
}

pub fn load(path: &Path) -> Result<ControlFile> {
    codec::load(path)
}

/// Overwrite the project-root control file.
pub fn write(control_file: &ControlFile, project: &Project) -> Result<PathBuf> {
    let path = project.path(ProjectPath::ControlFile);
    let mut contents = serde_json::to_string_pretty(control_file)
        .map_err(|err| Error::io("failed to serialize", &path, err.into()))?;
    contents.push('\n');

    writers::write_atomic(&path, &contents)?;
    tracing::debug!("Wrote control file {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::DiskProbe;
    use std::fs;
    use tempfile::TempDir;

    fn sample(root: &Path) -> ControlFile {
        ControlFile {
            working_directory_path: root.to_path_buf(),
            project_type: ProjectType::Module,
            eslint_plugins: EslintPlugins {
                react: true,
                vitest: true,
                tanstack_query: true,
                ..EslintPlugins::default()
            },
            has_test_directory: true,
            has_cypress_directory: false,
        }
    }

    #[test]
    fn test_round_trip() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        let original = sample(temp.path());

        let path = write(&original, &project).unwrap();
        assert_eq!(path, temp.path().join("control-file.json"));

        let loaded = read(&project, &DiskProbe).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_wire_format() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        write(&sample(temp.path()), &project).unwrap();

        let text = fs::read_to_string(temp.path().join("control-file.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["projectType"], "module");
        assert_eq!(value["eslintPlugins"]["tanstackQuery"], true);
        assert_eq!(value["eslintPlugins"]["testingLibraryReact"], false);
        assert_eq!(value["hasCypressDirectory"], false);
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_nested_candidate_is_used_when_local_missing() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        let nested = project.path(ProjectPath::NestedControlFile);
        fs::create_dir_all(nested.parent().unwrap()).unwrap();

        let original = sample(temp.path());
        fs::write(&nested, serde_json::to_string(&original).unwrap()).unwrap();

        assert_eq!(read(&project, &DiskProbe).unwrap(), original);
    }

    #[test]
    fn test_local_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        let nested = project.path(ProjectPath::NestedControlFile);
        fs::create_dir_all(nested.parent().unwrap()).unwrap();

        let mut stale = sample(temp.path());
        stale.project_type = ProjectType::Commonjs;
        fs::write(&nested, serde_json::to_string(&stale).unwrap()).unwrap();

        let fresh = sample(temp.path());
        write(&fresh, &project).unwrap();

        assert_eq!(read(&project, &DiskProbe).unwrap(), fresh);
    }

    #[test]
    fn test_missing_control_file() {
        let temp = TempDir::new().unwrap();
        let err = read(&Project::new(temp.path()), &DiskProbe).unwrap_err();
        assert!(matches!(err, Error::ControlFileMissing { .. }));
        assert!(err.to_string().contains("jskit init"));
    }

    #[test]
    fn test_partial_record_lists_every_missing_field() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("control-file.json");
        fs::write(
            &path,
            r#"{"workingDirectoryPath": "/p", "projectType": "esm", "eslintPlugins": {"react": true}}"#,
        )
        .unwrap();

        let parse = match load(&path).unwrap_err() {
            Error::Parse(parse) => parse,
            other => panic!("expected a parse error, got {other:?}"),
        };
        let fields: Vec<&str> = parse.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "projectType",
                "eslintPlugins.vitest",
                "eslintPlugins.jestDom",
                "eslintPlugins.cypress",
                "eslintPlugins.testingLibraryReact",
                "eslintPlugins.tanstackQuery",
                "hasTestDirectory",
                "hasCypressDirectory",
            ]
        );
    }

    #[test]
    fn test_enabled_plugins() {
        let plugins = EslintPlugins {
            react: true,
            cypress: true,
            ..EslintPlugins::default()
        };
        assert_eq!(plugins.enabled(), vec!["react", "cypress"]);
    }
}
