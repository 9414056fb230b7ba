use super::{write_managed, FileChange, NOTICE};
use crate::error::{Error, Result};
use crate::manifest::{PackageManifest, ProjectType};
use crate::project::{Project, ProjectPath};
use crate::tsconfig::{CompilerOptions, Jsx, ModuleKind, ModuleResolution, TsConfig};
use std::path::Path;

const TARGET: &str = "ES2022";
const LIB: &[&str] = &["ES2022", "DOM", "DOM.Iterable"];
const DEFAULT_INCLUDE: &str = "src";
const VITEST_TYPES: &str = "vitest/globals";

/// Build the generated tsconfig, patching in what the user configured in
/// `existing`: path aliases plus include/exclude lists.
pub fn generate(
    project_type: ProjectType,
    manifest: &PackageManifest,
    existing: Option<&TsConfig>,
) -> TsConfig {
    let (module, module_resolution) = match project_type {
        ProjectType::Module => (ModuleKind::EsNext, ModuleResolution::Bundler),
        ProjectType::Commonjs => (ModuleKind::CommonJs, ModuleResolution::Node10),
    };

    let carried = existing.and_then(|config| config.compiler_options.as_ref());

    let compiler_options = CompilerOptions {
        target: Some(TARGET.to_string()),
        lib: LIB.iter().map(|lib| lib.to_string()).collect(),
        module: Some(module),
        module_resolution: Some(module_resolution),
        jsx: manifest.has_dependency("react").then_some(Jsx::ReactJsx),
        strict: Some(true),
        es_module_interop: Some(true),
        skip_lib_check: Some(true),
        isolated_modules: Some(true),
        resolve_json_module: Some(true),
        no_emit: Some(true),
        base_url: carried.and_then(|options| options.base_url.clone()),
        paths: carried.and_then(|options| options.paths.clone()),
        types: if manifest.has_dependency("vitest") {
            vec![VITEST_TYPES.to_string()]
        } else {
            Vec::new()
        },
    };

    let include = existing
        .map(|config| config.include.clone())
        .filter(|include| !include.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_INCLUDE.to_string()]);

    TsConfig {
        comment: Some(NOTICE.to_string()),
        compiler_options: Some(compiler_options),
        include,
        exclude: existing
            .map(|config| config.exclude.clone())
            .unwrap_or_default(),
    }
}

fn read_existing(path: &Path) -> Option<TsConfig> {
    if !path.exists() {
        return None;
    }
    match TsConfig::load(path) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!("Not carrying settings over from {}: {}", path.display(), err);
            None
        }
    }
}

pub fn write(
    project: &Project,
    project_type: ProjectType,
    manifest: &PackageManifest,
) -> Result<Vec<FileChange>> {
    let path = project.path(ProjectPath::TsConfig);
    let existing = read_existing(&path);
    let config = generate(project_type, manifest, existing.as_ref());

    let mut contents = serde_json::to_string_pretty(&config)
        .map_err(|err| Error::io("failed to serialize", &path, err.into()))?;
    contents.push('\n');

    Ok(vec![write_managed(&path, &contents)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::{Change, MARKER};
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(deps: &[&str]) -> PackageManifest {
        PackageManifest {
            name: "app".into(),
            version: "1.0.0".into(),
            project_type: None,
            dependencies: Some(
                deps.iter()
                    .map(|name| (name.to_string(), "*".to_string()))
                    .collect::<BTreeMap<_, _>>(),
            ),
            dev_dependencies: None,
        }
    }

    #[test]
    fn test_module_project() {
        let config = generate(ProjectType::Module, &manifest(&["react", "vitest"]), None);
        let options = config.compiler_options.unwrap();

        assert_eq!(options.module, Some(ModuleKind::EsNext));
        assert_eq!(options.module_resolution, Some(ModuleResolution::Bundler));
        assert_eq!(options.jsx, Some(Jsx::ReactJsx));
        assert_eq!(options.types, vec!["vitest/globals"]);
        assert_eq!(config.include, vec!["src"]);
        assert!(config.comment.unwrap().contains(MARKER));
    }

    #[test]
    fn test_commonjs_project() {
        let config = generate(ProjectType::Commonjs, &manifest(&[]), None);
        let options = config.compiler_options.unwrap();

        assert_eq!(options.module, Some(ModuleKind::CommonJs));
        assert_eq!(options.module_resolution, Some(ModuleResolution::Node10));
        assert_eq!(options.jsx, None);
        assert!(options.types.is_empty());
    }

    #[test]
    fn test_patches_user_aliases_and_backs_up() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        let path = temp.path().join("tsconfig.json");
        fs::write(
            &path,
            r#"{
                "compilerOptions": {
                    "module": "commonjs",
                    "baseUrl": ".",
                    "paths": {"@/*": ["src/*"]}
                },
                "include": ["app"]
            }"#,
        )
        .unwrap();

        let changes = write(&project, ProjectType::Module, &manifest(&[])).unwrap();
        assert!(matches!(changes[0].change, Change::Replaced { .. }));

        let written = TsConfig::load(&path).unwrap();
        let options = written.compiler_options.unwrap();
        assert_eq!(options.base_url.as_deref(), Some("."));
        assert_eq!(options.paths.unwrap()["@/*"], vec!["src/*"]);
        assert_eq!(options.module, Some(ModuleKind::EsNext));
        assert_eq!(written.include, vec!["app"]);
        assert!(temp.path().join("tsconfig.json_backup").exists());
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        let path = temp.path().join("tsconfig.json");
        fs::write(&path, r#"{"compilerOptions": {"baseUrl": "./src"}}"#).unwrap();

        write(&project, ProjectType::Module, &manifest(&["react"])).unwrap();
        let first = fs::read(&path).unwrap();

        let changes = write(&project, ProjectType::Module, &manifest(&["react"])).unwrap();
        assert_eq!(changes[0].change, Change::Unchanged);
        assert_eq!(fs::read(&path).unwrap(), first);
        assert!(!temp.path().join("tsconfig.json_backup2").exists());
    }

    #[test]
    fn test_unparseable_existing_file_is_still_replaced() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        fs::write(temp.path().join("tsconfig.json"), "{ not json").unwrap();

        let changes = write(&project, ProjectType::Commonjs, &manifest(&[])).unwrap();
        assert!(matches!(changes[0].change, Change::Replaced { .. }));
        assert_eq!(
            fs::read_to_string(temp.path().join("tsconfig.json_backup")).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_carries_aliases_from_tsc_init_output() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        fs::write(
            temp.path().join("tsconfig.json"),
            "{\n  \"compilerOptions\": {\n    /* Modules */\n    \"module\": \"ES6\",\n    \"baseUrl\": \"./\", // root\n    \"paths\": {\"~/*\": [\"lib/*\"]},\n  }\n}\n",
        )
        .unwrap();

        write(&project, ProjectType::Module, &manifest(&[])).unwrap();

        let written = TsConfig::load(&temp.path().join("tsconfig.json")).unwrap();
        let options = written.compiler_options.unwrap();
        assert_eq!(options.base_url.as_deref(), Some("./"));
        assert_eq!(options.paths.unwrap()["~/*"], vec!["lib/*"]);
    }
}
