use super::{retire_all, write_managed, FileChange, NOTICE};
use crate::error::{Error, Result};
use crate::project::{Project, ProjectPath};
use crate::stylelint::{Extends, StylelintConfig};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const LEGACY_NAMES: &[&str] = &[
    ".stylelintrc",
    ".stylelintrc.js",
    "stylelint.config.js",
    "stylelint.config.cjs",
    "stylelint.config.mjs",
];

const BASE_CONFIG: &str = "stylelint-config-standard";
const IGNORE_FILES: &[&str] = &["dist/**", "coverage/**"];

fn default_rules() -> BTreeMap<String, Value> {
    BTreeMap::from([
        // CSS modules use camelCase class names
        ("selector-class-pattern".to_string(), Value::Null),
        ("import-notation".to_string(), json!("string")),
    ])
}

/// Defaults overlaid with the user's own `rules`.
pub fn generate(existing: Option<&StylelintConfig>) -> StylelintConfig {
    let mut rules = default_rules();
    if let Some(existing) = existing {
        rules.extend(existing.rules.clone());
    }

    StylelintConfig {
        comment: Some(NOTICE.to_string()),
        extends: Some(Extends::Many(vec![BASE_CONFIG.to_string()])),
        rules,
        ignore_files: IGNORE_FILES.iter().map(|glob| glob.to_string()).collect(),
    }
}

pub fn write(project: &Project) -> Result<Vec<FileChange>> {
    let path = project.path(ProjectPath::StylelintConfig);
    let existing = if path.exists() {
        StylelintConfig::load(&path)
            .map_err(|err| {
                tracing::warn!("Not carrying rules over from {}: {}", path.display(), err);
            })
            .ok()
    } else {
        None
    };

    let legacy: Vec<_> = LEGACY_NAMES.iter().map(|name| project.file(name)).collect();
    let mut changes = retire_all(&legacy)?;

    let mut contents = serde_json::to_string_pretty(&generate(existing.as_ref()))
        .map_err(|err| Error::io("failed to serialize", &path, err.into()))?;
    contents.push('\n');

    changes.push(write_managed(&path, &contents)?);
    Ok(changes)
}
