use crate::codec::{self, FieldChecker, Schema};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// `extends` accepts a single config name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Extends::One(name) => vec![name.as_str()],
            Extends::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// `.stylelintrc.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylelintConfig {
    #[serde(rename = "$comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Extends>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_files: Vec<String>,
}

impl Schema for StylelintConfig {
    const KIND: &'static str = "Stylelint config";

    fn check(fields: &mut FieldChecker<'_>) {
        fields.string("$comment", false);
        fields.string_or_list("extends", false);
        fields.object("rules", false);
        fields.string_list("ignoreFiles", false);
    }
}

impl StylelintConfig {
    pub fn load(path: &Path) -> Result<Self> {
        codec::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn decode(text: &str) -> std::result::Result<StylelintConfig, crate::error::ParseError> {
        codec::decode(text, &PathBuf::from(".stylelintrc.json"))
    }

    #[test]
    fn test_extends_string_or_list() {
        let single = decode(r#"{"extends": "stylelint-config-standard"}"#).unwrap();
        assert_eq!(
            single.extends.unwrap().names(),
            vec!["stylelint-config-standard"]
        );

        let many = decode(r#"{"extends": ["a", "b"], "rules": {"color-no-invalid-hex": true}}"#)
            .unwrap();
        assert_eq!(many.extends.unwrap().names(), vec!["a", "b"]);
        assert_eq!(many.rules.get("color-no-invalid-hex"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_invalid_stylelint_config() {
        let err = decode(r#"{"extends": 3, "rules": [], "ignoreFiles": "dist"}"#).unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["extends", "rules", "ignoreFiles"]);
    }
}
