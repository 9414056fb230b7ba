use crate::codec::{self, FieldChecker, Schema};
use crate::error::Result;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Module system declared by the `type` field of `package.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Module,
    #[default]
    Commonjs,
}

impl ProjectType {
    pub const LITERALS: &'static [&'static str] = &["module", "commonjs"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Module => "module",
            ProjectType::Commonjs => "commonjs",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of `package.json` jskit reads. Never written back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default, rename = "type")]
    pub project_type: Option<ProjectType>,
    #[serde(default, deserialize_with = "unique_map")]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "unique_map")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

impl Schema for PackageManifest {
    const KIND: &'static str = "package manifest";

    fn check(fields: &mut FieldChecker<'_>) {
        fields.string("name", true);
        fields.string("version", true);
        fields.literal("type", false, ProjectType::LITERALS, false);
        fields.string_map("dependencies", false);
        fields.string_map("devDependencies", false);
    }
}

impl PackageManifest {
    pub fn load(path: &Path) -> Result<Self> {
        codec::load(path)
    }

    /// Module type, `commonjs` when `type` is absent (the Node.js default).
    pub fn project_type(&self) -> ProjectType {
        self.project_type.unwrap_or_default()
    }

    /// Names from `dependencies` and `devDependencies` combined.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .flat_map(|map| map.keys())
            .map(String::as_str)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependency_names().any(|candidate| candidate == name)
    }
}

/// Dependency map that rejects repeated package names instead of keeping the
/// last one.
fn unique_map<'de, D>(deserializer: D) -> std::result::Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueMapVisitor;

    impl<'de> Visitor<'de> for UniqueMapVisitor {
        type Value = Option<BTreeMap<String, String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of package names to version ranges")
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(
            self,
            deserializer: D,
        ) -> std::result::Result<Self::Value, D::Error> {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((name, range)) = access.next_entry::<String, String>()? {
                if map.contains_key(&name) {
                    return Err(de::Error::custom(format!(
                        "duplicate package `{name}` in dependency map"
                    )));
                }
                map.insert(name, range);
            }
            Ok(Some(map))
        }
    }

    deserializer.deserialize_option(UniqueMapVisitor)
}
