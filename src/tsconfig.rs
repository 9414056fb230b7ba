use crate::codec::{self, FieldChecker, Schema};
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Closed set of string literals, parsed case-insensitively the way `tsc`
/// accepts them and written back in canonical spelling.
macro_rules! literal_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $literal:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const LITERALS: &'static [&'static str] = &[$($literal),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
                $(
                    if value.eq_ignore_ascii_case($literal) {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!("unknown {} `{}`", stringify!($name), value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(<D::Error as serde::de::Error>::custom)
            }
        }
    };
}

literal_enum! {
    /// `compilerOptions.module`
    ModuleKind {
        None => "None",
        CommonJs => "CommonJS",
        Amd => "AMD",
        Umd => "UMD",
        System => "System",
        Es6 => "ES6",
        Es2015 => "ES2015",
        Es2020 => "ES2020",
        Es2022 => "ES2022",
        EsNext => "ESNext",
        Node16 => "Node16",
        Node18 => "Node18",
        NodeNext => "NodeNext",
        Preserve => "Preserve",
    }
}

literal_enum! {
    /// `compilerOptions.moduleResolution`
    ModuleResolution {
        Classic => "Classic",
        Node => "Node",
        Node10 => "Node10",
        Node16 => "Node16",
        NodeNext => "NodeNext",
        Bundler => "Bundler",
    }
}

literal_enum! {
    /// `compilerOptions.jsx`
    Jsx {
        Preserve => "preserve",
        React => "react",
        ReactJsx => "react-jsx",
        ReactJsxDev => "react-jsxdev",
        ReactNative => "react-native",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lib: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_resolution: Option<ModuleResolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsx: Option<Jsx>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es_module_interop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_lib_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolated_modules: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_json_module: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_emit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// `tsconfig.json`, limited to the options jskit generates or carries over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(rename = "$comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_options: Option<CompilerOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl Schema for TsConfig {
    const KIND: &'static str = "TypeScript config";
    const ALLOW_COMMENTS: bool = true;

    fn check(fields: &mut FieldChecker<'_>) {
        fields.object("compilerOptions", false);
        fields.string("compilerOptions.target", false);
        fields.string_list("compilerOptions.lib", false);
        fields.literal("compilerOptions.module", false, ModuleKind::LITERALS, true);
        fields.literal(
            "compilerOptions.moduleResolution",
            false,
            ModuleResolution::LITERALS,
            true,
        );
        fields.literal("compilerOptions.jsx", false, Jsx::LITERALS, true);
        for flag in [
            "strict",
            "esModuleInterop",
            "skipLibCheck",
            "isolatedModules",
            "resolveJsonModule",
            "noEmit",
        ] {
            fields.boolean(&format!("compilerOptions.{flag}"), false);
        }
        fields.string("compilerOptions.baseUrl", false);
        fields.string_list_map("compilerOptions.paths", false);
        fields.string_list("compilerOptions.types", false);
        fields.string_list("include", false);
        fields.string_list("exclude", false);
    }
}

impl TsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        codec::load(path)
    }
}
