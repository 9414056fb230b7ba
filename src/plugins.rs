use crate::control_file::EslintPlugins;
use crate::manifest::PackageManifest;
use regex::Regex;
use std::sync::OnceLock;

const REACT: &str = "react";
const VITEST: &str = "vitest";
const JEST_DOM: &str = "@testing-library/jest-dom";
const TESTING_LIBRARY_REACT: &str = "@testing-library/react";
const CYPRESS: &str = "cypress";

fn tanstack_query_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^@tanstack/([a-z]+-)?query$").expect("tanstack pattern is valid")
    })
}

/// Flag each optional plugin whose library the manifest declares.
///
/// Only dependency names are consulted; nothing under `node_modules` is read.
pub fn detect(manifest: &PackageManifest) -> EslintPlugins {
    let plugins = EslintPlugins {
        react: manifest.has_dependency(REACT),
        vitest: manifest.has_dependency(VITEST),
        jest_dom: manifest.has_dependency(JEST_DOM),
        cypress: manifest.has_dependency(CYPRESS),
        testing_library_react: manifest.has_dependency(TESTING_LIBRARY_REACT),
        tanstack_query: manifest
            .dependency_names()
            .any(|name| tanstack_query_pattern().is_match(name)),
    };

    tracing::debug!("Detected plugins: {:?}", plugins.enabled());
    plugins
}
