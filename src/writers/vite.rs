use super::{js_header, retire_all, write_managed, FileChange};
use crate::error::Result;
use crate::manifest::PackageManifest;
use crate::project::{Project, ProjectPath};
use std::fmt::Write as _;

const LEGACY_NAMES: &[&str] = &[
    "vite.config.js",
    "vite.config.mjs",
    "vite.config.cjs",
    "vite.config.mts",
];

const SETUP_FILE: &str = "./src/setupTests.ts";

/// What the generated Vite config needs to wire in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViteFeatures {
    pub react: bool,
    pub vitest: bool,
    pub jest_dom: bool,
}

impl ViteFeatures {
    pub fn from_manifest(manifest: &PackageManifest) -> Self {
        Self {
            react: manifest.has_dependency("@vitejs/plugin-react"),
            vitest: manifest.has_dependency("vitest"),
            jest_dom: manifest.has_dependency("@testing-library/jest-dom"),
        }
    }
}

pub fn render(features: ViteFeatures) -> String {
    let mut out = js_header();

    if features.vitest {
        out.push_str("/// <reference types=\"vitest\" />\n");
    }
    out.push_str("import { defineConfig } from \"vite\";\n");
    if features.react {
        out.push_str("import react from \"@vitejs/plugin-react\";\n");
    }

    out.push_str("\nexport default defineConfig({\n");
    let plugins = if features.react { "react()" } else { "" };
    let _ = writeln!(out, "  plugins: [{plugins}],");

    if features.vitest {
        let environment = if features.react { "jsdom" } else { "node" };
        out.push_str("  test: {\n");
        let _ = writeln!(out, "    environment: \"{environment}\",");
        out.push_str("    globals: true,\n");
        if features.jest_dom {
            let _ = writeln!(out, "    setupFiles: [\"{SETUP_FILE}\"],");
        }
        out.push_str("  },\n");
    }

    out.push_str("});\n");
    out
}

/// Write `vite.config.ts` and clear older Vite config names.
pub fn write(project: &Project, manifest: &PackageManifest) -> Result<Vec<FileChange>> {
    let features = ViteFeatures::from_manifest(manifest);
    tracing::debug!("Vite features: {:?}", features);

    let legacy: Vec<_> = LEGACY_NAMES.iter().map(|name| project.file(name)).collect();
    let mut changes = retire_all(&legacy)?;
    changes.push(write_managed(
        &project.path(ProjectPath::ViteConfig),
        &render(features),
    )?);
    Ok(changes)
}
