use super::{js_header, retire_all, write_managed, FileChange};
use crate::control_file::EslintPlugins;
use crate::error::Result;
use crate::project::{Project, ProjectPath};

/// Configs ESLint 9 no longer reads, or reads ahead of `eslint.config.mjs`.
const LEGACY_NAMES: &[&str] = &[
    ".eslintrc",
    ".eslintrc.json",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.yml",
    ".eslintrc.yaml",
    ".eslintignore",
    "eslint.config.js",
    "eslint.config.cjs",
];

const TEST_FILES: &str = r#"["**/*.{test,spec}.{js,jsx,ts,tsx}", "**/__tests__/**"]"#;

/// One optional plugin: its import line and the config entries it adds.
struct PluginBlock {
    import: &'static str,
    entries: String,
}

fn plugin_blocks(plugins: &EslintPlugins) -> Vec<PluginBlock> {
    let mut blocks = Vec::new();

    if plugins.react {
        blocks.push(PluginBlock {
            import: "import react from \"eslint-plugin-react\";\n\
                     import reactHooks from \"eslint-plugin-react-hooks\";",
            entries: [
                "  react.configs.flat.recommended,",
                "  react.configs.flat[\"jsx-runtime\"],",
                "  {",
                "    plugins: { \"react-hooks\": reactHooks },",
                "    rules: reactHooks.configs.recommended.rules,",
                "    settings: { react: { version: \"detect\" } },",
                "  },",
            ]
            .join("\n"),
        });
    }
    if plugins.vitest {
        blocks.push(PluginBlock {
            import: "import vitest from \"@vitest/eslint-plugin\";",
            entries: format!(
                "  {{\n    files: {TEST_FILES},\n    ...vitest.configs.recommended,\n    \
                 languageOptions: {{ globals: vitest.environments.env.globals }},\n  }},"
            ),
        });
    }
    if plugins.jest_dom {
        blocks.push(PluginBlock {
            import: "import jestDom from \"eslint-plugin-jest-dom\";",
            entries: format!(
                "  {{ files: {TEST_FILES}, ...jestDom.configs[\"flat/recommended\"] }},"
            ),
        });
    }
    if plugins.testing_library_react {
        blocks.push(PluginBlock {
            import: "import testingLibrary from \"eslint-plugin-testing-library\";",
            entries: format!(
                "  {{ files: {TEST_FILES}, ...testingLibrary.configs[\"flat/react\"] }},"
            ),
        });
    }
    if plugins.cypress {
        blocks.push(PluginBlock {
            import: "import cypress from \"eslint-plugin-cypress/flat\";",
            entries: "  { files: [\"cypress/**/*.{js,ts}\"], ...cypress.configs.recommended },"
                .to_string(),
        });
    }
    if plugins.tanstack_query {
        blocks.push(PluginBlock {
            import: "import tanstackQuery from \"@tanstack/eslint-plugin-query\";",
            entries: "  ...tanstackQuery.configs[\"flat/recommended\"],".to_string(),
        });
    }

    blocks
}

/// Flat config with the base presets followed by one section per plugin.
pub fn render(plugins: &EslintPlugins) -> String {
    let blocks = plugin_blocks(plugins);
    let mut out = js_header();

    out.push_str("import js from \"@eslint/js\";\n");
    out.push_str("import globals from \"globals\";\n");
    out.push_str("import tseslint from \"typescript-eslint\";\n");
    for block in &blocks {
        out.push_str(block.import);
        out.push('\n');
    }

    out.push_str("\nexport default tseslint.config(\n");
    out.push_str("  { ignores: [\"dist\", \"coverage\", \"node_modules\"] },\n");
    out.push_str("  js.configs.recommended,\n");
    out.push_str("  ...tseslint.configs.recommended,\n");
    out.push_str("  { languageOptions: { globals: { ...globals.browser, ...globals.node } } },\n");
    for block in &blocks {
        out.push_str(&block.entries);
        out.push('\n');
    }
    out.push_str(");\n");
    out
}

pub fn write(project: &Project, plugins: &EslintPlugins) -> Result<Vec<FileChange>> {
    let legacy: Vec<_> = LEGACY_NAMES.iter().map(|name| project.file(name)).collect();
    let mut changes = retire_all(&legacy)?;
    changes.push(write_managed(
        &project.path(ProjectPath::EslintConfig),
        &render(plugins),
    )?);
    Ok(changes)
}
