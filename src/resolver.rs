//! Command resolution
//!
//! Locates a tool's executable from a path fragment relative to a dependency
//! root. Strategies run in a fixed order and the first hit wins:
//!
//! 1. every root listed in the search path (`NODE_PATH`), in order
//! 2. a pnpm-style content-addressed store found in the working directory path
//! 3. `node_modules/` directly under the working directory

use crate::error::ResolutionError;
use crate::probe::Probe;
use regex::Regex;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable holding extra colon-separated search roots.
pub const SEARCH_PATH_VAR: &str = "NODE_PATH";

/// Relative path fragment naming an executable inside a dependency tree,
/// e.g. `typescript/bin/tsc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandSpec(String);

impl CommandSpec {
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package owning the executable: the first segment, or the first two for
    /// scoped packages (`@scope/pkg`).
    pub fn package_name(&self) -> &str {
        let spec = self.0.trim_start_matches('/');
        let segments = if spec.starts_with('@') { 2 } else { 1 };

        match spec.match_indices('/').nth(segments - 1) {
            Some((end, _)) => &spec[..end],
            None => spec,
        }
    }

    fn relative(&self) -> &Path {
        Path::new(self.0.trim_start_matches('/'))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandSpec {
    fn from(spec: &str) -> Self {
        Self::new(spec)
    }
}

/// Everything a resolution needs. Built per invocation, never persisted.
pub struct SearchContext<'a> {
    cwd: PathBuf,
    search_path: Option<String>,
    probe: &'a dyn Probe,
}

impl<'a> SearchContext<'a> {
    pub fn new(cwd: impl Into<PathBuf>, search_path: Option<String>, probe: &'a dyn Probe) -> Self {
        Self {
            cwd: cwd.into(),
            search_path,
            probe,
        }
    }

    /// Context for `cwd` with the search path taken from `NODE_PATH`.
    pub fn from_env(cwd: impl Into<PathBuf>, probe: &'a dyn Probe) -> Self {
        Self::new(cwd, env::var(SEARCH_PATH_VAR).ok(), probe)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Search roots in listed order, empty segments dropped.
    pub fn search_roots(&self) -> impl Iterator<Item = &str> {
        self.search_path
            .as_deref()
            .unwrap_or_default()
            .split(':')
            .filter(|root| !root.is_empty())
    }
}

/// Absolute path to an executable, consumed right away by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand(PathBuf);

impl ResolvedCommand {
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Command line for the runner: the executable followed by `args`.
    pub fn command_line<S: AsRef<str>>(&self, args: &[S]) -> String {
        let mut line = self.0.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg.as_ref());
        }
        line
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

type Strategy = fn(&SearchContext<'_>, &CommandSpec) -> Option<PathBuf>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("search path", from_search_path),
    ("package store", from_package_store),
    ("node_modules", from_node_modules),
];

/// Resolve `spec` to an executable path.
pub fn resolve(
    context: &SearchContext<'_>,
    spec: &CommandSpec,
) -> Result<ResolvedCommand, ResolutionError> {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let path = strategy(context, spec)?;
            tracing::debug!("Resolved {} via {}: {}", spec, name, path.display());
            Some(ResolvedCommand(path))
        })
        .ok_or_else(|| ResolutionError {
            spec: spec.to_string(),
        })
}

/// First search root that contains the command.
pub fn from_search_path(context: &SearchContext<'_>, spec: &CommandSpec) -> Option<PathBuf> {
    context
        .search_roots()
        .map(|root| Path::new(root).join(spec.relative()))
        .find(|candidate| context.probe.exists(candidate))
}

/// Last matching package entry in a content-addressed store.
///
/// Entries match on `<package>@` rather than a bare `<package>` prefix, so
/// `vite` never picks a `vitest@...` entry. The store root is located from the working directory string alone. The
/// returned path is not checked for existence; a stale pick surfaces when the
/// runner tries to spawn it.
pub fn from_package_store(context: &SearchContext<'_>, spec: &CommandSpec) -> Option<PathBuf> {
    let store_root = store_root(context.cwd())?;
    let prefix = format!("{}@", spec.package_name().replace('/', "+"));

    let entry = context
        .probe
        .list_dir(&store_root)
        .into_iter()
        .filter(|name| name.starts_with(&prefix))
        .last()?;

    Some(
        store_root
            .join(entry)
            .join("node_modules")
            .join(spec.relative()),
    )
}

/// `node_modules/<spec>` directly under the working directory.
pub fn from_node_modules(context: &SearchContext<'_>, spec: &CommandSpec) -> Option<PathBuf> {
    let candidate = context.cwd().join("node_modules").join(spec.relative());
    context.probe.exists(&candidate).then_some(candidate)
}

fn store_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.*?/node_modules/\.pnpm)(?:/|$)").expect("store pattern is valid")
    })
}

/// Store root embedded in `cwd`, e.g. `/p/node_modules/.pnpm` for
/// `/p/node_modules/.pnpm/jskit@1.0.0/node_modules/jskit`.
pub fn store_root(cwd: &Path) -> Option<PathBuf> {
    let cwd = cwd.to_string_lossy();
    store_pattern()
        .captures(&cwd)
        .and_then(|captures| captures.get(1))
        .map(|root| PathBuf::from(root.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MemoryProbe;
    use rstest::rstest;

    fn context<'a>(cwd: &str, search_path: Option<&str>, probe: &'a MemoryProbe) -> SearchContext<'a> {
        SearchContext::new(cwd, search_path.map(str::to_string), probe)
    }

    #[test]
    fn test_first_listed_root_wins() {
        let probe = MemoryProbe::with_files([
            "/b/node_modules/typescript/bin/tsc",
            "/c/node_modules/typescript/bin/tsc",
        ]);
        let ctx = context(
            "/project",
            Some("/a/node_modules:/b/node_modules:/c/node_modules"),
            &probe,
        );

        let resolved = resolve(&ctx, &"typescript/bin/tsc".into()).unwrap();
        assert_eq!(
            resolved.path(),
            Path::new("/b/node_modules/typescript/bin/tsc")
        );
    }

    #[test]
    fn test_search_path_beats_local_node_modules() {
        let probe = MemoryProbe::with_files([
            "/hoisted/node_modules/eslint/bin/eslint.js",
            "/project/node_modules/eslint/bin/eslint.js",
        ]);
        let ctx = context("/project", Some("/hoisted/node_modules"), &probe);

        let resolved = resolve(&ctx, &"eslint/bin/eslint.js".into()).unwrap();
        assert_eq!(
            resolved.path(),
            Path::new("/hoisted/node_modules/eslint/bin/eslint.js")
        );
    }

    #[test]
    fn test_unresolvable_spec_names_spec() {
        let probe = MemoryProbe::new();
        let ctx = context("/project", None, &probe);

        let err = resolve(&ctx, &"foo/bar".into()).unwrap_err();
        assert_eq!(err.spec, "foo/bar");
        assert!(err.to_string().contains("foo/bar"));
    }

    #[test]
    fn test_empty_search_path_falls_through() {
        let probe = MemoryProbe::with_files(["/project/node_modules/vite/bin/vite.js"]);
        let ctx = context("/project", Some(""), &probe);

        assert!(from_search_path(&ctx, &"vite/bin/vite.js".into()).is_none());
        let resolved = resolve(&ctx, &"vite/bin/vite.js".into()).unwrap();
        assert_eq!(
            resolved.path(),
            Path::new("/project/node_modules/vite/bin/vite.js")
        );
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let ctx_probe = MemoryProbe::with_files(["/b/typescript/bin/tsc"]);
        let ctx = context("/project", Some("::/b:"), &ctx_probe);

        assert_eq!(ctx.search_roots().collect::<Vec<_>>(), vec!["/b"]);
        assert_eq!(
            from_search_path(&ctx, &"typescript/bin/tsc".into()),
            Some(PathBuf::from("/b/typescript/bin/tsc"))
        );
    }

    #[test]
    fn test_store_picks_last_listed_entry_without_existence_check() {
        let probe = MemoryProbe::with_files([
            "/p/node_modules/.pnpm/typescript@5.3.3/node_modules/typescript/package.json",
            "/p/node_modules/.pnpm/typescript@5.4.2/node_modules/typescript/package.json",
            "/p/node_modules/.pnpm/typescript-eslint@8.0.0/node_modules/typescript-eslint/package.json",
        ]);
        let ctx = context(
            "/p/node_modules/.pnpm/jskit@0.1.0/node_modules/jskit",
            None,
            &probe,
        );

        let resolved = resolve(&ctx, &"typescript/bin/tsc".into()).unwrap();
        assert_eq!(
            resolved.path(),
            Path::new("/p/node_modules/.pnpm/typescript@5.4.2/node_modules/typescript/bin/tsc")
        );
        assert!(!probe.exists(resolved.path()));
    }

    #[test]
    fn test_store_does_not_confuse_package_prefixes() {
        let probe = MemoryProbe::with_files([
            "/p/node_modules/.pnpm/vite@5.1.0/node_modules/vite/bin/vite.js",
            "/p/node_modules/.pnpm/vitest@1.6.0/node_modules/vitest/vitest.mjs",
        ]);
        let ctx = context("/p/node_modules/.pnpm/jskit@0.1.0/node_modules/jskit", None, &probe);

        assert_eq!(
            from_package_store(&ctx, &"vite/bin/vite.js".into()),
            Some(PathBuf::from(
                "/p/node_modules/.pnpm/vite@5.1.0/node_modules/vite/bin/vite.js"
            ))
        );
    }

    #[test]
    fn test_store_scoped_package() {
        let probe = MemoryProbe::with_files([
            "/p/node_modules/.pnpm/@biomejs+biome@1.8.0/node_modules/@biomejs/biome/bin/biome",
        ]);
        let ctx = context("/p/node_modules/.pnpm", None, &probe);

        assert_eq!(
            from_package_store(&ctx, &"@biomejs/biome/bin/biome".into()),
            Some(PathBuf::from(
                "/p/node_modules/.pnpm/@biomejs+biome@1.8.0/node_modules/@biomejs/biome/bin/biome"
            ))
        );
    }

    #[test]
    fn test_store_without_match_falls_back_to_node_modules() {
        let probe = MemoryProbe::with_files([
            "/p/node_modules/.pnpm/react@18.3.1/node_modules/react/index.js",
            "/p/node_modules/.pnpm/jskit@0.1.0/node_modules/jskit/node_modules/eslint/bin/eslint.js",
        ]);
        let ctx = context("/p/node_modules/.pnpm/jskit@0.1.0/node_modules/jskit", None, &probe);

        let resolved = resolve(&ctx, &"eslint/bin/eslint.js".into()).unwrap();
        assert_eq!(
            resolved.path(),
            Path::new(
                "/p/node_modules/.pnpm/jskit@0.1.0/node_modules/jskit/node_modules/eslint/bin/eslint.js"
            )
        );
    }

    #[rstest]
    #[case("/p/node_modules/.pnpm/jskit@1.0.0/node_modules/jskit", Some("/p/node_modules/.pnpm"))]
    #[case("/p/node_modules/.pnpm", Some("/p/node_modules/.pnpm"))]
    #[case("/a/node_modules/.pnpm/x/node_modules/.pnpm/y", Some("/a/node_modules/.pnpm"))]
    #[case("/p/node_modules/.pnpmfoo", None)]
    #[case("/p/node_modules/jskit", None)]
    #[case("/p", None)]
    fn test_store_root(#[case] cwd: &str, #[case] expected: Option<&str>) {
        assert_eq!(store_root(Path::new(cwd)), expected.map(PathBuf::from));
    }

    #[rstest]
    #[case("typescript/bin/tsc", "typescript")]
    #[case("eslint", "eslint")]
    #[case("@biomejs/biome/bin/biome", "@biomejs/biome")]
    #[case("@scope/pkg", "@scope/pkg")]
    fn test_package_name(#[case] spec: &str, #[case] expected: &str) {
        assert_eq!(CommandSpec::new(spec).package_name(), expected);
    }

    #[test]
    fn test_command_line() {
        let resolved = ResolvedCommand(PathBuf::from("/p/node_modules/typescript/bin/tsc"));
        assert_eq!(
            resolved.command_line(&["--noEmit"]),
            "/p/node_modules/typescript/bin/tsc --noEmit"
        );
        assert_eq!(
            resolved.command_line::<&str>(&[]),
            "/p/node_modules/typescript/bin/tsc"
        );
    }
}
