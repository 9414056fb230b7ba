use crate::error::{Error, Result};
use crate::settings::HookSettings;
use crate::writers::{self, FileChange, NOTICE};
use git2::{ErrorCode, Repository};
use std::fs;
use std::path::{Path, PathBuf};

const PRE_COMMIT: &str = "pre-commit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Installed(FileChange),
    Skipped(String),
}

pub fn render_pre_commit(command: &str) -> String {
    format!("#!/bin/sh\n# {NOTICE}\nexec {command}\n")
}

/// Install the pre-commit hook in the repository containing `root`.
pub fn install(root: &Path, settings: &HookSettings) -> Result<HookOutcome> {
    if !settings.enabled {
        return Ok(HookOutcome::Skipped("git hooks are disabled in jskit.toml".into()));
    }

    let repo = match Repository::discover(root) {
        Ok(repo) => repo,
        Err(err) if err.code() == ErrorCode::NotFound => {
            tracing::debug!("{} is not inside a git repository", root.display());
            return Ok(HookOutcome::Skipped("not a git repository".into()));
        }
        Err(err) => return Err(Error::Hooks(err)),
    };

    let path = hooks_dir(&repo)?.join(PRE_COMMIT);
    tracing::debug!("Installing {} hook at {}", PRE_COMMIT, path.display());

    let change = writers::write_managed(&path, &render_pre_commit(&settings.pre_commit))?;
    make_executable(&path)?;
    Ok(HookOutcome::Installed(change))
}

/// `core.hooksPath` when set (relative to the work tree), else `.git/hooks`.
fn hooks_dir(repo: &Repository) -> Result<PathBuf> {
    let configured = match repo.config()?.get_path("core.hooksPath") {
        Ok(path) => Some(path),
        Err(err) if err.code() == ErrorCode::NotFound => None,
        Err(err) => return Err(Error::Hooks(err)),
    };

    Ok(match configured {
        Some(path) if path.is_absolute() => path,
        Some(path) => repo.workdir().unwrap_or_else(|| repo.path()).join(path),
        None => repo.path().join("hooks"),
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|err| Error::io("failed to set permissions on", path, err))
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> Result<()> {
    fs::metadata(path)
        .map(|_| ())
        .map_err(|err| Error::io("failed to read", path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::Change;
    use tempfile::TempDir;

    #[test]
    fn test_outside_repository_is_skipped() {
        let temp = TempDir::new().unwrap();
        // Guard against a repository above the temp dir
        if Repository::discover(temp.path()).is_ok() {
            return;
        }

        let outcome = install(temp.path(), &HookSettings::default()).unwrap();
        assert_eq!(outcome, HookOutcome::Skipped("not a git repository".into()));
    }

    #[test]
    fn test_disabled_hooks_are_skipped() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let settings = HookSettings {
            enabled: false,
            ..HookSettings::default()
        };
        assert!(matches!(
            install(temp.path(), &settings).unwrap(),
            HookOutcome::Skipped(_)
        ));
        assert!(!temp.path().join(".git/hooks/pre-commit").exists());
    }

    #[test]
    fn test_installs_pre_commit_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let app = temp.path().join("packages/app");
        fs::create_dir_all(&app).unwrap();

        let outcome = install(&app, &HookSettings::default()).unwrap();
        let hook = temp.path().join(".git/hooks/pre-commit");
        match outcome {
            HookOutcome::Installed(change) => {
                assert_eq!(change.change, Change::Created);
                assert_eq!(fs::canonicalize(change.path).unwrap(), fs::canonicalize(&hook).unwrap());
            }
            other => panic!("expected an installed hook, got {other:?}"),
        }

        let script = fs::read_to_string(&hook).unwrap();
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("exec npx --no-install jskit validate"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&hook).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_hand_written_hook_is_backed_up() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let hooks = temp.path().join(".git/hooks");
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("pre-commit"), "#!/bin/sh\nmake lint\n").unwrap();

        let settings = HookSettings {
            pre_commit: "npm test".into(),
            ..HookSettings::default()
        };
        let outcome = install(temp.path(), &settings).unwrap();
        assert!(matches!(
            outcome,
            HookOutcome::Installed(FileChange {
                change: Change::Replaced { .. },
                ..
            })
        ));
        assert_eq!(
            fs::read_to_string(hooks.join("pre-commit_backup")).unwrap(),
            "#!/bin/sh\nmake lint\n"
        );

        let again = install(temp.path(), &settings).unwrap();
        assert!(matches!(
            again,
            HookOutcome::Installed(FileChange {
                change: Change::Unchanged,
                ..
            })
        ));
    }

    #[test]
    fn test_honors_core_hooks_path() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.config()
            .unwrap()
            .set_str("core.hooksPath", ".githooks")
            .unwrap();

        let outcome = install(temp.path(), &HookSettings::default()).unwrap();
        assert!(matches!(outcome, HookOutcome::Installed(_)));
        assert!(temp.path().join(".githooks/pre-commit").exists());
        assert!(!temp.path().join(".git/hooks/pre-commit").exists());
    }
}
