use super::Context;
use crate::hooks::HookOutcome;
use crate::init::{self, InitOutcome, InstallSignal};
use crate::ui;
use crate::writers::Change;
use anyhow::Result;

pub fn execute(context: &Context) -> Result<()> {
    let signal = InstallSignal::from_env();
    let report = match init::run(context.project().root(), &signal) {
        Ok(report) => report,
        Err(failure) => {
            for change in &failure.changes {
                ui::status("Wrote", change);
            }
            return Err(failure.into());
        }
    };

    let control = match report.outcome {
        InitOutcome::Skipped(reason) => {
            ui::info(format!("Nothing to do: {reason}"));
            return Ok(());
        }
        InitOutcome::Completed(control) => control,
    };

    for change in &report.changes {
        match change.change {
            Change::Unchanged => ui::status("Unchanged", change.path.display()),
            Change::Replaced { .. } | Change::BackedUp { .. } => ui::warn(change),
            _ => ui::status("Wrote", change),
        }
    }

    match &report.hooks {
        Some(HookOutcome::Installed(change)) => ui::status("Hook", change),
        Some(HookOutcome::Skipped(reason)) => ui::info(format!("Skipped git hooks: {reason}")),
        None => {}
    }

    let plugins = control.eslint_plugins.enabled();
    let plugins = if plugins.is_empty() {
        "none".to_string()
    } else {
        plugins.join(", ")
    };
    ui::success(
        "Initialized",
        format!(
            "{} ({} project, ESLint plugins: {plugins})",
            report.root.display(),
            control.project_type
        ),
    );
    Ok(())
}
