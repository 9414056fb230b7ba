use super::{test, typecheck, Context, ESLINT, STYLELINT, TSC, VITEST};
use crate::error::RunError;
use crate::ui::{self, Progress};
use anyhow::{bail, Result};

struct Step {
    name: &'static str,
    spec: &'static str,
    args: Vec<String>,
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

fn steps(context: &Context) -> Result<Vec<Step>> {
    let settings = context.settings()?;

    let mut steps = vec![
        Step {
            name: "typecheck",
            spec: TSC,
            args: owned(typecheck::ARGS),
        },
        Step {
            name: "lint",
            spec: ESLINT,
            args: vec!["--max-warnings".into(), "0".into(), settings.lint.target],
        },
    ];

    if context.resolve(STYLELINT).is_ok() {
        steps.push(Step {
            name: "lint-styles",
            spec: STYLELINT,
            args: vec![settings.lint.styles],
        });
    } else {
        ui::info("Stylelint is not installed; skipping stylesheet lint");
    }

    match context.control_file() {
        Ok(control) if control.eslint_plugins.vitest => steps.push(Step {
            name: "test",
            spec: VITEST,
            args: owned(test::ARGS),
        }),
        Ok(_) => {}
        Err(err) => ui::warn(format!("Skipping unit tests: {err:#}")),
    }

    Ok(steps)
}

fn failure_output(err: &RunError) -> String {
    match err {
        RunError::Exit { stdout, stderr, .. } => [stdout.as_str(), stderr.as_str()]
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// Run every check in order, stopping at the first failure.
pub fn execute(context: &Context) -> Result<()> {
    for step in steps(context)? {
        let command = context.resolve(step.spec)?;
        let args: Vec<&str> = step.args.iter().map(String::as_str).collect();

        let progress = Progress::new("Running", step.name);
        match context.capture_tool(&command, &args) {
            Ok(_) => progress.success("Passed"),
            Err(err) => {
                let output = failure_output(&err);
                match err.exit_code() {
                    Some(code) => progress.fail("Failed", format!("exit code {code}")),
                    None => progress.fail("Failed", &err),
                }
                if !output.is_empty() {
                    ui::error(output);
                }
                bail!("validation failed at `{}`", step.name);
            }
        }
    }

    ui::success("Validated", context.project().root().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_output_joins_streams() {
        let err = RunError::Exit {
            program: "tsc".into(),
            code: Some(2),
            stdout: "src/a.ts(1,1): error TS2304".into(),
            stderr: String::new(),
        };
        assert_eq!(failure_output(&err), "src/a.ts(1,1): error TS2304");

        assert_eq!(failure_output(&RunError::Empty), "");
    }
}
