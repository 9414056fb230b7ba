use super::Context;
use crate::ui;
use anyhow::Result;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn execute(context: &Context) -> Result<()> {
    let control = context.control_file()?;
    let plugins = control.eslint_plugins.enabled();

    ui::info(format!("Project: {}", control.working_directory_path.display()));
    ui::info(format!("Type: {}", control.project_type));
    ui::info(format!(
        "ESLint plugins: {}",
        if plugins.is_empty() {
            "none".to_string()
        } else {
            plugins.join(", ")
        }
    ));
    ui::info(format!("Test directory: {}", yes_no(control.has_test_directory)));
    ui::info(format!(
        "Cypress directory: {}",
        yes_no(control.has_cypress_directory)
    ));
    Ok(())
}
