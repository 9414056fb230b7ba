use super::{Context, CYPRESS};
use crate::ui;
use anyhow::Result;

pub fn execute(context: &Context) -> Result<()> {
    let control = context.control_file()?;
    if !control.eslint_plugins.cypress {
        ui::info("Cypress is not a dependency of this project; no end-to-end tests to run");
        return Ok(());
    }
    if !control.has_cypress_directory {
        ui::info("No cypress directory found; no end-to-end tests to run");
        return Ok(());
    }
    context.run_tool(CYPRESS, &["run"])
}
