use super::{typecheck, Context, VITE};
use crate::ui;
use anyhow::Result;

pub fn execute(context: &Context) -> Result<()> {
    ui::status("Checking", "types");
    typecheck::execute(context)?;

    ui::status("Building", context.project().root().display());
    context.run_tool(VITE, &["build"])?;
    ui::success("Built", "production bundle");
    Ok(())
}
