use super::{Context, ESLINT};
use anyhow::Result;

pub fn execute(context: &Context, target: Option<String>) -> Result<()> {
    let target = match target {
        Some(target) => target,
        None => context.settings()?.lint.target,
    };
    context.run_tool(ESLINT, &["--max-warnings", "0", &target])
}
