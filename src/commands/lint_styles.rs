use super::{Context, STYLELINT};
use anyhow::Result;

pub fn execute(context: &Context, glob: Option<String>) -> Result<()> {
    let glob = match glob {
        Some(glob) => glob,
        None => context.settings()?.lint.styles,
    };
    context.run_tool(STYLELINT, &[&glob])
}
