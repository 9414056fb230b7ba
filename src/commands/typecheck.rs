use super::{Context, TSC};
use anyhow::Result;

pub const ARGS: &[&str] = &["--noEmit"];

pub fn execute(context: &Context) -> Result<()> {
    context.run_tool(TSC, ARGS)
}
