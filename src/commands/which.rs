use super::Context;
use anyhow::Result;

pub fn execute(context: &Context, command: &str) -> Result<()> {
    let resolved = context.resolve(command)?;
    println!("{resolved}");
    Ok(())
}
