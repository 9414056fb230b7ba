use super::{Context, TSC, VITE};
use crate::resolver::ResolvedCommand;
use crate::runner::{self, RunOptions};
use crate::ui;
use anyhow::{Context as _, Result};

const WATCH_ARGS: &[&str] = &["--noEmit", "--watch", "--preserveWatchOutput"];

/// Dev server and type-checker side by side until either stops or Ctrl-C.
pub fn execute(context: &Context) -> Result<()> {
    let vite = context.resolve(VITE)?;
    let tsc = context.resolve(TSC)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(serve(vite, tsc, context.inherited()))
}

async fn serve(vite: ResolvedCommand, tsc: ResolvedCommand, options: RunOptions) -> Result<()> {
    let dev_server = vite.command_line::<&str>(&[]);
    let checker = tsc.command_line(WATCH_ARGS);

    ui::status("Starting", "Vite dev server and TypeScript watcher");
    tokio::select! {
        result = runner::run_async(&dev_server, options.clone()) => {
            result?;
            ui::info("Dev server stopped");
        }
        result = runner::run_async(&checker, options) => {
            result?;
            ui::info("Type-checker stopped");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            ui::info("Interrupted, shutting down");
        }
    }
    Ok(())
}
