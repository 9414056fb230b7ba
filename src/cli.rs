use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jskit - one toolchain for JavaScript and TypeScript projects
///
/// jskit generates and keeps the project's Vite, TypeScript, ESLint and
/// Stylelint configuration in sync, then runs those tools from whichever
/// `node_modules` layout the project uses (npm, pnpm, or a shared NODE_PATH).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Colon-separated directories searched for tool packages first
    #[arg(long, global = true, env = "NODE_PATH", value_name = "PATHS")]
    pub search_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate tool configuration and record what was detected
    ///
    /// Writes vite.config.ts, tsconfig.json, .stylelintrc.json,
    /// eslint.config.mjs and a git pre-commit hook, then the control file.
    /// Files jskit did not generate are kept as `<name>_backup`.
    Init,

    /// Lint sources with ESLint
    Lint {
        /// File or directory to lint (default from jskit.toml, else `src`)
        #[arg(value_name = "TARGET")]
        target: Option<String>,
    },

    /// Lint stylesheets with Stylelint
    LintStyles {
        /// Glob of stylesheets (default from jskit.toml, else `src/**/*.css`)
        #[arg(value_name = "GLOB")]
        glob: Option<String>,
    },

    /// Type-check with the TypeScript compiler
    Typecheck,

    /// Run unit tests with Vitest
    Test,

    /// Run end-to-end tests with Cypress
    E2e,

    /// Type-check, then build for production with Vite
    Build,

    /// Start the Vite dev server with a type-checker in watch mode
    Start,

    /// Type-check, lint and test in one pass (used by the pre-commit hook)
    Validate,

    /// Print where a tool command resolves to
    Which {
        /// Command spec, e.g. `vite/bin/vite.js`
        #[arg(value_name = "COMMAND")]
        command: String,
    },

    /// Show the recorded project configuration
    Status,
}
