//! aksara CLI binary entry point
//!
//! This is a thin wrapper that calls the library's `run_cli()` function.

use aksara_cli::run_cli;
use anyhow::Result;

fn main() -> Result<()> {
    run_cli()
}
