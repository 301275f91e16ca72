use std::fs;
use std::path::PathBuf;

use clap::Args;
use scrollchor_core::presets::showcase_page;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Default, Args)]
pub struct BuiltinArgs {
    /// Write the definition here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Dump the built-in showcase page as a definition JSON, a starting point
/// for hand-written pages.
pub fn run_builtin(args: BuiltinArgs) -> Result<()> {
    let json = serde_json::to_string_pretty(&showcase_page())?;
    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, format!("{json}\n"))?;
            info!(path = %path.display(), "wrote showcase definition");
        }
        None => println!("{json}"),
    }
    Ok(())
}
