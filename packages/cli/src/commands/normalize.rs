use super::write_project;
use crate::config::Config;
use alva_model::Project;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Project file to rewrite
    pub input: PathBuf,

    /// Write here instead of overwriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Load a project and write it back in canonical form
pub fn normalize(args: NormalizeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = cwd.join(&args.input);
    let output = args
        .output
        .map(|output| cwd.join(output))
        .unwrap_or_else(|| input.clone());

    let project = Project::load(&input)?;
    write_project(&project, &config, &output)?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        input.display(),
        output.display()
    );
    Ok(())
}
