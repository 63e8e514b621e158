use super::write_project;
use crate::config::{Config, PROJECT_EXTENSION};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project file to create
    pub output: PathBuf,

    /// Project name (defaults to the file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Name of the first page (defaults to the configured page name)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Force overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;

    let mut output = cwd.join(&args.output);
    if output.extension().is_none() {
        output.set_extension(PROJECT_EXTENSION);
    }
    if output.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists, use --force to overwrite",
            output.display()
        ));
    }

    let name = match args.name {
        Some(name) => name,
        None => output
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("Cannot derive a project name from {}", output.display()))?,
    };
    let page = args.page.unwrap_or(config.default_page_name.clone());

    let project = alva_model::Project::with_page(&name, &page);
    write_project(&project, &config, &output)?;

    info!(path = %output.display(), "Created project");
    println!(
        "  {} Created {} with page {}",
        "✓".green(),
        output.display(),
        page.bright_white()
    );
    Ok(())
}
