use crate::config::PROJECT_EXTENSION;
use alva_model::{ModelError, Project};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project file or directory of project files
    pub input: PathBuf,

    /// Also list files without problems
    #[arg(short, long)]
    pub all: bool,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let input = cwd.join(&args.input);

    let files = if input.is_file() {
        vec![input]
    } else if input.is_dir() {
        find_project_files(&input)
    } else {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    };

    let mut failed = 0;
    for file in &files {
        if !check_file(file, args.all) {
            failed += 1;
        }
    }

    println!();
    println!("   Files checked: {}", files.len());
    if failed > 0 {
        return Err(anyhow!("{} of {} project file(s) are invalid", failed, files.len()));
    }

    println!("   {} No issues found!", "✓".green());
    Ok(())
}

/// Print problems with one file; true when it loads cleanly
fn check_file(path: &Path, list_clean: bool) -> bool {
    match Project::load(path) {
        Ok(project) => {
            if list_clean {
                println!(
                    "{} {} ({} pages, {} elements)",
                    "✓".green(),
                    path.display(),
                    project.pages().len(),
                    project.element_count()
                );
            }
            true
        }
        Err(ModelError::Integrity(violations)) => {
            println!("{}", path.display());
            for violation in &violations {
                println!("  {} {}", "error".red().bold(), violation);
            }
            false
        }
        Err(err) => {
            println!("{}", path.display());
            println!("  {} {}", "error".red().bold(), err);
            false
        }
    }
}

fn find_project_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == PROJECT_EXTENSION))
        .collect()
}
