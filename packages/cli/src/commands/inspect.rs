use alva_model::{Element, Project};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Project file to inspect
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    name: String,
    element_count: usize,
    content_count: usize,
    pattern_libraries: usize,
    pages: Vec<PageSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageSummary {
    id: String,
    name: String,
    active: bool,
    elements: usize,
}

impl Summary {
    fn of(project: &Project) -> Self {
        let pages = project
            .pages()
            .iter()
            .map(|page| PageSummary {
                id: page.id().to_string(),
                name: page.name().to_string(),
                active: page.is_active(),
                elements: page
                    .root(project)
                    .map_or(0, |root| root.descendants(project).len() + 1),
            })
            .collect();

        Self {
            name: project.name().to_string(),
            element_count: project.element_count(),
            content_count: project.content_count(),
            pattern_libraries: project.pattern_libraries().len(),
            pages,
        }
    }
}

pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let project = Project::load(cwd.join(&args.input))?;
    let summary = Summary::of(&project);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_text(&project, &summary),
        other => return Err(anyhow!("Unknown format: {}. Use: text or json", other)),
    }

    Ok(())
}

fn print_text(project: &Project, summary: &Summary) {
    println!("{} {}", "Project".bold(), summary.name.bright_white());
    println!("   Elements: {}", summary.element_count);
    println!("   Contents: {}", summary.content_count);
    println!("   Pattern libraries: {}", summary.pattern_libraries);
    println!();

    for page in project.pages() {
        let marker = if page.is_active() { "●".green() } else { "○".dimmed() };
        println!("{} {}", marker, page.name().bold());
        if let Some(root) = page.root(project) {
            print_tree(project, root, 1);
        }
        println!();
    }
}

fn print_tree(project: &Project, element: &Element, depth: usize) {
    let pattern = element
        .pattern(project)
        .map_or_else(|| element.pattern_id().to_string(), |pattern| pattern.name.clone());
    println!(
        "{}{} {}",
        "  ".repeat(depth),
        element.name(),
        format!("[{}]", pattern).dimmed()
    );

    for content in element.contents(project) {
        for child in content.elements(project) {
            print_tree(project, child, depth + 1);
        }
    }
}
