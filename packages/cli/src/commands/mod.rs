pub mod check;
pub mod init;
pub mod inspect;
pub mod new;
pub mod normalize;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use new::{new, NewArgs};
pub use normalize::{normalize, NormalizeArgs};

use crate::config::Config;
use alva_model::Project;
use std::path::Path;

/// Serialized text of a project as the config says it should be written
pub(crate) fn project_text(project: &Project, config: &Config) -> anyhow::Result<String> {
    let record = if config.strip_transient_on_save {
        project.to_disk_form()
    } else {
        project.to_json()
    };
    Ok(record.to_json_string()?)
}

pub(crate) fn write_project(project: &Project, config: &Config, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, project_text(project, config)?)?;
    Ok(())
}
