//! Loading and saving projects as JSON files.
//!
//! Files hold the disk form: the same flat records as [`Project::to_json`],
//! minus session-local flags such as selection or drag state.

use crate::error::{ModelError, ModelResult};
use crate::project::Project;
use crate::serialization::SerializedProject;
use std::path::{Path, PathBuf};
use tracing::info;

impl Project {
    /// Load a project file, remembering its path for later saves
    pub fn load(path: impl Into<PathBuf>) -> ModelResult<Self> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)?;
        let mut project = Self::from_serialized(SerializedProject::from_json(&source)?)?;

        info!(
            path = %path.display(),
            pages = project.pages().len(),
            elements = project.element_count(),
            "Loaded project"
        );
        project.path = Some(path);
        Ok(project)
    }

    /// Save to the path the project was loaded from or last saved to
    pub fn save(&self) -> ModelResult<()> {
        let path = self.path().ok_or(ModelError::NotFileBacked)?;
        self.write_disk_form(path)
    }

    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> ModelResult<()> {
        let path = path.into();
        self.write_disk_form(&path)?;
        self.path = Some(path);
        Ok(())
    }

    pub fn to_disk_string(&self) -> ModelResult<String> {
        self.to_disk_form().to_json_string()
    }

    fn write_disk_form(&self, path: &Path) -> ModelResult<()> {
        std::fs::write(path, self.to_disk_string()?)?;
        info!(path = %path.display(), "Saved project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_requires_path() {
        let project = Project::with_page("Test", "Home");
        assert!(matches!(project.save(), Err(ModelError::NotFileBacked)));
    }

    #[test]
    fn test_save_and_load_strip_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.alva");

        let mut project = Project::with_page("Test", "Home");
        let root = project.pages()[0].root_id().clone();
        project.set_selected_element(Some(&root));
        project.save_as(&path).unwrap();

        let loaded = Project::load(&path).unwrap();
        assert_eq!(loaded.path(), Some(path.as_path()));
        assert_eq!(loaded.name(), "Test");
        assert_eq!(loaded.pages().len(), 1);
        assert!(loaded.selected_element().is_none());
        assert!(loaded.element(&root).is_some());
        assert!(loaded.active_page().is_some());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.alva");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Project::load(&path), Err(ModelError::Json(_))));
    }
}
