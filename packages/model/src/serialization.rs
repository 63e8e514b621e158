//! # Serialized Records
//!
//! Flat, tagged records consumed by persistence, export and sync collaborators.
//!
//! Every record carries a `model` discriminator and the entity's own id.
//! Relationships are expressed as id references, never as inlined children,
//! so a whole project can be rebuilt in two passes:
//!
//! ```text
//! pass 1: instantiate every Element / ElementContent keyed by id
//! pass 2: resolve cross references and verify invariants
//! ```

use crate::element::{ElementRole, PropertyValue};
use crate::error::{ModelError, ModelResult};
use crate::ids::{ContentId, ElementId, PageId, PatternId, ProjectId, PropertyId, SlotId};
use crate::pattern::PatternLibrary;
use crate::project::FocusedItemType;
use crate::user_store::UserStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Discriminator identifying the kind of a serialized record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelTag {
    Element,
    ElementContent,
    Page,
    Project,
}

impl ModelTag {
    /// Fail unless `found` matches the expected record kind
    pub fn expect(self, found: ModelTag) -> ModelResult<()> {
        if self == found {
            Ok(())
        } else {
            Err(ModelError::UnexpectedModel {
                expected: self,
                found,
            })
        }
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelTag::Element => "Element",
            ModelTag::ElementContent => "ElementContent",
            ModelTag::Page => "Page",
            ModelTag::Project => "Project",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedElement {
    pub model: ModelTag,
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub edited_name: String,
    #[serde(default)]
    pub name_editable: bool,
    pub pattern_id: PatternId,
    pub role: ElementRole,
    #[serde(default)]
    pub container_id: Option<ContentId>,
    #[serde(default)]
    pub content_ids: Vec<ContentId>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub dragged: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub placeholder_highlighted: bool,
    #[serde(default)]
    pub property_values: BTreeMap<PropertyId, PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedElementContent {
    pub model: ModelTag,
    pub id: ContentId,
    #[serde(default)]
    pub element_ids: Vec<ElementId>,
    pub slot_id: SlotId,
    pub parent_element_id: ElementId,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub forced_open: bool,
    #[serde(default)]
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPage {
    pub model: ModelTag,
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub edited_name: String,
    #[serde(default)]
    pub name_editable: bool,
    pub root_id: ElementId,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedProject {
    pub model: ModelTag,
    pub id: ProjectId,
    pub name: String,
    pub elements: Vec<SerializedElement>,
    pub element_contents: Vec<SerializedElementContent>,
    pub pages: Vec<SerializedPage>,
    #[serde(default)]
    pub pattern_libraries: Vec<PatternLibrary>,
    #[serde(default)]
    pub user_store: UserStore,
    #[serde(default)]
    pub focused_item_type: FocusedItemType,
}

impl SerializedProject {
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let record: SerializedProject = serde_json::from_str(json)?;
        ModelTag::Project.expect(record.model)?;
        Ok(record)
    }

    pub fn to_json_string(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_tag_serializes_as_name() {
        let json = serde_json::to_string(&ModelTag::ElementContent).unwrap();
        assert_eq!(json, "\"ElementContent\"");
    }

    #[test]
    fn test_expect_rejects_other_model() {
        assert!(ModelTag::Page.expect(ModelTag::Page).is_ok());

        let err = ModelTag::Page.expect(ModelTag::Element).unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnexpectedModel {
                expected: ModelTag::Page,
                found: ModelTag::Element
            }
        ));
    }

    #[test]
    fn test_content_record_defaults_transient_flags() {
        let json = r#"{
            "model": "ElementContent",
            "id": "c1",
            "slotId": "s1",
            "parentElementId": "e1"
        }"#;

        let record: SerializedElementContent = serde_json::from_str(json).unwrap();
        assert!(record.element_ids.is_empty());
        assert!(!record.open);
        assert!(!record.highlighted);
    }

    #[test]
    fn test_missing_name_editable_matches_fresh_entities() {
        let json = r#"{
            "model": "Page",
            "id": "p1",
            "name": "Home",
            "rootId": "e1"
        }"#;

        let record: SerializedPage = serde_json::from_str(json).unwrap();
        assert!(!record.name_editable);

        let mut project = crate::project::Project::new("Test");
        let page = project.create_page("Home").unwrap();
        assert_eq!(record.name_editable, page.name_editable());
        let root = project.element(page.root_id()).unwrap();
        assert!(!root.name_editable());
    }

    #[test]
    fn test_project_from_json_checks_model_tag() {
        let json = r#"{
            "model": "Page",
            "id": "p",
            "name": "Project",
            "elements": [],
            "elementContents": [],
            "pages": []
        }"#;

        assert!(SerializedProject::from_json(json).is_err());
    }
}
