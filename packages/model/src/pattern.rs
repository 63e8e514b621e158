//! Pattern library references.
//!
//! Patterns come from connected component libraries and are analyzed outside
//! this crate. The model only needs enough of them to instantiate elements:
//! the pattern's kind and the slots it declares.

use crate::ids::{LibraryId, PatternId, SlotId};
use serde::{Deserialize, Serialize};

pub const BUILTIN_LIBRARY_ID: &str = "builtin";
pub const BUILTIN_PAGE_PATTERN_ID: &str = "builtin:page";
pub const BUILTIN_PAGE_CHILDREN_SLOT_ID: &str = "builtin:page:children";
pub const BUILTIN_BOX_PATTERN_ID: &str = "builtin:box";
pub const BUILTIN_BOX_CHILDREN_SLOT_ID: &str = "builtin:box:children";
pub const BUILTIN_TEXT_PATTERN_ID: &str = "builtin:text";
pub const BUILTIN_PLACEHOLDER_PATTERN_ID: &str = "builtin:placeholder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotType {
    /// Insertion point for child elements
    Children,
    /// Element-valued property
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Root pattern of every page
    Page,
    Component,
    Text,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSlot {
    pub id: SlotId,
    pub name: String,
    pub slot_type: SlotType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: PatternId,
    pub name: String,
    pub kind: PatternKind,
    #[serde(default)]
    pub slots: Vec<PatternSlot>,
}

impl Pattern {
    pub fn slot(&self, id: &SlotId) -> Option<&PatternSlot> {
        self.slots.iter().find(|slot| &slot.id == id)
    }

    pub fn slot_by_type(&self, slot_type: SlotType) -> Option<&PatternSlot> {
        self.slots.iter().find(|slot| slot.slot_type == slot_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternLibrary {
    pub id: LibraryId,
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

impl PatternLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LibraryId::new(),
            name: name.into(),
            patterns: Vec::new(),
        }
    }

    /// Library shipped with every project: page root, box, text and placeholder
    pub fn builtin() -> Self {
        let children = |id: &str| PatternSlot {
            id: SlotId::from(id),
            name: "Children".to_string(),
            slot_type: SlotType::Children,
        };

        Self {
            id: LibraryId::from(BUILTIN_LIBRARY_ID),
            name: "Built-in Components".to_string(),
            patterns: vec![
                Pattern {
                    id: PatternId::from(BUILTIN_PAGE_PATTERN_ID),
                    name: "Page".to_string(),
                    kind: PatternKind::Page,
                    slots: vec![children(BUILTIN_PAGE_CHILDREN_SLOT_ID)],
                },
                Pattern {
                    id: PatternId::from(BUILTIN_BOX_PATTERN_ID),
                    name: "Box".to_string(),
                    kind: PatternKind::Component,
                    slots: vec![children(BUILTIN_BOX_CHILDREN_SLOT_ID)],
                },
                Pattern {
                    id: PatternId::from(BUILTIN_TEXT_PATTERN_ID),
                    name: "Text".to_string(),
                    kind: PatternKind::Text,
                    slots: Vec::new(),
                },
                Pattern {
                    id: PatternId::from(BUILTIN_PLACEHOLDER_PATTERN_ID),
                    name: "Placeholder".to_string(),
                    kind: PatternKind::Placeholder,
                    slots: Vec::new(),
                },
            ],
        }
    }

    pub fn pattern(&self, id: &PatternId) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| &pattern.id == id)
    }

    pub fn pattern_by_kind(&self, kind: PatternKind) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.kind == kind)
    }

    pub fn add_pattern(&mut self, pattern: Pattern) {
        self.patterns.retain(|existing| existing.id != pattern.id);
        self.patterns.push(pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library_has_page_root() {
        let library = PatternLibrary::builtin();
        let page = library.pattern_by_kind(PatternKind::Page).unwrap();

        assert_eq!(page.id.as_str(), BUILTIN_PAGE_PATTERN_ID);
        assert_eq!(page.slots.len(), 1);
        assert!(page.slot_by_type(SlotType::Children).is_some());
        assert!(page.slot_by_type(SlotType::Property).is_none());
    }

    #[test]
    fn test_add_pattern_replaces_same_id() {
        let mut library = PatternLibrary::new("Custom");
        let pattern = Pattern {
            id: PatternId::from("card"),
            name: "Card".to_string(),
            kind: PatternKind::Component,
            slots: Vec::new(),
        };

        library.add_pattern(pattern.clone());
        library.add_pattern(Pattern {
            name: "Card v2".to_string(),
            ..pattern
        });

        assert_eq!(library.patterns.len(), 1);
        assert_eq!(library.patterns[0].name, "Card v2");
    }
}
