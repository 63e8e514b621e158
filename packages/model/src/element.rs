//! # Elements
//!
//! Structural nodes instantiated from patterns.
//!
//! An element never holds pointers to its relatives. Its container and the
//! contents it owns are id references resolved through the owning
//! [`Project`], so tree shape is always derived at query time:
//!
//! ```text
//! Element ──content_ids──▶ ElementContent ──element_ids──▶ Element ...
//!    ▲                         │
//!    └──────container_id───────┘
//! ```
//!
//! Mutations go through `Project` methods so every change is recorded for
//! subscribers and the single-selection invariant is upheld in one step.

use crate::changes::Change;
use crate::element_content::ElementContent;
use crate::error::ModelResult;
use crate::ids::{ContentId, ElementId, PatternId, PropertyId, SlotId};
use crate::page::Page;
use crate::pattern::{Pattern, PatternKind, SlotType};
use crate::project::Project;
use crate::serialization::{ModelTag, SerializedElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementRole {
    /// Root of a page tree, never contained
    Root,
    Node,
}

/// Value of an element property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Number(f64),
    String(String),
    StringList(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) name: String,
    pub(crate) edited_name: String,
    pub(crate) name_editable: bool,
    pub(crate) pattern_id: PatternId,
    pub(crate) role: ElementRole,
    pub(crate) container_id: Option<ContentId>,
    pub(crate) content_ids: Vec<ContentId>,
    pub(crate) selected: bool,
    pub(crate) highlighted: bool,
    pub(crate) dragged: bool,
    pub(crate) open: bool,
    pub(crate) focused: bool,
    pub(crate) placeholder_highlighted: bool,
    pub(crate) property_values: BTreeMap<PropertyId, PropertyValue>,
}

impl Element {
    pub(crate) fn new(pattern: &Pattern, role: ElementRole) -> Self {
        Self {
            id: ElementId::new(),
            name: pattern.name.clone(),
            edited_name: pattern.name.clone(),
            name_editable: false,
            pattern_id: pattern.id.clone(),
            role,
            container_id: None,
            content_ids: Vec::new(),
            selected: false,
            highlighted: false,
            dragged: false,
            open: false,
            focused: false,
            placeholder_highlighted: false,
            property_values: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name buffer while the user is editing; committed through a rename
    pub fn edited_name(&self) -> &str {
        &self.edited_name
    }

    pub fn name_editable(&self) -> bool {
        self.name_editable
    }

    pub fn pattern_id(&self) -> &PatternId {
        &self.pattern_id
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    pub fn container_id(&self) -> Option<&ContentId> {
        self.container_id.as_ref()
    }

    pub fn content_ids(&self) -> &[ContentId] {
        &self.content_ids
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_dragged(&self) -> bool {
        self.dragged
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_placeholder_highlighted(&self) -> bool {
        self.placeholder_highlighted
    }

    pub fn property_value(&self, property_id: &PropertyId) -> Option<&PropertyValue> {
        self.property_values.get(property_id)
    }

    pub fn property_values(&self) -> &BTreeMap<PropertyId, PropertyValue> {
        &self.property_values
    }

    pub fn container<'p>(&self, project: &'p Project) -> Option<&'p ElementContent> {
        self.container_id
            .as_ref()
            .and_then(|id| project.element_content(id))
    }

    /// Owning element of the container, absent at a tree root
    pub fn parent<'p>(&self, project: &'p Project) -> Option<&'p Element> {
        self.container(project)
            .and_then(|content| project.element(content.parent_element_id()))
    }

    /// Position within the container
    pub fn index(&self, project: &Project) -> Option<usize> {
        self.container(project)?.index_of(&self.id)
    }

    pub fn pattern<'p>(&self, project: &'p Project) -> Option<&'p Pattern> {
        project.pattern(&self.pattern_id)
    }

    pub fn contents<'p>(&self, project: &'p Project) -> Vec<&'p ElementContent> {
        self.content_ids
            .iter()
            .filter_map(|id| project.element_content(id))
            .collect()
    }

    pub fn content_by_slot_id<'p>(
        &self,
        project: &'p Project,
        slot_id: &SlotId,
    ) -> Option<&'p ElementContent> {
        self.contents(project)
            .into_iter()
            .find(|content| content.slot_id() == slot_id)
    }

    pub fn content_by_slot_type<'p>(
        &self,
        project: &'p Project,
        slot_type: SlotType,
    ) -> Option<&'p ElementContent> {
        let slot = self.pattern(project)?.slot_by_type(slot_type)?;
        self.content_by_slot_id(project, &slot.id)
    }

    /// Direct children across all owned contents, in slot then element order
    pub fn children<'p>(&self, project: &'p Project) -> Vec<&'p Element> {
        child_ids(project, &self.content_ids)
            .into_iter()
            .filter_map(|id| project.element(id))
            .collect()
    }

    /// Pre-order traversal of everything below this element, excluding itself
    pub fn descendants<'p>(&self, project: &'p Project) -> Vec<&'p Element> {
        let mut result = Vec::new();
        let mut stack = child_ids(project, &self.content_ids);
        stack.reverse();

        while let Some(id) = stack.pop() {
            let Some(element) = project.element(id) else {
                continue;
            };
            result.push(element);

            let mut children = child_ids(project, &element.content_ids);
            children.reverse();
            stack.extend(children);
        }

        result
    }

    /// Parent chain from the direct parent up to the tree root
    pub fn ancestors<'p>(&self, project: &'p Project) -> Vec<&'p Element> {
        let mut result = Vec::new();
        let mut current = self.parent(project);

        // Bounded so corrupted input cannot loop forever
        while let Some(parent) = current {
            if result.len() > project.element_count() {
                break;
            }
            result.push(parent);
            current = parent.parent(project);
        }

        result
    }

    pub fn is_ancestor_of(&self, project: &Project, other: &ElementId) -> bool {
        project.element(other).is_some_and(|element| {
            element
                .ancestors(project)
                .iter()
                .any(|ancestor| ancestor.id == self.id)
        })
    }

    /// Page whose root tree contains this element
    pub fn page<'p>(&self, project: &'p Project) -> Option<&'p Page> {
        let root_id = self
            .ancestors(project)
            .last()
            .map(|root| root.id.clone())
            .unwrap_or_else(|| self.id.clone());

        project.pages().iter().find(|page| page.root_id() == &root_id)
    }

    pub fn to_json(&self) -> SerializedElement {
        SerializedElement {
            model: ModelTag::Element,
            id: self.id.clone(),
            name: self.name.clone(),
            edited_name: self.edited_name.clone(),
            name_editable: self.name_editable,
            pattern_id: self.pattern_id.clone(),
            role: self.role,
            container_id: self.container_id.clone(),
            content_ids: self.content_ids.clone(),
            selected: self.selected,
            highlighted: self.highlighted,
            dragged: self.dragged,
            open: self.open,
            focused: self.focused,
            placeholder_highlighted: self.placeholder_highlighted,
            property_values: self.property_values.clone(),
        }
    }

    /// Record for durable storage: session-local flags are dropped
    pub fn to_disk_form(&self) -> SerializedElement {
        SerializedElement {
            selected: false,
            highlighted: false,
            dragged: false,
            placeholder_highlighted: false,
            ..self.to_json()
        }
    }

    /// Instantiate from a record; references are linked by the owning project
    pub fn from_serialized(data: &SerializedElement) -> ModelResult<Self> {
        ModelTag::Element.expect(data.model)?;

        Ok(Self {
            id: data.id.clone(),
            name: data.name.clone(),
            edited_name: data.edited_name.clone(),
            name_editable: data.name_editable,
            pattern_id: data.pattern_id.clone(),
            role: data.role,
            container_id: data.container_id.clone(),
            content_ids: data.content_ids.clone(),
            selected: data.selected,
            highlighted: data.highlighted,
            dragged: data.dragged,
            open: data.open,
            focused: data.focused,
            placeholder_highlighted: data.placeholder_highlighted,
            property_values: data.property_values.clone(),
        })
    }

    fn reset_transient_state(&mut self) {
        self.selected = false;
        self.highlighted = false;
        self.dragged = false;
        self.open = false;
        self.focused = false;
        self.placeholder_highlighted = false;
    }
}

/// Structural equality over the serialized form
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

fn child_ids<'p>(project: &'p Project, content_ids: &[ContentId]) -> Vec<&'p ElementId> {
    content_ids
        .iter()
        .filter_map(|id| project.element_content(id))
        .flat_map(|content| content.element_ids().iter())
        .collect()
}

impl Project {
    /// Create an element from a pattern with one content per declared slot.
    /// The element is registered but not placed in any container.
    pub fn instantiate(&mut self, pattern_id: &PatternId) -> Option<ElementId> {
        let pattern = self.pattern(pattern_id)?.clone();
        let role = match pattern.kind {
            PatternKind::Page => ElementRole::Root,
            _ => ElementRole::Node,
        };

        let mut element = Element::new(&pattern, role);
        let element_id = element.id.clone();

        for slot in &pattern.slots {
            let content = ElementContent::new(slot.id.clone(), element_id.clone());
            element.content_ids.push(content.id().clone());
            self.add_element_content(content);
        }
        self.add_element(element);

        debug!(element_id = %element_id, pattern = %pattern.name, "Instantiated element");
        Some(element_id)
    }

    /// Content that would receive `element_id` under `parent_id` at `slot_id`.
    ///
    /// Absent when any id is unknown, when the element is a page root, or when
    /// the parent is the element itself or one of its descendants.
    pub fn placement_target(
        &self,
        element_id: &ElementId,
        parent_id: &ElementId,
        slot_id: &SlotId,
    ) -> Option<ContentId> {
        let element = self.element(element_id)?;
        let parent = self.element(parent_id)?;

        if element.role == ElementRole::Root {
            warn!(element_id = %element_id, "Rejected relocation of a page root");
            return None;
        }
        if parent_id == element_id || element.is_ancestor_of(self, parent_id) {
            warn!(
                element_id = %element_id,
                parent_id = %parent_id,
                "Rejected relocation that would create a cycle"
            );
            return None;
        }

        parent
            .content_by_slot_id(self, slot_id)
            .map(|content| content.id().clone())
    }

    /// Move an element under `parent_id` at `slot_id`, appending when `index`
    /// is absent. Returns false without mutating when the placement is invalid.
    pub fn set_element_parent(
        &mut self,
        element_id: &ElementId,
        parent_id: &ElementId,
        slot_id: &SlotId,
        index: Option<usize>,
    ) -> bool {
        let Some(target) = self.placement_target(element_id, parent_id, slot_id) else {
            return false;
        };

        self.detach_element(element_id);
        self.insert_into_content(&target, element_id, index)
    }

    /// Deep-clone an element and everything it owns under fresh ids.
    ///
    /// The clone is registered but not placed. Selection and highlight are
    /// never carried over; other transient flags survive only when
    /// `preserve_transient_state` is set.
    pub fn clone_element(
        &mut self,
        element_id: &ElementId,
        preserve_transient_state: bool,
    ) -> Option<ElementId> {
        let source = self.element(element_id)?.clone();

        let mut clone = source.clone();
        clone.id = ElementId::new();
        clone.container_id = None;
        clone.content_ids = Vec::new();
        clone.selected = false;
        clone.highlighted = false;
        if !preserve_transient_state {
            clone.reset_transient_state();
        }

        let clone_id = clone.id.clone();
        self.add_element(clone);

        for content_id in &source.content_ids {
            self.clone_element_content(content_id, &clone_id, preserve_transient_state);
        }

        Some(clone_id)
    }

    pub fn set_element_name(&mut self, element_id: &ElementId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update_element(element_id, |element| {
            element.edited_name = name.clone();
            element.name = name;
        })
    }

    pub fn set_element_edited_name(
        &mut self,
        element_id: &ElementId,
        edited_name: impl Into<String>,
    ) -> bool {
        let edited_name = edited_name.into();
        self.update_element(element_id, |element| element.edited_name = edited_name)
    }

    pub fn set_element_name_editable(&mut self, element_id: &ElementId, editable: bool) -> bool {
        self.update_element(element_id, |element| element.name_editable = editable)
    }

    /// Set or, with `None`, unset a property value
    pub fn set_element_property_value(
        &mut self,
        element_id: &ElementId,
        property_id: &PropertyId,
        value: Option<PropertyValue>,
    ) -> bool {
        self.update_element(element_id, |element| match value {
            Some(value) => {
                element.property_values.insert(property_id.clone(), value);
            }
            None => {
                element.property_values.remove(property_id);
            }
        })
    }

    pub fn set_element_open(&mut self, element_id: &ElementId, open: bool) -> bool {
        self.update_element(element_id, |element| element.open = open)
    }

    pub fn set_element_dragged(&mut self, element_id: &ElementId, dragged: bool) -> bool {
        self.update_element(element_id, |element| element.dragged = dragged)
    }

    pub fn set_element_focused(&mut self, element_id: &ElementId, focused: bool) -> bool {
        self.update_element(element_id, |element| element.focused = focused)
    }

    pub fn set_element_placeholder_highlighted(
        &mut self,
        element_id: &ElementId,
        highlighted: bool,
    ) -> bool {
        self.update_element(element_id, |element| {
            element.placeholder_highlighted = highlighted
        })
    }

    fn update_element(&mut self, element_id: &ElementId, update: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.elements.get_mut(element_id) else {
            return false;
        };
        update(element);
        self.record(Change::ElementChanged(element_id.clone()));
        true
    }
}
