//! Element contents: ordered, named slots holding child elements.
//!
//! A content always belongs to exactly one element (its `parent_element_id`)
//! and only carries structural connectivity. Element order is render and
//! traversal order.

use crate::changes::Change;
use crate::element::Element;
use crate::error::ModelResult;
use crate::ids::{ContentId, ElementId, SlotId};
use crate::pattern::{PatternSlot, SlotType};
use crate::project::Project;
use crate::serialization::{ModelTag, SerializedElementContent};

#[derive(Debug, Clone)]
pub struct ElementContent {
    pub(crate) id: ContentId,
    pub(crate) element_ids: Vec<ElementId>,
    pub(crate) slot_id: SlotId,
    pub(crate) parent_element_id: ElementId,
    pub(crate) open: bool,
    pub(crate) forced_open: bool,
    pub(crate) highlighted: bool,
}

impl ElementContent {
    pub(crate) fn new(slot_id: SlotId, parent_element_id: ElementId) -> Self {
        Self {
            id: ContentId::new(),
            element_ids: Vec::new(),
            slot_id,
            parent_element_id,
            open: false,
            forced_open: false,
            highlighted: false,
        }
    }

    pub fn id(&self) -> &ContentId {
        &self.id
    }

    pub fn element_ids(&self) -> &[ElementId] {
        &self.element_ids
    }

    pub fn slot_id(&self) -> &SlotId {
        &self.slot_id
    }

    pub fn parent_element_id(&self) -> &ElementId {
        &self.parent_element_id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_forced_open(&self) -> bool {
        self.forced_open
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn len(&self) -> usize {
        self.element_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_ids.is_empty()
    }

    pub fn contains(&self, element_id: &ElementId) -> bool {
        self.element_ids.contains(element_id)
    }

    pub fn index_of(&self, element_id: &ElementId) -> Option<usize> {
        self.element_ids.iter().position(|id| id == element_id)
    }

    pub fn elements<'p>(&self, project: &'p Project) -> Vec<&'p Element> {
        self.element_ids
            .iter()
            .filter_map(|id| project.element(id))
            .collect()
    }

    pub fn parent_element<'p>(&self, project: &'p Project) -> Option<&'p Element> {
        project.element(&self.parent_element_id)
    }

    /// Slot definition declared by the parent element's pattern
    pub fn slot<'p>(&self, project: &'p Project) -> Option<&'p PatternSlot> {
        self.parent_element(project)?
            .pattern(project)?
            .slot(&self.slot_id)
    }

    pub fn slot_type(&self, project: &Project) -> Option<SlotType> {
        self.slot(project).map(|slot| slot.slot_type)
    }

    /// Every contained element followed by its own descendants, in order
    pub fn descendants<'p>(&self, project: &'p Project) -> Vec<&'p Element> {
        self.elements(project)
            .into_iter()
            .flat_map(|element| std::iter::once(element).chain(element.descendants(project)))
            .collect()
    }

    pub fn to_json(&self) -> SerializedElementContent {
        SerializedElementContent {
            model: ModelTag::ElementContent,
            id: self.id.clone(),
            element_ids: self.element_ids.clone(),
            slot_id: self.slot_id.clone(),
            parent_element_id: self.parent_element_id.clone(),
            open: self.open,
            forced_open: self.forced_open,
            highlighted: self.highlighted,
        }
    }

    pub fn to_disk_form(&self) -> SerializedElementContent {
        SerializedElementContent {
            highlighted: false,
            ..self.to_json()
        }
    }

    pub fn from_serialized(data: &SerializedElementContent) -> ModelResult<Self> {
        ModelTag::ElementContent.expect(data.model)?;

        Ok(Self {
            id: data.id.clone(),
            element_ids: data.element_ids.clone(),
            slot_id: data.slot_id.clone(),
            parent_element_id: data.parent_element_id.clone(),
            open: data.open,
            forced_open: data.forced_open,
            highlighted: data.highlighted,
        })
    }
}

impl PartialEq for ElementContent {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

impl Project {
    /// Splice an element into a content at `at` (appending when absent or out
    /// of range) and point the element's container at it.
    ///
    /// Idempotent: returns false and changes nothing when the element is
    /// already listed. An element held by a different content is detached
    /// from it first so it is never listed twice.
    pub fn insert_into_content(
        &mut self,
        content_id: &ContentId,
        element_id: &ElementId,
        at: Option<usize>,
    ) -> bool {
        let Some(content) = self.contents.get(content_id) else {
            return false;
        };
        if content.contains(element_id) || !self.elements.contains_key(element_id) {
            return false;
        }

        let previous = self
            .elements
            .get(element_id)
            .and_then(|element| element.container_id.clone());
        if previous.is_some() {
            self.detach_element(element_id);
        }

        if let Some(content) = self.contents.get_mut(content_id) {
            let index = at
                .unwrap_or(content.element_ids.len())
                .min(content.element_ids.len());
            content.element_ids.insert(index, element_id.clone());
        }
        if let Some(element) = self.elements.get_mut(element_id) {
            element.container_id = Some(content_id.clone());
        }

        self.record(Change::ContentChanged(content_id.clone()));
        self.record(Change::ElementMoved(element_id.clone()));
        true
    }

    /// Remove an element from a content by id; false when it was not listed
    pub fn remove_from_content(&mut self, content_id: &ContentId, element_id: &ElementId) -> bool {
        let Some(content) = self.contents.get_mut(content_id) else {
            return false;
        };
        let Some(index) = content.index_of(element_id) else {
            return false;
        };
        content.element_ids.remove(index);

        if let Some(element) = self.elements.get_mut(element_id) {
            if element.container_id.as_ref() == Some(content_id) {
                element.container_id = None;
            }
        }

        self.record(Change::ContentChanged(content_id.clone()));
        self.record(Change::ElementMoved(element_id.clone()));
        true
    }

    /// Take an element out of its current container, returning where it was
    pub(crate) fn detach_element(&mut self, element_id: &ElementId) -> Option<(ContentId, usize)> {
        let container_id = self.elements.get_mut(element_id)?.container_id.take()?;
        let index = self
            .contents
            .get(&container_id)
            .and_then(|content| content.index_of(element_id));

        match index {
            Some(index) => {
                self.remove_from_content(&container_id, element_id);
                Some((container_id, index))
            }
            None => None,
        }
    }

    /// Clone a content and its elements recursively, attaching the clone to
    /// `parent_element_id`'s owned contents
    pub fn clone_element_content(
        &mut self,
        content_id: &ContentId,
        parent_element_id: &ElementId,
        preserve_transient_state: bool,
    ) -> Option<ContentId> {
        let source = self.element_content(content_id)?.clone();

        let mut clone = ElementContent::new(source.slot_id.clone(), parent_element_id.clone());
        if preserve_transient_state {
            clone.open = source.open;
            clone.forced_open = source.forced_open;
        }
        let clone_id = clone.id.clone();
        self.add_element_content(clone);
        if let Some(parent) = self.elements.get_mut(parent_element_id) {
            parent.content_ids.push(clone_id.clone());
        }

        for element_id in &source.element_ids {
            if let Some(cloned) = self.clone_element(element_id, preserve_transient_state) {
                self.insert_into_content(&clone_id, &cloned, None);
            }
        }

        Some(clone_id)
    }

    pub fn set_content_open(&mut self, content_id: &ContentId, open: bool) -> bool {
        self.update_content(content_id, |content| content.open = open)
    }

    pub fn set_content_forced_open(&mut self, content_id: &ContentId, forced_open: bool) -> bool {
        self.update_content(content_id, |content| content.forced_open = forced_open)
    }

    pub fn set_content_highlighted(&mut self, content_id: &ContentId, highlighted: bool) -> bool {
        self.update_content(content_id, |content| content.highlighted = highlighted)
    }

    fn update_content(
        &mut self,
        content_id: &ContentId,
        update: impl FnOnce(&mut ElementContent),
    ) -> bool {
        let Some(content) = self.contents.get_mut(content_id) else {
            return false;
        };
        update(content);
        self.record(Change::ContentChanged(content_id.clone()));
        true
    }
}
