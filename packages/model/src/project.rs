//! # Project
//!
//! Aggregate root and single source of truth for reference resolution.
//!
//! Elements and contents live in two flat, id-keyed maps. Parent, children,
//! ancestors and descendants are derived by following id references at query
//! time, so relocating, cloning or restoring a subtree costs a handful of
//! reference updates regardless of depth.
//!
//! ```text
//! Project
//!   ├── elements: ElementId → Element
//!   ├── contents: ContentId → ElementContent
//!   ├── pages:    [Page]            (ordered, each names a root element)
//!   ├── pattern libraries, user store
//!   └── selected / highlighted element ids
//! ```
//!
//! Selection and highlight are stored once, as ids on the project. The element
//! flags mirror them and are only written by the setters here, which clear the
//! previous holder and mark the new one in the same call.

use crate::changes::{Change, ChangeQueue, SubscriptionId};
use crate::element::Element;
use crate::element_content::ElementContent;
use crate::error::{ModelError, ModelResult};
use crate::ids::{ContentId, ElementId, PatternId, ProjectId};
use crate::page::Page;
use crate::pattern::{Pattern, PatternLibrary, BUILTIN_LIBRARY_ID};
use crate::serialization::{ModelTag, SerializedProject};
use crate::user_store::UserStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which kind of item currently has focus in the editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusedItemType {
    #[default]
    None,
    Element,
    Page,
}

#[derive(Debug, Clone, Copy)]
pub enum FocusedItem<'p> {
    Element(&'p Element),
    Page(&'p Page),
}

/// An element together with everything it owns, detached from the project.
///
/// Commands capture snapshots before removing a subtree so a later undo or
/// redo can bring back identical ids, ordering and property values.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root_id: ElementId,
    elements: Vec<Element>,
    contents: Vec<ElementContent>,
}

impl Snapshot {
    pub fn root_id(&self) -> &ElementId {
        &self.root_id
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, element_id: &ElementId) -> bool {
        self.elements.iter().any(|element| element.id() == element_id)
    }
}

#[derive(Debug)]
pub struct Project {
    id: ProjectId,
    name: String,
    pub(crate) path: Option<PathBuf>,
    pub(crate) elements: BTreeMap<ElementId, Element>,
    pub(crate) contents: BTreeMap<ContentId, ElementContent>,
    pub(crate) pages: Vec<Page>,
    pattern_libraries: Vec<PatternLibrary>,
    user_store: UserStore,
    focused_item_type: FocusedItemType,
    selected_element: Option<ElementId>,
    highlighted_element: Option<ElementId>,
    changes: ChangeQueue,
}

impl Project {
    /// Empty project with the built-in pattern library connected
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            path: None,
            elements: BTreeMap::new(),
            contents: BTreeMap::new(),
            pages: Vec::new(),
            pattern_libraries: vec![PatternLibrary::builtin()],
            user_store: UserStore::default(),
            focused_item_type: FocusedItemType::None,
            selected_element: None,
            highlighted_element: None,
            changes: ChangeQueue::default(),
        }
    }

    /// Project with a single active page
    pub fn with_page(name: impl Into<String>, page_name: impl Into<String>) -> Self {
        let mut project = Self::new(name);
        if let Some(page) = project.create_page(page_name) {
            let page_id = page.id().clone();
            project.add_page(page, None);
            project.set_active_page(Some(&page_id));
            project.set_focused_item_type(FocusedItemType::Page);
        }
        project.changes = ChangeQueue::default();
        project
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn element(&self, element_id: &ElementId) -> Option<&Element> {
        self.elements.get(element_id)
    }

    pub fn element_content(&self, content_id: &ContentId) -> Option<&ElementContent> {
        self.contents.get(content_id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn element_contents(&self) -> impl Iterator<Item = &ElementContent> {
        self.contents.values()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    pub fn pattern_libraries(&self) -> &[PatternLibrary] {
        &self.pattern_libraries
    }

    /// Connect a library, replacing any library with the same id
    pub fn add_pattern_library(&mut self, library: PatternLibrary) {
        self.pattern_libraries
            .retain(|existing| existing.id != library.id);
        self.pattern_libraries.push(library);
    }

    pub fn pattern(&self, pattern_id: &PatternId) -> Option<&Pattern> {
        self.pattern_libraries
            .iter()
            .find_map(|library| library.pattern(pattern_id))
    }

    pub fn user_store(&self) -> &UserStore {
        &self.user_store
    }

    pub fn user_store_mut(&mut self) -> &mut UserStore {
        &mut self.user_store
    }

    /// Register an element. Ids are project-wide unique, so a taken id fails.
    pub fn add_element(&mut self, element: Element) -> bool {
        if self.elements.contains_key(element.id()) {
            return false;
        }
        let element_id = element.id().clone();
        self.elements.insert(element_id.clone(), element);
        self.record(Change::ElementAdded(element_id));
        true
    }

    pub fn add_element_content(&mut self, content: ElementContent) -> bool {
        if self.contents.contains_key(content.id()) {
            return false;
        }
        let content_id = content.id().clone();
        self.contents.insert(content_id.clone(), content);
        self.record(Change::ContentAdded(content_id));
        true
    }

    /// Remove an element, detaching it from its container and cascading
    /// through every content it owns and, transitively, their elements.
    ///
    /// The root of a listed page is refused; remove the page instead.
    pub fn remove_element(&mut self, element_id: &ElementId) -> Option<Element> {
        if !self.elements.contains_key(element_id) {
            return None;
        }
        if self.pages.iter().any(|page| page.root_id() == element_id) {
            warn!(element_id = %element_id, "Refusing to remove a page root");
            return None;
        }

        self.detach_element(element_id);
        let element = self.elements.remove(element_id)?;
        for content_id in element.content_ids() {
            self.remove_element_content(content_id);
        }

        if self.selected_element.as_ref() == Some(element_id) {
            self.selected_element = None;
            self.record(Change::SelectionChanged(None));
        }
        if self.highlighted_element.as_ref() == Some(element_id) {
            self.highlighted_element = None;
            self.record(Change::HighlightChanged(None));
        }

        self.record(Change::ElementRemoved(element_id.clone()));
        Some(element)
    }

    /// Remove a content and every element it holds, recursively
    pub fn remove_element_content(&mut self, content_id: &ContentId) -> Option<ElementContent> {
        let content = self.contents.remove(content_id)?;

        if let Some(parent) = self.elements.get_mut(content.parent_element_id()) {
            parent.content_ids.retain(|id| id != content_id);
        }
        for element_id in content.element_ids() {
            self.remove_element(element_id);
        }

        self.record(Change::ContentRemoved(content_id.clone()));
        Some(content)
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected_element
            .as_ref()
            .and_then(|id| self.elements.get(id))
    }

    pub fn highlighted_element(&self) -> Option<&Element> {
        self.highlighted_element
            .as_ref()
            .and_then(|id| self.elements.get(id))
    }

    pub fn dragged_elements(&self) -> Vec<&Element> {
        self.elements
            .values()
            .filter(|element| element.is_dragged())
            .collect()
    }

    /// Select one element, or none. Unknown ids fail without touching the
    /// current selection.
    pub fn set_selected_element(&mut self, element_id: Option<&ElementId>) -> bool {
        if element_id.is_some_and(|id| !self.elements.contains_key(id)) {
            return false;
        }

        if let Some(previous) = self.selected_element.take() {
            if let Some(element) = self.elements.get_mut(&previous) {
                element.selected = false;
            }
        }
        if let Some(id) = element_id {
            if let Some(element) = self.elements.get_mut(id) {
                element.selected = true;
            }
            self.selected_element = Some(id.clone());
        }

        self.record(Change::SelectionChanged(element_id.cloned()));
        true
    }

    pub fn set_highlighted_element(&mut self, element_id: Option<&ElementId>) -> bool {
        if element_id.is_some_and(|id| !self.elements.contains_key(id)) {
            return false;
        }

        if let Some(previous) = self.highlighted_element.take() {
            if let Some(element) = self.elements.get_mut(&previous) {
                element.highlighted = false;
            }
        }
        if let Some(id) = element_id {
            if let Some(element) = self.elements.get_mut(id) {
                element.highlighted = true;
            }
            self.highlighted_element = Some(id.clone());
        }

        self.record(Change::HighlightChanged(element_id.cloned()));
        true
    }

    pub fn focused_item_type(&self) -> FocusedItemType {
        self.focused_item_type
    }

    pub fn set_focused_item_type(&mut self, focused_item_type: FocusedItemType) {
        if self.focused_item_type != focused_item_type {
            self.focused_item_type = focused_item_type;
            self.record(Change::FocusChanged);
        }
    }

    /// The selected element or the active page, depending on focus
    pub fn focused_item(&self) -> Option<FocusedItem<'_>> {
        match self.focused_item_type {
            FocusedItemType::None => None,
            FocusedItemType::Element => self.selected_element().map(FocusedItem::Element),
            FocusedItemType::Page => self.active_page().map(FocusedItem::Page),
        }
    }

    /// Capture an element with all owned contents and descendants
    pub fn snapshot_subtree(&self, element_id: &ElementId) -> Option<Snapshot> {
        let root = self.element(element_id)?;

        let mut elements = vec![root.clone()];
        elements.extend(root.descendants(self).into_iter().cloned());

        let contents = elements
            .iter()
            .flat_map(|element| element.content_ids())
            .filter_map(|content_id| self.element_content(content_id))
            .cloned()
            .collect();

        Some(Snapshot {
            root_id: element_id.clone(),
            elements,
            contents,
        })
    }

    /// Re-register a captured subtree. The root comes back uncontained and
    /// nothing comes back selected or highlighted.
    ///
    /// Fails without mutating if any captured id is already in use.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        let collides = snapshot
            .elements
            .iter()
            .any(|element| self.elements.contains_key(element.id()))
            || snapshot
                .contents
                .iter()
                .any(|content| self.contents.contains_key(content.id()));
        if collides {
            warn!(root_id = %snapshot.root_id, "Snapshot ids already in use, not restoring");
            return false;
        }

        for content in &snapshot.contents {
            self.add_element_content(content.clone());
        }
        for element in &snapshot.elements {
            let mut element = element.clone();
            if element.id() == &snapshot.root_id {
                element.container_id = None;
            }
            element.selected = false;
            element.highlighted = false;
            self.add_element(element);
        }

        debug!(
            root_id = %snapshot.root_id,
            elements = snapshot.elements.len(),
            "Restored subtree"
        );
        true
    }

    /// Subscribe to committed change batches
    pub fn subscribe(&mut self, listener: impl FnMut(&[Change]) + 'static) -> SubscriptionId {
        self.changes.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    /// Changes recorded since the last commit
    pub fn pending_changes(&self) -> &[Change] {
        self.changes.pending()
    }

    /// Deliver pending changes to subscribers; returns the batch size
    pub fn commit(&mut self) -> usize {
        self.changes.flush()
    }

    pub(crate) fn record(&mut self, change: Change) {
        self.changes.record(change);
    }

    pub fn to_json(&self) -> SerializedProject {
        SerializedProject {
            model: ModelTag::Project,
            id: self.id.clone(),
            name: self.name.clone(),
            elements: self.elements.values().map(Element::to_json).collect(),
            element_contents: self.contents.values().map(ElementContent::to_json).collect(),
            pages: self.pages.iter().map(Page::to_json).collect(),
            pattern_libraries: self.pattern_libraries.clone(),
            user_store: self.user_store.clone(),
            focused_item_type: self.focused_item_type,
        }
    }

    /// Record for durable storage: session-local flags are dropped
    pub fn to_disk_form(&self) -> SerializedProject {
        SerializedProject {
            elements: self.elements.values().map(Element::to_disk_form).collect(),
            element_contents: self
                .contents
                .values()
                .map(ElementContent::to_disk_form)
                .collect(),
            focused_item_type: FocusedItemType::None,
            ..self.to_json()
        }
    }

    /// Rebuild a project in two passes: instantiate every entity keyed by id,
    /// then resolve references and verify the structural invariants.
    pub fn from_serialized(record: SerializedProject) -> ModelResult<Self> {
        ModelTag::Project.expect(record.model)?;

        let mut project = Self::new(record.name);
        project.id = record.id;
        project.user_store = record.user_store;
        project.focused_item_type = record.focused_item_type;
        for library in record.pattern_libraries {
            project.add_pattern_library(library);
        }
        if !project
            .pattern_libraries
            .iter()
            .any(|library| library.id.as_str() == BUILTIN_LIBRARY_ID)
        {
            project.pattern_libraries.insert(0, PatternLibrary::builtin());
        }

        for data in &record.element_contents {
            let content = ElementContent::from_serialized(data)?;
            if project.contents.insert(content.id().clone(), content).is_some() {
                return Err(ModelError::DuplicateId(data.id.to_string()));
            }
        }
        for data in &record.elements {
            let element = Element::from_serialized(data)?;
            if project.elements.insert(element.id().clone(), element).is_some() {
                return Err(ModelError::DuplicateId(data.id.to_string()));
            }
        }
        for data in &record.pages {
            if project.page(&data.id).is_some() {
                return Err(ModelError::DuplicateId(data.id.to_string()));
            }
            project.pages.push(Page::from_serialized(data)?);
        }

        project.link_references()?;
        project.changes = ChangeQueue::default();
        Ok(project)
    }

    fn link_references(&mut self) -> ModelResult<()> {
        for element in self.elements.values() {
            if let Some(container_id) = element.container_id() {
                if !self.contents.contains_key(container_id) {
                    return Err(dangling(element.id(), container_id));
                }
            }
            if let Some(content_id) = element
                .content_ids()
                .iter()
                .find(|id| !self.contents.contains_key(*id))
            {
                return Err(dangling(element.id(), content_id));
            }
        }
        for content in self.contents.values() {
            if !self.elements.contains_key(content.parent_element_id()) {
                return Err(dangling(content.id(), content.parent_element_id()));
            }
            if let Some(element_id) = content
                .element_ids()
                .iter()
                .find(|id| !self.elements.contains_key(*id))
            {
                return Err(dangling(content.id(), element_id));
            }
        }
        for page in &self.pages {
            if !self.elements.contains_key(page.root_id()) {
                return Err(dangling(page.id(), page.root_id()));
            }
        }

        self.selected_element = self.first_flagged(Element::is_selected, |e| e.selected = false);
        self.highlighted_element =
            self.first_flagged(Element::is_highlighted, |e| e.highlighted = false);
        if let Some(active) = self.active_page().map(|page| page.id().clone()) {
            for page in &mut self.pages {
                page.active = page.id() == &active;
            }
        }

        let violations = self.check_integrity();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Integrity(violations))
        }
    }

    /// Keep the first element carrying a flag and clear it on the rest
    fn first_flagged(
        &mut self,
        flagged: fn(&Element) -> bool,
        clear: fn(&mut Element),
    ) -> Option<ElementId> {
        let mut first = None;
        for element in self.elements.values_mut() {
            if !flagged(element) {
                continue;
            }
            if first.is_none() {
                first = Some(element.id().clone());
            } else {
                warn!(element_id = %element.id(), "Clearing duplicate exclusive flag");
                clear(element);
            }
        }
        first
    }
}

fn dangling(from: &impl ToString, to: &impl ToString) -> ModelError {
    ModelError::DanglingReference {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{BUILTIN_BOX_PATTERN_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID};
    use crate::ids::SlotId;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn project_with_child() -> (Project, ElementId, ElementId) {
        let mut project = Project::with_page("Test", "Home");
        let root = project.pages()[0].root_id().clone();
        let child = project
            .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
            .unwrap();
        project.set_element_parent(&child, &root, &SlotId::from(BUILTIN_PAGE_CHILDREN_SLOT_ID), None);
        (project, root, child)
    }

    #[test]
    fn test_with_page_is_active_and_focused() {
        let project = Project::with_page("Test", "Home");
        assert_eq!(project.pages().len(), 1);
        assert_eq!(project.active_page().unwrap().name(), "Home");
        assert!(matches!(project.focused_item(), Some(FocusedItem::Page(_))));
        assert!(project.pending_changes().is_empty());
    }

    #[test]
    fn test_selection_is_exclusive() {
        let (mut project, root, child) = project_with_child();

        assert!(project.set_selected_element(Some(&root)));
        assert!(project.set_selected_element(Some(&child)));

        let selected: Vec<_> = project.elements().filter(|e| e.is_selected()).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(project.selected_element().unwrap().id(), &child);

        assert!(!project.set_selected_element(Some(&ElementId::from("missing"))));
        assert_eq!(project.selected_element().unwrap().id(), &child);

        assert!(project.set_selected_element(None));
        assert!(project.selected_element().is_none());
        assert!(project.elements().all(|e| !e.is_selected()));
    }

    #[test]
    fn test_highlight_is_exclusive() {
        let (mut project, root, child) = project_with_child();
        project.set_highlighted_element(Some(&root));
        project.set_highlighted_element(Some(&child));

        assert!(!project.element(&root).unwrap().is_highlighted());
        assert_eq!(project.highlighted_element().unwrap().id(), &child);
    }

    #[test]
    fn test_remove_element_refuses_page_root() {
        let (mut project, root, child) = project_with_child();
        let count = project.element_count();
        project.commit();

        assert!(project.remove_element(&root).is_none());
        assert_eq!(project.element_count(), count);
        assert!(project.element(&root).is_some());
        assert!(project.element(&child).is_some());
        assert_eq!(project.pages()[0].root(&project).unwrap().id(), &root);
        assert!(project.check_integrity().is_empty());
        assert!(project.pending_changes().is_empty());
    }

    #[test]
    fn test_remove_element_cascades_and_clears_selection() {
        let (mut project, root, child) = project_with_child();
        let grandchild = project
            .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
            .unwrap();
        let slot = project.element(&child).unwrap().contents(&project)[0].slot_id().clone();
        project.set_element_parent(&grandchild, &child, &slot, None);
        project.set_selected_element(Some(&grandchild));

        let removed = project.remove_element(&child).unwrap();
        assert_eq!(removed.content_ids().len(), 1);
        assert!(project.element(&grandchild).is_none());
        assert!(project.selected_element().is_none());
        assert!(project.element(&root).unwrap().children(&project).is_empty());
        // root plus its one content remain
        assert_eq!(project.element_count(), 1);
        assert_eq!(project.content_count(), 1);
        assert!(project.check_integrity().is_empty());
    }

    #[test]
    fn test_snapshot_restores_identical_subtree() {
        let (mut project, _, child) = project_with_child();
        project.set_element_name(&child, "Card");
        let snapshot = project.snapshot_subtree(&child).unwrap();
        let before = project.element(&child).unwrap().to_json();

        project.remove_element(&child);
        assert!(project.restore_snapshot(&snapshot));
        assert!(!project.restore_snapshot(&snapshot));

        let restored = project.element(&child).unwrap();
        assert_eq!(restored.name(), "Card");
        assert!(restored.container_id().is_none());
        assert_eq!(restored.content_ids(), before.content_ids.as_slice());
    }

    #[test]
    fn test_commit_delivers_changes_once() {
        let (mut project, _, child) = project_with_child();
        project.commit();

        let batches = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&batches);
        project.subscribe(move |batch| sink.borrow_mut().push(batch.to_vec()));

        project.set_selected_element(Some(&child));
        project.set_element_name(&child, "Renamed");
        assert!(batches.borrow().is_empty());

        assert_eq!(project.commit(), 2);
        assert_eq!(
            batches.borrow()[0],
            vec![
                Change::SelectionChanged(Some(child.clone())),
                Change::ElementChanged(child)
            ]
        );
    }

    #[test]
    fn test_serialized_round_trip_is_structurally_equal() {
        let (mut project, _, child) = project_with_child();
        project.set_selected_element(Some(&child));

        let record = project.to_json();
        let restored = Project::from_serialized(record.clone()).unwrap();

        assert_eq!(restored.to_json(), record);
        assert_eq!(restored.selected_element().unwrap().id(), &child);
    }

    #[test]
    fn test_from_serialized_rejects_dangling_container() {
        let (project, _, _) = project_with_child();
        let mut record = project.to_json();
        record.element_contents.clear();

        let err = Project::from_serialized(record).unwrap_err();
        assert!(matches!(err, ModelError::DanglingReference { .. }));
    }

    #[test]
    fn test_from_serialized_keeps_single_selection() {
        let (project, root, child) = project_with_child();
        let mut record = project.to_json();
        for element in &mut record.elements {
            element.selected = true;
        }

        let restored = Project::from_serialized(record).unwrap();
        let selected: Vec<_> = restored.elements().filter(|e| e.is_selected()).collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].id() == &root || selected[0].id() == &child);
    }
}
