//! Commands targeting a single element.

use crate::command::{CommandKind, CommandTarget, ElementTarget, Reversible};
use alva_model::{
    ContentId, ElementId, FocusedItemType, Project, PropertyId, PropertyValue, SlotId, Snapshot,
};
use tracing::{debug, warn};

/// Where an element sat before a relocation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    parent_id: ElementId,
    slot_id: SlotId,
    index: usize,
}

/// Place an element under a parent at a slot and index.
///
/// Undo moves the element back to where it was. An element that had no
/// container before (freshly instantiated, e.g. dropped from a library) is
/// removed from the project entirely and stashed, so redo brings back the
/// same ids.
#[derive(Debug, Clone)]
pub struct ElementLocationCommand {
    target: ElementTarget,
    parent_id: ElementId,
    slot_id: SlotId,
    index: Option<usize>,
    previous: Option<Location>,
    detached: Option<Snapshot>,
}

impl ElementLocationCommand {
    /// Move `element_id` under `parent_id` at `slot_id`, appending when
    /// `index` is absent. The command is attributed to the parent's page.
    pub fn set_parent(
        project: &Project,
        element_id: &ElementId,
        parent_id: &ElementId,
        slot_id: &SlotId,
        index: Option<usize>,
    ) -> Option<Self> {
        project.element(element_id)?;
        let parent = project.element(parent_id)?;
        let page = parent.page(project).or_else(|| project.active_page())?;

        Some(Self {
            target: ElementTarget {
                element_id: element_id.clone(),
                page_id: page.id().clone(),
            },
            parent_id: parent_id.clone(),
            slot_id: slot_id.clone(),
            index,
            previous: None,
            detached: None,
        })
    }

    pub fn add_child(
        project: &Project,
        child_id: &ElementId,
        parent_id: &ElementId,
        slot_id: &SlotId,
        index: Option<usize>,
    ) -> Option<Self> {
        Self::set_parent(project, child_id, parent_id, slot_id, index)
    }

    /// Place `new_sibling_id` directly after `sibling_id` in the same content
    pub fn add_sibling(
        project: &Project,
        new_sibling_id: &ElementId,
        sibling_id: &ElementId,
    ) -> Option<Self> {
        let sibling = project.element(sibling_id)?;
        let container = sibling.container(project)?;
        let sibling_index = container.index_of(sibling_id)?;

        // The mover is detached before insertion, shifting later entries left.
        let index = match container.index_of(new_sibling_id) {
            Some(current) if current < sibling_index => sibling_index,
            _ => sibling_index + 1,
        };

        Self::set_parent(
            project,
            new_sibling_id,
            container.parent_element_id(),
            container.slot_id(),
            Some(index),
        )
    }

    pub fn element_id(&self) -> &ElementId {
        &self.target.element_id
    }

    /// Bring a stashed element back for redo. Fails without mutating when the
    /// destination would end up inside the restored subtree.
    fn restore_detached(&mut self, project: &mut Project) -> bool {
        let Some(snapshot) = self.detached.as_ref() else {
            warn!(element_id = %self.target.element_id, "Command element no longer exists");
            return false;
        };
        if snapshot.contains(&self.parent_id) || !project.restore_snapshot(snapshot) {
            return false;
        }
        self.detached = None;
        true
    }

    fn stash(&mut self, project: &mut Project) -> bool {
        let Some(snapshot) = project.snapshot_subtree(&self.target.element_id) else {
            return false;
        };
        project.remove_element(&self.target.element_id);
        self.detached = Some(snapshot);
        true
    }
}

impl Reversible for ElementLocationCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        if project.page(&self.target.page_id).is_none() || project.element(&self.parent_id).is_none() {
            warn!(
                element_id = %self.target.element_id,
                parent_id = %self.parent_id,
                "Location command target no longer resolves"
            );
            return false;
        }

        let restored = project.element(&self.target.element_id).is_none();
        if restored && !self.restore_detached(project) {
            return false;
        }

        let element_id = self.target.element_id.clone();
        if project
            .placement_target(&element_id, &self.parent_id, &self.slot_id)
            .is_none()
        {
            if restored {
                self.stash(project);
            }
            return false;
        }

        self.previous = project.element(&element_id).and_then(|element| {
            let container = element.container(project)?;
            Some(Location {
                parent_id: container.parent_element_id().clone(),
                slot_id: container.slot_id().clone(),
                index: container.index_of(&element_id)?,
            })
        });

        let moved = project.set_element_parent(&element_id, &self.parent_id, &self.slot_id, self.index);
        debug!(element_id = %element_id, parent_id = %self.parent_id, moved, "Executed location command");
        moved
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        if self.target.resolve(project).is_none() {
            return false;
        }

        match self.previous.clone() {
            Some(previous) => {
                if project.element(&previous.parent_id).is_none() {
                    warn!(parent_id = %previous.parent_id, "Previous parent no longer exists");
                    return false;
                }
                project.set_element_parent(
                    &self.target.element_id,
                    &previous.parent_id,
                    &previous.slot_id,
                    Some(previous.index),
                )
            }
            None => self.stash(project),
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::ElementLocation
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Element(self.target.element_id.clone())
    }
}

/// Remove an element and its subtree. Undo puts it back at its exact former
/// index and selects it.
#[derive(Debug, Clone)]
pub struct ElementRemoveCommand {
    target: ElementTarget,
    container_id: ContentId,
    index: usize,
    detached: Option<Snapshot>,
}

impl ElementRemoveCommand {
    /// Absent for unknown or uncontained elements; page roots go with their
    /// page.
    pub fn new(project: &Project, element_id: &ElementId) -> Option<Self> {
        let element = project.element(element_id)?;
        let container = element.container(project)?;

        Some(Self {
            target: ElementTarget::capture(project, element_id)?,
            container_id: container.id().clone(),
            index: container.index_of(element_id)?,
            detached: None,
        })
    }

    pub fn element_id(&self) -> &ElementId {
        &self.target.element_id
    }
}

impl Reversible for ElementRemoveCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        if self.target.resolve(project).is_none() {
            return false;
        }
        let Some(snapshot) = project.snapshot_subtree(&self.target.element_id) else {
            return false;
        };

        if project.remove_element(&self.target.element_id).is_none() {
            return false;
        }
        self.detached = Some(snapshot);
        debug!(element_id = %self.target.element_id, "Removed element");
        true
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        let element_id = self.target.element_id.clone();
        if project.page(&self.target.page_id).is_none()
            || project.element_content(&self.container_id).is_none()
        {
            warn!(element_id = %element_id, "Removed element's page or container no longer exists");
            return false;
        }
        let Some(snapshot) = self.detached.as_ref() else {
            return false;
        };
        if !project.restore_snapshot(snapshot) {
            return false;
        }

        if !project.insert_into_content(&self.container_id, &element_id, Some(self.index)) {
            project.remove_element(&element_id);
            return false;
        }
        self.detached = None;

        project.set_selected_element(Some(&element_id));
        project.set_focused_item_type(FocusedItemType::Element);
        debug!(element_id = %element_id, index = self.index, "Restored removed element");
        true
    }

    fn kind(&self) -> CommandKind {
        CommandKind::ElementRemove
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Element(self.target.element_id.clone())
    }
}

/// Rename an element
#[derive(Debug, Clone)]
pub struct ElementNameCommand {
    target: ElementTarget,
    name: String,
    previous_name: Option<String>,
}

impl ElementNameCommand {
    pub fn new(project: &Project, element_id: &ElementId, name: impl Into<String>) -> Option<Self> {
        Some(Self {
            target: ElementTarget::capture(project, element_id)?,
            name: name.into(),
            previous_name: None,
        })
    }

    /// Take over a later rename of the same element, keeping the name from
    /// before either edit
    pub(crate) fn absorb(&mut self, next: &ElementNameCommand) -> bool {
        self.name = next.name.clone();
        true
    }
}

impl Reversible for ElementNameCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        let Some((element, _)) = self.target.resolve(project) else {
            return false;
        };
        self.previous_name = Some(element.name().to_string());
        project.set_element_name(&self.target.element_id, self.name.clone())
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        if self.target.resolve(project).is_none() {
            return false;
        }
        let Some(previous) = self.previous_name.clone() else {
            return false;
        };
        project.set_element_name(&self.target.element_id, previous)
    }

    fn kind(&self) -> CommandKind {
        CommandKind::ElementName
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Element(self.target.element_id.clone())
    }
}

/// Set or unset one property value of an element
#[derive(Debug, Clone)]
pub struct PropertyValueCommand {
    target: ElementTarget,
    property_id: PropertyId,
    value: Option<PropertyValue>,
    previous: Option<Option<PropertyValue>>,
}

impl PropertyValueCommand {
    pub fn new(
        project: &Project,
        element_id: &ElementId,
        property_id: &PropertyId,
        value: Option<PropertyValue>,
    ) -> Option<Self> {
        Some(Self {
            target: ElementTarget::capture(project, element_id)?,
            property_id: property_id.clone(),
            value,
            previous: None,
        })
    }

    pub(crate) fn absorb(&mut self, next: &PropertyValueCommand) -> bool {
        if self.property_id != next.property_id {
            return false;
        }
        self.value = next.value.clone();
        true
    }
}

impl Reversible for PropertyValueCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        let Some((element, _)) = self.target.resolve(project) else {
            return false;
        };
        self.previous = Some(element.property_value(&self.property_id).cloned());
        project.set_element_property_value(
            &self.target.element_id,
            &self.property_id,
            self.value.clone(),
        )
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        if self.target.resolve(project).is_none() {
            return false;
        }
        let Some(previous) = self.previous.clone() else {
            return false;
        };
        project.set_element_property_value(&self.target.element_id, &self.property_id, previous)
    }

    fn kind(&self) -> CommandKind {
        CommandKind::PropertyValue
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Element(self.target.element_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alva_model::{PatternId, BUILTIN_BOX_PATTERN_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID};

    struct Fixture {
        project: Project,
        root: ElementId,
        content: ContentId,
    }

    fn fixture() -> Fixture {
        let project = Project::with_page("Test", "Home");
        let root = project.pages()[0].root_id().clone();
        let content = project.element(&root).unwrap().content_ids()[0].clone();
        Fixture {
            project,
            root,
            content,
        }
    }

    fn slot() -> SlotId {
        SlotId::from(BUILTIN_PAGE_CHILDREN_SLOT_ID)
    }

    fn new_box(project: &mut Project) -> ElementId {
        project
            .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
            .unwrap()
    }

    fn children(f: &Fixture) -> Vec<ElementId> {
        f.project.element_content(&f.content).unwrap().element_ids().to_vec()
    }

    #[test]
    fn test_add_child_and_undo_removes_new_element() {
        let mut f = fixture();
        let x = new_box(&mut f.project);

        let mut command =
            ElementLocationCommand::add_child(&f.project, &x, &f.root, &slot(), Some(0)).unwrap();
        assert!(command.execute(&mut f.project));
        assert_eq!(children(&f), vec![x.clone()]);

        assert!(command.undo(&mut f.project));
        assert!(children(&f).is_empty());
        assert!(f.project.element(&x).is_none());

        // Redo restores the same id
        assert!(command.execute(&mut f.project));
        assert_eq!(children(&f), vec![x]);
        assert!(f.project.check_integrity().is_empty());
    }

    #[test]
    fn test_move_undo_returns_to_previous_index() {
        let mut f = fixture();
        let ids: Vec<_> = (0..3).map(|_| new_box(&mut f.project)).collect();
        for id in &ids {
            f.project.set_element_parent(id, &f.root, &slot(), None);
        }

        let mut command =
            ElementLocationCommand::set_parent(&f.project, &ids[0], &f.root, &slot(), Some(2))
                .unwrap();
        assert!(command.execute(&mut f.project));
        assert_eq!(children(&f), vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]);

        assert!(command.undo(&mut f.project));
        assert_eq!(children(&f), ids);
    }

    #[test]
    fn test_cyclic_move_fails_without_mutation() {
        let mut f = fixture();
        let outer = new_box(&mut f.project);
        let inner = new_box(&mut f.project);
        f.project.set_element_parent(&outer, &f.root, &slot(), None);
        let inner_slot = f.project.element(&outer).unwrap().contents(&f.project)[0]
            .slot_id()
            .clone();
        f.project.set_element_parent(&inner, &outer, &inner_slot, None);

        let before = f.project.to_json();
        let mut command =
            ElementLocationCommand::set_parent(&f.project, &outer, &inner, &inner_slot, None)
                .unwrap();
        assert!(!command.execute(&mut f.project));
        assert_eq!(f.project.to_json(), before);
    }

    #[test]
    fn test_remove_undo_restores_index_and_selection() {
        let mut f = fixture();
        let ids: Vec<_> = (0..3).map(|_| new_box(&mut f.project)).collect();
        for id in &ids {
            f.project.set_element_parent(id, &f.root, &slot(), None);
        }

        let mut command = ElementRemoveCommand::new(&f.project, &ids[1]).unwrap();
        assert!(command.execute(&mut f.project));
        assert_eq!(children(&f), vec![ids[0].clone(), ids[2].clone()]);

        assert!(command.undo(&mut f.project));
        assert_eq!(children(&f), ids);
        assert_eq!(f.project.selected_element().unwrap().id(), &ids[1]);
        assert_eq!(f.project.focused_item_type(), FocusedItemType::Element);
    }

    #[test]
    fn test_remove_requires_container() {
        let f = fixture();
        assert!(ElementRemoveCommand::new(&f.project, &f.root).is_none());
    }

    #[test]
    fn test_property_command_restores_unset_value() {
        let mut f = fixture();
        let x = new_box(&mut f.project);
        let label = PropertyId::from("label");

        let mut command = PropertyValueCommand::new(
            &f.project,
            &x,
            &label,
            Some(PropertyValue::String("Hi".into())),
        )
        .unwrap();
        assert!(command.execute(&mut f.project));
        assert!(f.project.element(&x).unwrap().property_value(&label).is_some());

        assert!(command.undo(&mut f.project));
        assert!(f.project.element(&x).unwrap().property_value(&label).is_none());
    }
}
