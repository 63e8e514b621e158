//! Structural properties that must hold across arbitrary edit sequences
//!
//! This tests:
//! - Container membership (absent XOR listed exactly once)
//! - Clone id disjointness and shape preservation
//! - Serialized round trips
//! - Idempotent insertion

use alva_model::{
    ElementId, PatternId, Project, SerializedProject, SlotId, BUILTIN_BOX_CHILDREN_SLOT_ID,
    BUILTIN_BOX_PATTERN_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID,
};
use std::collections::BTreeSet;

fn new_box(project: &mut Project) -> ElementId {
    project
        .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
        .unwrap()
}

fn box_slot() -> SlotId {
    SlotId::from(BUILTIN_BOX_CHILDREN_SLOT_ID)
}

/// Home page with root → [a → [a1, a2], b]
fn sample_project() -> (Project, Vec<ElementId>) {
    let mut project = Project::with_page("Sample", "Home");
    let root = project.pages()[0].root_id().clone();
    let page_slot = SlotId::from(BUILTIN_PAGE_CHILDREN_SLOT_ID);

    let a = new_box(&mut project);
    let b = new_box(&mut project);
    let a1 = new_box(&mut project);
    let a2 = new_box(&mut project);
    project.set_element_parent(&a, &root, &page_slot, None);
    project.set_element_parent(&b, &root, &page_slot, None);
    project.set_element_parent(&a1, &a, &box_slot(), None);
    project.set_element_parent(&a2, &a, &box_slot(), None);
    project.commit();

    (project, vec![root, a, b, a1, a2])
}

fn assert_container_membership(project: &Project) {
    for element in project.elements() {
        match element.container(project) {
            None => assert!(element.container_id().is_none()),
            Some(content) => {
                let listed = content
                    .element_ids()
                    .iter()
                    .filter(|id| *id == element.id())
                    .count();
                assert_eq!(listed, 1, "element {} listed {} times", element.id(), listed);
            }
        }
    }
}

#[test]
fn test_membership_holds_through_moves() {
    let (mut project, ids) = sample_project();
    let (root, a, b, a1, a2) = (&ids[0], &ids[1], &ids[2], &ids[3], &ids[4]);
    let page_slot = SlotId::from(BUILTIN_PAGE_CHILDREN_SLOT_ID);

    // Shuffle elements between branches, including rejected moves
    project.set_element_parent(a1, b, &box_slot(), None);
    project.set_element_parent(a2, a1, &box_slot(), Some(0));
    project.set_element_parent(b, a2, &box_slot(), None); // cycle, rejected
    project.set_element_parent(a, root, &page_slot, Some(5));
    project.set_element_parent(a2, b, &box_slot(), Some(0));

    assert_container_membership(&project);
    assert!(project.check_integrity().is_empty());

    let b_children: Vec<_> = project
        .element(b)
        .unwrap()
        .children(&project)
        .iter()
        .map(|e| e.id().clone())
        .collect();
    assert_eq!(b_children, vec![a2.clone(), a1.clone()]);
}

#[test]
fn test_clone_ids_are_disjoint_from_every_live_id() {
    let (mut project, ids) = sample_project();
    let before: BTreeSet<_> = project.elements().map(|e| e.id().clone()).collect();
    let before_contents: BTreeSet<_> = project.element_contents().map(|c| c.id().clone()).collect();

    let clone = project.clone_element(&ids[1], false).unwrap();

    let cloned = project.element(&clone).unwrap();
    let mut subtree = vec![cloned];
    subtree.extend(cloned.descendants(&project));
    assert_eq!(subtree.len(), 3);

    for element in &subtree {
        assert!(!before.contains(element.id()));
        for content_id in element.content_ids() {
            assert!(!before_contents.contains(content_id));
        }
    }

    // Same shape, independent containers
    let original_content = project.element(&ids[1]).unwrap().content_ids()[0].clone();
    let cloned_content = project.element(&clone).unwrap().content_ids()[0].clone();
    assert_ne!(original_content, cloned_content);
    assert_eq!(
        project.element_content(&original_content).unwrap().len(),
        project.element_content(&cloned_content).unwrap().len()
    );

    project.remove_element(&ids[3]);
    assert_eq!(project.element_content(&cloned_content).unwrap().len(), 2);
    assert!(project.check_integrity().is_empty());
}

#[test]
fn test_round_trip_through_json_text() {
    let (mut project, ids) = sample_project();
    project.set_element_name(&ids[1], "Header");
    project.set_selected_element(Some(&ids[2]));

    let json = project.to_json().to_json_string().unwrap();
    let restored = Project::from_serialized(SerializedProject::from_json(&json).unwrap()).unwrap();

    assert_eq!(restored.to_json(), project.to_json());
    for element in project.elements() {
        assert_eq!(restored.element(element.id()), Some(element));
    }
    for page in project.pages() {
        assert_eq!(restored.page(page.id()), Some(page));
    }
}

#[test]
fn test_disk_form_round_trip_drops_session_state() {
    let (mut project, ids) = sample_project();
    project.set_selected_element(Some(&ids[1]));
    project.set_highlighted_element(Some(&ids[2]));
    project.set_element_dragged(&ids[3], true);

    let restored = Project::from_serialized(project.to_disk_form()).unwrap();

    assert!(restored.selected_element().is_none());
    assert!(restored.highlighted_element().is_none());
    assert!(restored.dragged_elements().is_empty());
    assert!(restored.focused_item().is_none());
}

#[test]
fn test_insert_twice_is_idempotent() {
    let (mut project, ids) = sample_project();
    let content = project.element(&ids[2]).unwrap().content_ids()[0].clone();
    let fresh = new_box(&mut project);

    assert!(project.insert_into_content(&content, &fresh, Some(0)));
    let once = project.element_content(&content).unwrap().element_ids().to_vec();

    assert!(!project.insert_into_content(&content, &fresh, Some(0)));
    assert_eq!(project.element_content(&content).unwrap().element_ids(), once.as_slice());
}
