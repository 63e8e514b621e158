use alva_model::{ElementId, PatternId, Project, SerializedProject, SlotId};
use alva_model::{BUILTIN_BOX_CHILDREN_SLOT_ID, BUILTIN_BOX_PATTERN_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Page with `breadth` boxes per level, `depth` levels deep
fn build_project(breadth: usize, depth: usize) -> (Project, ElementId) {
    let mut project = Project::with_page("Bench", "Home");
    let root = project.pages()[0].root_id().clone();
    let box_pattern = PatternId::from(BUILTIN_BOX_PATTERN_ID);

    let mut level = vec![(root, SlotId::from(BUILTIN_PAGE_CHILDREN_SLOT_ID))];
    let mut first = None;
    for _ in 0..depth {
        let mut next = Vec::new();
        for (parent, slot) in &level {
            for _ in 0..breadth {
                let child = project.instantiate(&box_pattern).unwrap();
                project.set_element_parent(&child, parent, slot, None);
                first.get_or_insert_with(|| child.clone());
                next.push((child, SlotId::from(BUILTIN_BOX_CHILDREN_SLOT_ID)));
            }
        }
        level = next;
    }
    project.commit();

    (project, first.unwrap())
}

fn clone_subtree(c: &mut Criterion) {
    let (mut project, top) = build_project(4, 4);

    c.bench_function("clone_subtree", |b| {
        b.iter(|| {
            let clone = project.clone_element(black_box(&top), false).unwrap();
            project.remove_element(&clone);
            project.commit();
        })
    });
}

fn serialize_project(c: &mut Criterion) {
    let (project, _) = build_project(4, 4);

    c.bench_function("serialize_project", |b| {
        b.iter(|| black_box(&project).to_json().to_json_string().unwrap())
    });
}

fn deserialize_project(c: &mut Criterion) {
    let (project, _) = build_project(4, 4);
    let json = project.to_json().to_json_string().unwrap();

    c.bench_function("deserialize_project", |b| {
        b.iter(|| {
            let record = SerializedProject::from_json(black_box(&json)).unwrap();
            Project::from_serialized(record).unwrap()
        })
    });
}

criterion_group!(benches, clone_subtree, serialize_project, deserialize_project);
criterion_main!(benches);
