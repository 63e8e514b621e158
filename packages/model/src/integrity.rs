//! Structural invariant checks.
//!
//! Used when loading a project and by tests asserting that edits never leave
//! orphaned or duplicated references behind.

use crate::element::ElementRole;
use crate::ids::{ContentId, ElementId, PageId};
use crate::project::Project;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    #[error("element {element} references missing container {container}")]
    MissingContainer {
        element: ElementId,
        container: ContentId,
    },

    #[error("element {element} is listed {count} times by its container {container}")]
    ContainerMembership {
        element: ElementId,
        container: ContentId,
        count: usize,
    },

    #[error("content {content} lists missing element {element}")]
    MissingElement {
        content: ContentId,
        element: ElementId,
    },

    #[error("content {content} lists element {element} whose container is {actual:?}")]
    ForeignElement {
        content: ContentId,
        element: ElementId,
        actual: Option<ContentId>,
    },

    #[error("element {element} owns missing content {content}")]
    MissingContent {
        element: ElementId,
        content: ContentId,
    },

    #[error("element {element} lists content {content} owned by {owner}")]
    ForeignContent {
        element: ElementId,
        content: ContentId,
        owner: ElementId,
    },

    #[error("content {content} is not listed by its parent element {parent}")]
    OrphanedContent {
        content: ContentId,
        parent: ElementId,
    },

    #[error("page {page} references missing root {root}")]
    MissingRoot { page: PageId, root: ElementId },

    #[error("page {page} root {root} is contained or not a root element")]
    InvalidRoot { page: PageId, root: ElementId },

    #[error("element {element} is its own ancestor")]
    Cycle { element: ElementId },

    #[error("{count} elements are marked selected")]
    MultipleSelected { count: usize },

    #[error("{count} elements are marked highlighted")]
    MultipleHighlighted { count: usize },

    #[error("{count} pages are marked active")]
    MultipleActivePages { count: usize },
}

impl Project {
    /// Every structural invariant the project currently violates
    pub fn check_integrity(&self) -> Vec<IntegrityViolation> {
        let mut violations = Vec::new();

        for element in self.elements() {
            let id = element.id();

            if let Some(container_id) = element.container_id() {
                match self.element_content(container_id) {
                    None => violations.push(IntegrityViolation::MissingContainer {
                        element: id.clone(),
                        container: container_id.clone(),
                    }),
                    Some(container) => {
                        let count = container.element_ids().iter().filter(|e| *e == id).count();
                        if count != 1 {
                            violations.push(IntegrityViolation::ContainerMembership {
                                element: id.clone(),
                                container: container_id.clone(),
                                count,
                            });
                        }
                    }
                }
            }

            for content_id in element.content_ids() {
                match self.element_content(content_id) {
                    None => violations.push(IntegrityViolation::MissingContent {
                        element: id.clone(),
                        content: content_id.clone(),
                    }),
                    Some(content) if content.parent_element_id() != id => {
                        violations.push(IntegrityViolation::ForeignContent {
                            element: id.clone(),
                            content: content_id.clone(),
                            owner: content.parent_element_id().clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            if self.has_cycle(id) {
                violations.push(IntegrityViolation::Cycle { element: id.clone() });
            }
        }

        for content in self.element_contents() {
            for element_id in content.element_ids() {
                match self.element(element_id) {
                    None => violations.push(IntegrityViolation::MissingElement {
                        content: content.id().clone(),
                        element: element_id.clone(),
                    }),
                    Some(element) if element.container_id() != Some(content.id()) => {
                        violations.push(IntegrityViolation::ForeignElement {
                            content: content.id().clone(),
                            element: element_id.clone(),
                            actual: element.container_id().cloned(),
                        })
                    }
                    Some(_) => {}
                }
            }

            let listed = self
                .element(content.parent_element_id())
                .is_some_and(|parent| parent.content_ids().contains(content.id()));
            if !listed {
                violations.push(IntegrityViolation::OrphanedContent {
                    content: content.id().clone(),
                    parent: content.parent_element_id().clone(),
                });
            }
        }

        for page in self.pages() {
            match page.root(self) {
                None => violations.push(IntegrityViolation::MissingRoot {
                    page: page.id().clone(),
                    root: page.root_id().clone(),
                }),
                Some(root) if root.role() != ElementRole::Root || root.container_id().is_some() => {
                    violations.push(IntegrityViolation::InvalidRoot {
                        page: page.id().clone(),
                        root: page.root_id().clone(),
                    })
                }
                Some(_) => {}
            }
        }

        let selected = self.elements().filter(|e| e.is_selected()).count();
        if selected > 1 {
            violations.push(IntegrityViolation::MultipleSelected { count: selected });
        }
        let highlighted = self.elements().filter(|e| e.is_highlighted()).count();
        if highlighted > 1 {
            violations.push(IntegrityViolation::MultipleHighlighted { count: highlighted });
        }
        let active = self.pages().iter().filter(|p| p.is_active()).count();
        if active > 1 {
            violations.push(IntegrityViolation::MultipleActivePages { count: active });
        }

        violations
    }

    fn has_cycle(&self, element_id: &ElementId) -> bool {
        let mut current = self
            .element(element_id)
            .and_then(|element| element.parent(self));
        let mut steps = 0;

        while let Some(parent) = current {
            if parent.id() == element_id || steps > self.element_count() {
                return true;
            }
            steps += 1;
            current = parent.parent(self);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PatternId;
    use crate::pattern::BUILTIN_BOX_PATTERN_ID;

    #[test]
    fn test_fresh_project_has_no_violations() {
        let project = Project::with_page("Test", "Home");
        assert!(project.check_integrity().is_empty());
    }

    #[test]
    fn test_detects_duplicated_membership() {
        let mut project = Project::with_page("Test", "Home");
        let child = project
            .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
            .unwrap();
        let root_content = project.pages()[0].root(&project).unwrap().content_ids()[0].clone();
        project.insert_into_content(&root_content, &child, None);

        // Bypass the idempotent insert to corrupt the list
        project
            .contents
            .get_mut(&root_content)
            .unwrap()
            .element_ids
            .push(child.clone());

        let violations = project.check_integrity();
        assert!(violations.contains(&IntegrityViolation::ContainerMembership {
            element: child,
            container: root_content,
            count: 2,
        }));
    }

    #[test]
    fn test_detects_missing_root() {
        let mut project = Project::with_page("Test", "Home");
        let root = project.pages()[0].root_id().clone();
        project.elements.remove(&root);

        let violations = project.check_integrity();
        assert!(violations
            .iter()
            .any(|v| matches!(v, IntegrityViolation::MissingRoot { .. })));
    }
}
