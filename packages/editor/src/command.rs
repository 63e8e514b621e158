//! # Commands
//!
//! Reversible, replayable units of structural mutation.
//!
//! Commands never hold references into the project. They memorize ids and
//! re-resolve their targets on every execute and undo, so they keep working
//! after unrelated edits (closing and restoring a page, reloading a subtree
//! from a snapshot) replace the entities they were created against.
//!
//! ```text
//!   Created ──execute──▶ Executed ◀──redo── Undone
//!                           └──────undo──────▶┘
//! ```
//!
//! A failed execute or undo returns `false` and leaves the project untouched.

use crate::element_commands::{
    ElementLocationCommand, ElementNameCommand, ElementRemoveCommand, PropertyValueCommand,
};
use crate::page_commands::{PageAddCommand, PageNameCommand, PageRemoveCommand};
use alva_model::{Element, ElementId, Page, PageId, Project};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ElementLocation,
    ElementRemove,
    ElementName,
    PropertyValue,
    PageAdd,
    PageRemove,
    PageName,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CommandKind::ElementLocation => "Move Element",
            CommandKind::ElementRemove => "Remove Element",
            CommandKind::ElementName => "Rename Element",
            CommandKind::PropertyValue => "Change Property",
            CommandKind::PageAdd => "Add Page",
            CommandKind::PageRemove => "Remove Page",
            CommandKind::PageName => "Rename Page",
        };
        f.write_str(label)
    }
}

/// Entity a command acts on, used to decide whether two commands may merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    Element(ElementId),
    Page(PageId),
}

/// Shared contract of every concrete command
pub trait Reversible {
    /// Apply the command; also used to redo it after an undo
    fn execute(&mut self, project: &mut Project) -> bool;

    /// Revert the most recent execute
    fn undo(&mut self, project: &mut Project) -> bool;

    fn kind(&self) -> CommandKind;

    fn target(&self) -> CommandTarget;
}

/// Element and page ids an element command re-resolves before every run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTarget {
    pub element_id: ElementId,
    pub page_id: PageId,
}

impl ElementTarget {
    /// Memorize an element together with the page it lives on. Elements not
    /// yet placed in a page tree are attributed to the active page.
    pub fn capture(project: &Project, element_id: &ElementId) -> Option<Self> {
        let element = project.element(element_id)?;
        let page = element.page(project).or_else(|| project.active_page())?;

        Some(Self {
            element_id: element_id.clone(),
            page_id: page.id().clone(),
        })
    }

    pub fn resolve<'p>(&self, project: &'p Project) -> Option<(&'p Element, &'p Page)> {
        resolve(project, &self.element_id, &self.page_id)
    }
}

/// Look up a command's element and page by id.
///
/// Absent when either no longer exists; callers must then abort without
/// mutating anything.
pub fn resolve<'p>(
    project: &'p Project,
    element_id: &ElementId,
    page_id: &PageId,
) -> Option<(&'p Element, &'p Page)> {
    let Some(page) = project.page(page_id) else {
        warn!(page_id = %page_id, "Command page no longer exists");
        return None;
    };
    let Some(element) = project.element(element_id) else {
        warn!(element_id = %element_id, "Command element no longer exists");
        return None;
    };
    Some((element, page))
}

/// Any command the edit history can hold
#[derive(Debug, Clone)]
pub enum Command {
    ElementLocation(ElementLocationCommand),
    ElementRemove(ElementRemoveCommand),
    ElementName(ElementNameCommand),
    PropertyValue(PropertyValueCommand),
    PageAdd(PageAddCommand),
    PageRemove(PageRemoveCommand),
    PageName(PageNameCommand),
}

impl Command {
    fn as_reversible(&self) -> &dyn Reversible {
        match self {
            Command::ElementLocation(command) => command,
            Command::ElementRemove(command) => command,
            Command::ElementName(command) => command,
            Command::PropertyValue(command) => command,
            Command::PageAdd(command) => command,
            Command::PageRemove(command) => command,
            Command::PageName(command) => command,
        }
    }

    fn as_reversible_mut(&mut self) -> &mut dyn Reversible {
        match self {
            Command::ElementLocation(command) => command,
            Command::ElementRemove(command) => command,
            Command::ElementName(command) => command,
            Command::PropertyValue(command) => command,
            Command::PageAdd(command) => command,
            Command::PageRemove(command) => command,
            Command::PageName(command) => command,
        }
    }

    /// Fold `next`, which has already executed, into this command so both
    /// undo as one step.
    ///
    /// Requires the same kind and target; only renames and property edits
    /// ever merge.
    pub fn maybe_merge_with(&mut self, next: &Command) -> bool {
        if self.kind() != next.kind() || self.target() != next.target() {
            return false;
        }

        match (self, next) {
            (Command::ElementName(top), Command::ElementName(next)) => top.absorb(next),
            (Command::PropertyValue(top), Command::PropertyValue(next)) => top.absorb(next),
            (Command::PageName(top), Command::PageName(next)) => top.absorb(next),
            _ => false,
        }
    }
}

impl Reversible for Command {
    fn execute(&mut self, project: &mut Project) -> bool {
        self.as_reversible_mut().execute(project)
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        self.as_reversible_mut().undo(project)
    }

    fn kind(&self) -> CommandKind {
        self.as_reversible().kind()
    }

    fn target(&self) -> CommandTarget {
        self.as_reversible().target()
    }
}

macro_rules! impl_from_command {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Command {
                fn from(command: $ty) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    ElementLocation(ElementLocationCommand),
    ElementRemove(ElementRemoveCommand),
    ElementName(ElementNameCommand),
    PropertyValue(PropertyValueCommand),
    PageAdd(PageAddCommand),
    PageRemove(PageRemoveCommand),
    PageName(PageNameCommand),
);

#[cfg(test)]
mod tests {
    use super::*;
    use alva_model::{PatternId, BUILTIN_BOX_PATTERN_ID};

    #[test]
    fn test_capture_falls_back_to_active_page() {
        let mut project = Project::with_page("Test", "Home");
        let loose = project
            .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
            .unwrap();

        let target = ElementTarget::capture(&project, &loose).unwrap();
        assert_eq!(&target.page_id, project.active_page().unwrap().id());
        assert!(target.resolve(&project).is_some());
    }

    #[test]
    fn test_resolve_fails_once_page_is_gone() {
        let mut project = Project::with_page("Test", "Home");
        let page_id = project.pages()[0].id().clone();
        let root = project.pages()[0].root_id().clone();
        let target = ElementTarget::capture(&project, &root).unwrap();

        project.remove_page(&page_id);
        assert!(target.resolve(&project).is_none());
        assert!(resolve(&project, &root, &page_id).is_none());
    }

    #[test]
    fn test_rename_commands_merge_only_on_same_target() {
        let mut project = Project::with_page("Test", "Home");
        let box_pattern = PatternId::from(BUILTIN_BOX_PATTERN_ID);
        let a = project.instantiate(&box_pattern).unwrap();
        let b = project.instantiate(&box_pattern).unwrap();

        let mut first = Command::from(ElementNameCommand::new(&project, &a, "One").unwrap());
        let same = Command::from(ElementNameCommand::new(&project, &a, "Two").unwrap());
        let other = Command::from(ElementNameCommand::new(&project, &b, "Three").unwrap());

        assert!(!first.maybe_merge_with(&other));
        assert!(first.maybe_merge_with(&same));
        assert_eq!(first.kind(), CommandKind::ElementName);
        assert_eq!(first.target(), CommandTarget::Element(a));
    }

    #[test]
    fn test_different_kinds_never_merge() {
        let mut project = Project::with_page("Test", "Home");
        let element = project
            .instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID))
            .unwrap();

        let mut rename = Command::from(ElementNameCommand::new(&project, &element, "A").unwrap());
        let property = Command::from(
            PropertyValueCommand::new(&project, &element, &"label".into(), None).unwrap(),
        );
        assert!(!rename.maybe_merge_with(&property));
    }
}
