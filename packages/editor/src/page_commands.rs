//! Commands adding, removing and renaming pages.
//!
//! Page add and remove are a symmetric pair. Both snapshot the page's root
//! tree when they take it out of the project, so the opposite direction
//! restores the page with identical element ids and any element command
//! memorized against it resolves again.

use crate::command::{CommandKind, CommandTarget, Reversible};
use alva_model::{FocusedItemType, Page, PageId, Project, Snapshot};
use tracing::{debug, warn};

/// Page taken out of the project along with its root tree
#[derive(Debug, Clone)]
struct DetachedPage {
    page: Page,
    snapshot: Snapshot,
}

/// Re-list a detached page at `index`; rolls back the restored tree when the
/// page cannot be listed
fn reattach(project: &mut Project, detached: &DetachedPage, index: Option<usize>) -> bool {
    if project.page(detached.page.id()).is_some() || !project.restore_snapshot(&detached.snapshot) {
        return false;
    }
    if !project.add_page(detached.page.clone(), index) {
        project.remove_element(detached.page.root_id());
        return false;
    }
    true
}

/// Unlist a page and capture its tree; absent when the page is unknown
fn detach(project: &mut Project, page_id: &PageId) -> Option<(DetachedPage, usize)> {
    let root_id = project.page(page_id)?.root_id().clone();
    let snapshot = project.snapshot_subtree(&root_id)?;
    let (page, index) = project.remove_page(page_id)?;
    Some((DetachedPage { page, snapshot }, index))
}

fn restore_active(project: &mut Project, page_id: Option<&PageId>) {
    let page_id = page_id.filter(|id| project.page(id).is_some());
    project.set_active_page(page_id);
}

/// Page an add command lists on its first execute
#[derive(Debug, Clone)]
enum PendingPage {
    /// Built on execute, root included
    Create(String),
    /// Built by the caller with [`Project::create_page`]
    Built(Page),
}

/// List a new page and make it active. Undo removes it and reactivates the
/// page that was active before.
#[derive(Debug, Clone)]
pub struct PageAddCommand {
    page_id: PageId,
    index: Option<usize>,
    pending: Option<PendingPage>,
    detached: Option<DetachedPage>,
    previous_active: Option<PageId>,
}

impl PageAddCommand {
    /// Wrap a page built with [`Project::create_page`]
    pub fn new(page: Page, index: Option<usize>) -> Self {
        Self {
            page_id: page.id().clone(),
            index,
            pending: Some(PendingPage::Built(page)),
            detached: None,
            previous_active: None,
        }
    }

    /// Add a new page named `name`. Nothing enters the project until the
    /// command executes.
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            page_id: PageId::new(),
            index: None,
            pending: Some(PendingPage::Create(name.into())),
            detached: None,
            previous_active: None,
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    fn add_pending(&self, project: &mut Project, pending: &PendingPage) -> bool {
        match pending {
            PendingPage::Built(page) => project.add_page(page.clone(), self.index),
            PendingPage::Create(name) => {
                let Some(page) = project.create_page_with_id(self.page_id.clone(), name.clone()) else {
                    return false;
                };
                let root_id = page.root_id().clone();
                if !project.add_page(page, self.index) {
                    project.remove_element(&root_id);
                    return false;
                }
                true
            }
        }
    }
}

impl Reversible for PageAddCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        let previous_active = project.active_page().map(|page| page.id().clone());

        let added = match (&self.pending, &self.detached) {
            (Some(pending), _) => self.add_pending(project, pending),
            (None, Some(detached)) => reattach(project, detached, self.index),
            (None, None) => false,
        };
        if !added {
            warn!(page_id = %self.page_id, "Could not add page");
            return false;
        }

        self.pending = None;
        self.detached = None;
        self.previous_active = previous_active;
        project.set_active_page(Some(&self.page_id));
        project.set_focused_item_type(FocusedItemType::Page);

        debug!(page_id = %self.page_id, "Added page");
        true
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        let Some((detached, index)) = detach(project, &self.page_id) else {
            warn!(page_id = %self.page_id, "Added page no longer exists");
            return false;
        };

        self.index = Some(index);
        self.detached = Some(detached);
        restore_active(project, self.previous_active.as_ref());

        debug!(page_id = %self.page_id, "Undid page add");
        true
    }

    fn kind(&self) -> CommandKind {
        CommandKind::PageAdd
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Page(self.page_id.clone())
    }
}

/// Remove a page. When the removed page was active, the page before it
/// becomes active, or none when it was the first page.
#[derive(Debug, Clone)]
pub struct PageRemoveCommand {
    page_id: PageId,
    index: usize,
    detached: Option<DetachedPage>,
    previous_active: Option<PageId>,
}

impl PageRemoveCommand {
    pub fn new(project: &Project, page_id: &PageId) -> Option<Self> {
        Some(Self {
            page_id: page_id.clone(),
            index: project.page_index(page_id)?,
            detached: None,
            previous_active: None,
        })
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }
}

impl Reversible for PageRemoveCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        let previous_active = project.active_page().map(|page| page.id().clone());
        let Some((detached, index)) = detach(project, &self.page_id) else {
            warn!(page_id = %self.page_id, "Page to remove no longer exists");
            return false;
        };

        if detached.page.is_active() {
            let next_active = index
                .checked_sub(1)
                .and_then(|i| project.pages().get(i))
                .map(|page| page.id().clone());
            project.set_active_page(next_active.as_ref());
        }

        self.index = index;
        self.detached = Some(detached);
        self.previous_active = previous_active;

        debug!(page_id = %self.page_id, index, "Removed page");
        true
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        let Some(detached) = self.detached.as_ref() else {
            return false;
        };
        if !reattach(project, detached, Some(self.index)) {
            warn!(page_id = %self.page_id, "Could not restore removed page");
            return false;
        }

        self.detached = None;
        restore_active(project, self.previous_active.as_ref());

        debug!(page_id = %self.page_id, index = self.index, "Restored page");
        true
    }

    fn kind(&self) -> CommandKind {
        CommandKind::PageRemove
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Page(self.page_id.clone())
    }
}

/// Rename a page
#[derive(Debug, Clone)]
pub struct PageNameCommand {
    page_id: PageId,
    name: String,
    previous_name: Option<String>,
}

impl PageNameCommand {
    pub fn new(project: &Project, page_id: &PageId, name: impl Into<String>) -> Option<Self> {
        project.page(page_id)?;
        Some(Self {
            page_id: page_id.clone(),
            name: name.into(),
            previous_name: None,
        })
    }

    pub(crate) fn absorb(&mut self, next: &PageNameCommand) -> bool {
        self.name = next.name.clone();
        true
    }
}

impl Reversible for PageNameCommand {
    fn execute(&mut self, project: &mut Project) -> bool {
        let Some(page) = project.page(&self.page_id) else {
            warn!(page_id = %self.page_id, "Command page no longer exists");
            return false;
        };
        self.previous_name = Some(page.name().to_string());
        project.set_page_name(&self.page_id, self.name.clone())
    }

    fn undo(&mut self, project: &mut Project) -> bool {
        let Some(previous) = self.previous_name.clone() else {
            return false;
        };
        project.set_page_name(&self.page_id, previous)
    }

    fn kind(&self) -> CommandKind {
        CommandKind::PageName
    }

    fn target(&self) -> CommandTarget {
        CommandTarget::Page(self.page_id.clone())
    }
}
