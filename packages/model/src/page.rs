//! Pages: named document units wrapping one root element tree.

use crate::changes::Change;
use crate::element::{Element, ElementRole};
use crate::error::ModelResult;
use crate::ids::{ElementId, PageId, PatternId};
use crate::pattern::BUILTIN_PAGE_PATTERN_ID;
use crate::project::Project;
use crate::serialization::{ModelTag, SerializedPage};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Page {
    pub(crate) id: PageId,
    pub(crate) name: String,
    pub(crate) edited_name: String,
    pub(crate) name_editable: bool,
    pub(crate) root_id: ElementId,
    pub(crate) active: bool,
}

impl Page {
    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edited_name(&self) -> &str {
        &self.edited_name
    }

    pub fn name_editable(&self) -> bool {
        self.name_editable
    }

    pub fn root_id(&self) -> &ElementId {
        &self.root_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn root<'p>(&self, project: &'p Project) -> Option<&'p Element> {
        project.element(&self.root_id)
    }

    pub fn to_json(&self) -> SerializedPage {
        SerializedPage {
            model: ModelTag::Page,
            id: self.id.clone(),
            name: self.name.clone(),
            edited_name: self.edited_name.clone(),
            name_editable: self.name_editable,
            root_id: self.root_id.clone(),
            active: self.active,
        }
    }

    pub fn from_serialized(data: &SerializedPage) -> ModelResult<Self> {
        ModelTag::Page.expect(data.model)?;

        Ok(Self {
            id: data.id.clone(),
            name: data.name.clone(),
            edited_name: data.edited_name.clone(),
            name_editable: data.name_editable,
            root_id: data.root_id.clone(),
            active: data.active,
        })
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

impl Project {
    /// Build a page around a freshly instantiated root element.
    ///
    /// The root is registered in the element map, but the page itself is not
    /// listed until [`add_page`](Self::add_page) is called.
    pub fn create_page(&mut self, name: impl Into<String>) -> Option<Page> {
        self.create_page_with_id(PageId::new(), name)
    }

    /// [`create_page`](Self::create_page) under a caller-chosen id
    pub fn create_page_with_id(&mut self, page_id: PageId, name: impl Into<String>) -> Option<Page> {
        let root_id = self.instantiate(&PatternId::from(BUILTIN_PAGE_PATTERN_ID))?;
        let name = name.into();

        Some(Page {
            id: page_id,
            edited_name: name.clone(),
            name,
            name_editable: false,
            root_id,
            active: false,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, page_id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|page| &page.id == page_id)
    }

    pub fn page_index(&self, page_id: &PageId) -> Option<usize> {
        self.pages.iter().position(|page| &page.id == page_id)
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.pages.iter().find(|page| page.active)
    }

    /// List a page at `index` (appending when absent). The page is listed
    /// inactive; fails when the id is taken or the root is not a live root.
    pub fn add_page(&mut self, mut page: Page, index: Option<usize>) -> bool {
        if self.page(&page.id).is_some() {
            return false;
        }
        let root_is_live = self
            .element(&page.root_id)
            .is_some_and(|root| root.role() == ElementRole::Root && root.container_id().is_none());
        if !root_is_live {
            return false;
        }

        page.active = false;
        let index = index.unwrap_or(self.pages.len()).min(self.pages.len());
        let page_id = page.id.clone();
        self.pages.insert(index, page);

        debug!(page_id = %page_id, index, "Added page");
        self.record(Change::PageAdded(page_id));
        true
    }

    /// Unlist a page and remove its whole element tree.
    ///
    /// Returns the page as it was (including its active flag) and its index.
    /// No page is active afterwards if the removed one was; picking the next
    /// active page is left to the caller.
    pub fn remove_page(&mut self, page_id: &PageId) -> Option<(Page, usize)> {
        let index = self.page_index(page_id)?;
        let page = self.pages.remove(index);
        self.remove_element(&page.root_id);

        if page.active {
            self.record(Change::ActivePageChanged(None));
        }
        debug!(page_id = %page_id, index, "Removed page");
        self.record(Change::PageRemoved(page_id.clone()));
        Some((page, index))
    }

    /// Make one page active, or none. Clearing the previous page and marking
    /// the new one happen in the same call.
    pub fn set_active_page(&mut self, page_id: Option<&PageId>) -> bool {
        if let Some(page_id) = page_id {
            if self.page(page_id).is_none() {
                return false;
            }
        }

        for page in &mut self.pages {
            page.active = Some(&page.id) == page_id;
        }

        self.record(Change::ActivePageChanged(page_id.cloned()));
        true
    }

    pub fn set_page_name(&mut self, page_id: &PageId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update_page(page_id, |page| {
            page.edited_name = name.clone();
            page.name = name;
        })
    }

    pub fn set_page_edited_name(&mut self, page_id: &PageId, edited_name: impl Into<String>) -> bool {
        let edited_name = edited_name.into();
        self.update_page(page_id, |page| page.edited_name = edited_name)
    }

    pub fn set_page_name_editable(&mut self, page_id: &PageId, editable: bool) -> bool {
        self.update_page(page_id, |page| page.name_editable = editable)
    }

    fn update_page(&mut self, page_id: &PageId, update: impl FnOnce(&mut Page)) -> bool {
        let Some(page) = self.pages.iter_mut().find(|page| &page.id == page_id) else {
            return false;
        };
        update(page);
        self.record(Change::PageChanged(page_id.clone()));
        true
    }
}
