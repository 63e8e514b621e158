//! # Alva Model
//!
//! Structural document model of the designer: a change-tracked tree of
//! elements organized into named content slots, grouped into pages and owned
//! by a project.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Project (aggregate root)                    │
//! │  - flat maps: ElementId → Element           │
//! │               ContentId → ElementContent    │
//! │  - ordered pages, pattern libraries         │
//! │  - selection / highlight / focus            │
//! │  - change queue, committed in batches       │
//! └─────────────────────────────────────────────┘
//!          ↓ id references, never pointers
//! ┌─────────────────────────────────────────────┐
//! │ Page → root Element → ElementContent → ...  │
//! └─────────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────────┐
//! │ Serialized records (flat, tagged, by id)    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Project is source of truth**: tree shape is derived from id lookups
//! 2. **No partial edits**: fallible operations return `false` / `None` and
//!    leave the project untouched
//! 3. **Exclusive state is stored once**: selection and highlight are ids on
//!    the project, not per-element conventions
//! 4. **Observers see committed state**: changes are buffered until `commit`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use alva_model::{Project, PatternId, BUILTIN_BOX_PATTERN_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID};
//!
//! let mut project = Project::with_page("Website", "Home");
//! let root = project.pages()[0].root_id().clone();
//!
//! let card = project.instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID)).unwrap();
//! project.set_element_parent(&card, &root, &BUILTIN_PAGE_CHILDREN_SLOT_ID.into(), None);
//! project.commit();
//! ```

mod changes;
mod element;
mod element_content;
mod error;
mod ids;
mod integrity;
mod page;
mod pattern;
mod persistence;
mod project;
mod serialization;
mod user_store;

pub use changes::{Change, SubscriptionId};
pub use element::{Element, ElementRole, PropertyValue};
pub use element_content::ElementContent;
pub use error::{ModelError, ModelResult};
pub use ids::{
    ActionId, ContentId, ElementId, LibraryId, PageId, PatternId, ProjectId, PropertyId, SlotId,
};
pub use integrity::IntegrityViolation;
pub use page::Page;
pub use pattern::{
    Pattern, PatternKind, PatternLibrary, PatternSlot, SlotType, BUILTIN_BOX_CHILDREN_SLOT_ID,
    BUILTIN_BOX_PATTERN_ID, BUILTIN_LIBRARY_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID,
    BUILTIN_PAGE_PATTERN_ID, BUILTIN_PLACEHOLDER_PATTERN_ID, BUILTIN_TEXT_PATTERN_ID,
};
pub use project::{FocusedItem, FocusedItemType, Project, Snapshot};
pub use serialization::{
    ModelTag, SerializedElement, SerializedElementContent, SerializedPage, SerializedProject,
};
pub use user_store::{ActionOperation, UserStore, UserStoreAction, UserStoreProperty};
