//! # Alva Editor
//!
//! Command-based editing on top of the document model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: drag, rename, delete, page tabs         │
//! └─────────────────────────────────────────────┘
//!                     ↓ Command
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditHistory                         │
//! │  - Execute, merge, undo, redo               │
//! │  - Re-resolve targets by id on every run    │
//! │  - Commit change batches to subscribers     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: Project (elements, contents, pages)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Ids, not references**: commands survive pages being closed and
//!    restored because they look their targets up again each time
//! 2. **All or nothing**: a command that cannot apply returns `false` and
//!    leaves the project untouched
//! 3. **Coalesced edits**: repeated renames of one target merge into a
//!    single undo step
//!
//! ## Usage
//!
//! ```rust,ignore
//! use alva_editor::{EditHistory, ElementLocationCommand};
//! use alva_model::{PatternId, Project, BUILTIN_BOX_PATTERN_ID, BUILTIN_PAGE_CHILDREN_SLOT_ID};
//!
//! let mut project = Project::with_page("Website", "Home");
//! let mut history = EditHistory::new();
//!
//! let root = project.pages()[0].root_id().clone();
//! let card = project.instantiate(&PatternId::from(BUILTIN_BOX_PATTERN_ID)).unwrap();
//! let command = ElementLocationCommand::add_child(
//!     &project, &card, &root, &BUILTIN_PAGE_CHILDREN_SLOT_ID.into(), Some(0),
//! ).unwrap();
//!
//! history.execute(&mut project, command);
//! history.undo(&mut project);
//! ```

mod command;
mod edit_history;
mod element_commands;
mod page_commands;

pub use command::{resolve, Command, CommandKind, CommandTarget, ElementTarget, Reversible};
pub use edit_history::{EditHistory, DEFAULT_MAX_LEVELS};
pub use element_commands::{
    ElementLocationCommand, ElementNameCommand, ElementRemoveCommand, PropertyValueCommand,
};
pub use page_commands::{PageAddCommand, PageNameCommand, PageRemoveCommand};
