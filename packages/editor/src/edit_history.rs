//! # Edit History
//!
//! Undo/redo stacks of executed commands.
//!
//! ## Design
//!
//! - Executing a command that succeeds either merges it into the most recent
//!   entry or pushes a new entry
//! - Undo reverts the most recent entry and moves it to the redo stack
//! - Redo executes the entry again and moves it back
//! - Any new successful edit clears the redo stack
//! - Pending project changes are committed after every operation, so
//!   subscribers see each step as one batch
//!
//! An entry whose target no longer resolves (its page was removed outside the
//! history, say) cannot apply. Undo and redo discard such entries and carry
//! on with the next one, so the stacks never hold commands that can only fail.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = EditHistory::new();
//! let mut project = Project::with_page("Website", "Home");
//!
//! let command = ElementNameCommand::new(&project, &element_id, "Header").unwrap();
//! history.execute(&mut project, command);
//!
//! history.undo(&mut project);
//! history.redo(&mut project);
//! ```

use crate::command::{Command, CommandKind, Reversible};
use alva_model::Project;
use tracing::{debug, warn};

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

#[derive(Debug)]
pub struct EditHistory {
    /// Executed commands (most recent last)
    undo_stack: Vec<Command>,

    /// Undone commands (most recent last)
    redo_stack: Vec<Command>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Run a command and record it for undo. Returns false, recording
    /// nothing, when the command fails.
    pub fn execute(&mut self, project: &mut Project, command: impl Into<Command>) -> bool {
        let mut command = command.into();
        let kind = command.kind();

        if !command.execute(project) {
            debug!(%kind, "Command did not apply");
            project.commit();
            return false;
        }

        let merged = self
            .undo_stack
            .last_mut()
            .is_some_and(|top| top.maybe_merge_with(&command));
        if merged {
            debug!(%kind, "Merged command into previous entry");
        } else {
            self.push(command);
        }

        // A new edit invalidates the redo history
        self.redo_stack.clear();
        project.commit();
        true
    }

    fn push(&mut self, command: Command) {
        self.undo_stack.push(command);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let dropped = self.undo_stack.remove(0);
            debug!(kind = %dropped.kind(), max_levels = self.max_levels, "Trimmed undo history");
        }
    }

    /// Undo the most recent entry that still applies
    pub fn undo(&mut self, project: &mut Project) -> bool {
        while let Some(mut command) = self.undo_stack.pop() {
            if command.undo(project) {
                debug!(kind = %command.kind(), "Undid command");
                self.redo_stack.push(command);
                project.commit();
                return true;
            }
            warn!(kind = %command.kind(), "Discarding undo entry that no longer applies");
        }
        project.commit();
        false
    }

    /// Redo the most recently undone entry that still applies
    pub fn redo(&mut self, project: &mut Project) -> bool {
        while let Some(mut command) = self.redo_stack.pop() {
            if command.execute(project) {
                debug!(kind = %command.kind(), "Redid command");
                self.undo_stack.push(command);
                project.commit();
                return true;
            }
            warn!(kind = %command.kind(), "Discarding redo entry that no longer applies");
        }
        project.commit();
        false
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Kind of the entry the next undo would revert, for menu labels
    pub fn undo_kind(&self) -> Option<CommandKind> {
        self.undo_stack.last().map(Command::kind)
    }

    pub fn redo_kind(&self) -> Option<CommandKind> {
        self.redo_stack.last().map(Command::kind)
    }

    /// Drop all history, e.g. when another project is loaded
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}
