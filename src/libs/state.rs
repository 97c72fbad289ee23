use crate::libs::form::Form;
use crate::libs::schema::{find_table, TableSchema};
use crate::libs::value::Value;
use std::collections::BTreeSet;

/// What the single open modal is editing.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalTarget {
    /// New record in the table.
    Create,
    /// Existing record, identified by the key value captured when the form
    /// was opened.
    Update { identifier: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalDescriptor {
    pub table: String,
    pub target: ModalTarget,
    pub form: Form,
}

/// Where the current mutation is in its single round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
}

/// Everything the panel knows between user actions.
///
/// Held by the controller and never reconstructed from what is on screen.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub active_table: Option<String>,
    pub open_modal: Option<ModalDescriptor>,
    pub phase: Phase,
    /// Tables whose column list is shown expanded in the table list.
    pub expanded: BTreeSet<String>,
    /// Schema list from the latest table listing.
    pub tables: Vec<TableSchema>,
}

impl AppState {
    pub fn schema_of(&self, table: &str) -> Option<&TableSchema> {
        find_table(&self.tables, table)
    }

    /// Flips the expanded state of a table entry, returning the new state.
    pub fn toggle_expanded(&mut self, table: &str) -> bool {
        if self.expanded.remove(table) {
            false
        } else {
            self.expanded.insert(table.to_string());
            true
        }
    }

    pub fn is_expanded(&self, table: &str) -> bool {
        self.expanded.contains(table)
    }
}
