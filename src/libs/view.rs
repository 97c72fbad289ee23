use crate::libs::schema::TableSchema;
use crate::libs::state::ModalDescriptor;
use crate::libs::value::{Record, Value};

pub const NO_TABLES: &str = "No tables found in the database.";
pub const NO_DATA: &str = "No data available";
pub const SELECT_TABLE_FIRST: &str = "Please select a table first";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this record?";

/// A message shown in place of a list or grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Empty(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Empty(s) | Notice::Error(s) => s,
        }
    }
}

/// Header figures for the active table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub table: String,
    pub row_count: usize,
    pub column_count: usize,
    pub primary_key: String,
}

/// Rows of the active table laid out against a fixed column list.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGrid {
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl RowGrid {
    /// Cell text; a key the row lacks renders empty.
    pub fn cell(&self, row: &Record, column: &str) -> String {
        row.get(column).map(Value::to_string).unwrap_or_default()
    }

    pub fn identifier<'a>(&self, row: &'a Record) -> Option<&'a Value> {
        row.get(&self.primary_key)
    }
}

/// The rendered surface of the panel.
///
/// The controller pushes every visible change through here and never reads
/// state back out of it.
pub trait View {
    fn show_tables(&mut self, tables: &[TableSchema]);

    fn show_tables_notice(&mut self, notice: &Notice);

    fn set_expanded(&mut self, table: &str, expanded: bool);

    fn show_stats(&mut self, stats: &TableStats);

    fn show_rows(&mut self, grid: &RowGrid);

    fn show_rows_notice(&mut self, notice: &Notice);

    fn open_modal(&mut self, modal: &ModalDescriptor);

    fn close_modal(&mut self);

    fn alert(&mut self, message: &str);

    /// Asks the user a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}
