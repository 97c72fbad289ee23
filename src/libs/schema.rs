// schema.rs
use serde::{Deserialize, Serialize};

/// One column as reported by the schema endpoint.
///
/// `sql_type` is the backend's own type tag (`INT`, `DECIMAL(10,2)`,
/// `VARCHAR(255)` ...) and travels on the wire as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable,
        }
    }
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Looks a table up by name in a fetched schema list.
pub fn find_table<'a>(tables: &'a [TableSchema], name: &str) -> Option<&'a TableSchema> {
    tables.iter().find(|t| t.name == name)
}
