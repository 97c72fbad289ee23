use crate::libs::error::{StoreError, StoreResult};
use crate::libs::value::{bind_text, Value};
use indexmap::IndexMap;

/// Column name -> PostgreSQL type name, for one table, in column order.
pub type ColumnTypes = IndexMap<String, String>;

/// Whether a column of this type reaches JSON as text. `numeric` keeps all
/// its digits that way, and json or array values stay scalar cells.
fn read_as_text(udt_name: &str) -> bool {
    matches!(udt_name, "numeric" | "json" | "jsonb") || udt_name.starts_with('_')
}

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL text plus its positional parameters. Every parameter is bound as text
/// (or NULL) and cast to the column's type in the SQL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Option<String>>,
}

/// Builds single-table statements over a dynamic record.
///
/// Only columns present in `types` are accepted, so every identifier that
/// reaches the SQL has been checked against the introspected schema.
pub struct StatementBuilder<'a> {
    table: String,
    types: &'a ColumnTypes,
    values: Vec<(String, String)>,
    wheres: Vec<String>,
    params: Vec<Option<String>>,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(table: &str, types: &'a ColumnTypes) -> Self {
        Self {
            table: table.to_string(),
            types,
            values: vec![],
            wheres: vec![],
            params: Vec::new(),
        }
    }

    /// `SELECT` of every row, each as one JSON object in column order.
    pub fn select_json(table: &str, types: &ColumnTypes) -> String {
        let columns: Vec<String> = types
            .iter()
            .map(|(column, ty)| {
                let column = quote_ident(column);
                if read_as_text(ty) {
                    format!("{column}::text AS {column}")
                } else {
                    column
                }
            })
            .collect();
        format!(
            "SELECT row_to_json(t)::text FROM (SELECT {} FROM {}) AS t",
            columns.join(", "),
            quote_ident(table)
        )
    }

    fn placeholder(&mut self, column: &str, value: &Value) -> StoreResult<String> {
        let types = self.types;
        let ty = types
            .get(column)
            .ok_or_else(|| StoreError::UnknownColumn(column.to_string()))?;
        self.params.push(bind_text(value));
        Ok(format!("CAST(${} AS {})", self.params.len(), quote_ident(ty)))
    }

    /// Adds a column value for an `INSERT` or an `UPDATE ... SET`.
    pub fn value(mut self, column: &str, value: &Value) -> StoreResult<Self> {
        let placeholder = self.placeholder(column, value)?;
        self.values.push((quote_ident(column), placeholder));
        Ok(self)
    }

    pub fn values<'r, I>(mut self, record: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (&'r String, &'r Value)>,
    {
        for (column, value) in record {
            self = self.value(column, value)?;
        }
        Ok(self)
    }

    pub fn r#where(mut self, column: &str, value: &Value) -> StoreResult<Self> {
        let placeholder = self.placeholder(column, value)?;
        self.wheres
            .push(format!("{} = {}", quote_ident(column), placeholder));
        Ok(self)
    }

    fn where_clause(&self) -> String {
        if self.wheres.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.wheres.join(" AND "))
        }
    }

    pub fn insert(self) -> Statement {
        let sql = if self.values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(&self.table))
        } else {
            let (cols, placeholders): (Vec<String>, Vec<String>) =
                self.values.iter().cloned().unzip();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(&self.table),
                cols.join(", "),
                placeholders.join(", ")
            )
        };
        Statement {
            sql,
            params: self.params,
        }
    }

    pub fn update(self) -> Statement {
        let sets: Vec<String> = self
            .values
            .iter()
            .map(|(col, placeholder)| format!("{} = {}", col, placeholder))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}{}",
            quote_ident(&self.table),
            sets.join(", "),
            self.where_clause()
        );
        Statement {
            sql,
            params: self.params,
        }
    }

    pub fn delete(self) -> Statement {
        let sql = format!("DELETE FROM {}{}", quote_ident(&self.table), self.where_clause());
        Statement {
            sql,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::value::Record;

    fn types() -> ColumnTypes {
        [("order_id", "int4"), ("price", "numeric"), ("note", "varchar")]
            .iter()
            .map(|(c, t)| (c.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_ident("orders"), "\"orders\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn insert_casts_every_value() {
        let types = types();
        let mut record = Record::new();
        record.insert("price".into(), Value::from("9.50"));
        record.insert("note".into(), Value::Null);
        let stmt = StatementBuilder::new("orders", &types)
            .values(&record)
            .unwrap()
            .insert();
        assert_eq!(
            stmt.sql,
            "INSERT INTO \"orders\" (\"price\", \"note\") VALUES (CAST($1 AS \"numeric\"), CAST($2 AS \"varchar\"))"
        );
        assert_eq!(stmt.params, vec![Some("9.50".to_string()), None]);
    }

    #[test]
    fn update_binds_key_last() {
        let types = types();
        let stmt = StatementBuilder::new("orders", &types)
            .value("note", &Value::from("hi"))
            .unwrap()
            .r#where("order_id", &Value::from(7))
            .unwrap()
            .update();
        assert_eq!(
            stmt.sql,
            "UPDATE \"orders\" SET \"note\" = CAST($1 AS \"varchar\") WHERE \"order_id\" = CAST($2 AS \"int4\")"
        );
        assert_eq!(stmt.params, vec![Some("hi".to_string()), Some("7".to_string())]);
    }

    #[test]
    fn delete_and_select() {
        let types = types();
        let stmt = StatementBuilder::new("orders", &types)
            .r#where("order_id", &Value::from(3))
            .unwrap()
            .delete();
        assert_eq!(stmt.sql, "DELETE FROM \"orders\" WHERE \"order_id\" = CAST($1 AS \"int4\")");
        assert_eq!(
            StatementBuilder::select_json("orders", &types),
            "SELECT row_to_json(t)::text FROM (SELECT \"order_id\", \"price\"::text AS \"price\", \"note\" FROM \"orders\") AS t"
        );
    }

    #[test]
    fn decimals_json_and_arrays_are_selected_as_text() {
        assert!(read_as_text("numeric"));
        assert!(read_as_text("jsonb"));
        assert!(read_as_text("_int4"));
        assert!(!read_as_text("int8"));
        assert!(!read_as_text("float8"));
        assert!(!read_as_text("varchar"));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let types = types();
        let err = StatementBuilder::new("orders", &types)
            .value("drop table", &Value::from(1))
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::UnknownColumn(c) if c == "drop table"));
    }

    #[test]
    fn empty_insert_uses_defaults() {
        let types = types();
        let stmt = StatementBuilder::new("orders", &types).insert();
        assert_eq!(stmt.sql, "INSERT INTO \"orders\" DEFAULT VALUES");
        assert!(stmt.params.is_empty());
    }
}
