use crate::libs::backend::DeleteRequest;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::schema::{ColumnSchema, TableSchema};
use crate::libs::statement::{ColumnTypes, Statement, StatementBuilder};
use crate::libs::value::{Record, Value};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row, query};
use std::time::Duration;

/// Data source behind the REST surface.
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trips a trivial query.
    async fn ping(&self) -> StoreResult<()>;

    async fn tables(&self) -> StoreResult<Vec<TableSchema>>;

    async fn rows(&self, table: &str) -> StoreResult<Vec<Record>>;

    async fn insert(&self, table: &str, record: &Record) -> StoreResult<()>;

    /// Sets `changes` on the row whose `primary_key` equals `id`.
    async fn update(
        &self,
        table: &str,
        primary_key: &str,
        id: &Value,
        changes: &Record,
    ) -> StoreResult<()>;

    async fn delete(&self, table: &str, primary_key: &str, id: &Value) -> StoreResult<()>;
}

/// Pulls the key out of an update body, leaving the columns to set.
pub fn split_update(mut body: Record, primary_key: &str) -> StoreResult<(Value, Record)> {
    let id = body
        .shift_remove(primary_key)
        .ok_or_else(|| StoreError::MissingPrimaryKey(primary_key.to_string()))?;
    if body.is_empty() {
        return Err(StoreError::NoUpdateData);
    }
    Ok((id, body))
}

/// Checks a delete body names both a key column and a value.
pub fn delete_target(request: &DeleteRequest) -> StoreResult<(&str, &Value)> {
    if request.primary_key.is_empty() || request.id.is_missing() {
        return Err(StoreError::MissingDeleteTarget);
    }
    Ok((&request.primary_key, &request.id))
}

/// Display tag for a column from its `format_type` text, in the short
/// spelling forms key off: `numeric(10,2)` is `DECIMAL(10,2)`, `real` and
/// `double precision` are `FLOAT`, `character varying(255)` is `VARCHAR(255)`.
fn display_type(formatted: &str) -> String {
    let upper = formatted.trim().to_uppercase();
    let (base, zone) = match upper.strip_suffix(" WITH TIME ZONE") {
        Some(base) => (base, "TZ"),
        None => (upper.strip_suffix(" WITHOUT TIME ZONE").unwrap_or(upper.as_str()), ""),
    };
    let (name, rest) = base.split_at(base.find(['(', '[']).unwrap_or(base.len()));
    let name = match name {
        "NUMERIC" => "DECIMAL",
        "REAL" | "DOUBLE PRECISION" => "FLOAT",
        "CHARACTER VARYING" => "VARCHAR",
        "CHARACTER" => "CHAR",
        "BIT VARYING" => "VARBIT",
        other => other,
    };
    format!("{name}{zone}{rest}")
}

// -------- PostgreSQL --------

const COLUMNS_SQL: &str = r#"
    SELECT
        c.relname::text,
        a.attname::text,
        format_type(a.atttypid, a.atttypmod),
        NOT a.attnotnull
    FROM pg_attribute a
    JOIN pg_class c ON c.oid = a.attrelid
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = current_schema()
        AND c.relkind IN ('r', 'p')
        AND a.attnum > 0
        AND NOT a.attisdropped
    ORDER BY c.relname, a.attnum
"#;

const TABLE_TYPES_SQL: &str = r#"
    SELECT c.column_name::text, c.udt_name::text
    FROM information_schema.columns c
    WHERE c.table_schema = current_schema()
        AND c.table_name = $1
    ORDER BY c.ordinal_position
"#;

/// [`Store`] over a PostgreSQL pool, introspecting the system catalogs.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> sqlx::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Column types of `table`; an unknown table has none.
    async fn column_types(&self, table: &str) -> StoreResult<ColumnTypes> {
        let rows = query(TABLE_TYPES_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        let mut types = ColumnTypes::new();
        for row in rows {
            types.insert(row.try_get::<String, _>(0)?, row.try_get::<String, _>(1)?);
        }
        if types.is_empty() {
            return Err(StoreError::UnknownTable(table.to_string()));
        }
        Ok(types)
    }

    async fn execute(&self, statement: Statement) -> StoreResult<u64> {
        log::debug!("{}", statement.sql);
        let mut q = query(&statement.sql);
        for param in statement.params {
            q = q.bind(param);
        }
        let result = q.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn tables(&self) -> StoreResult<Vec<TableSchema>> {
        let rows = query(COLUMNS_SQL).fetch_all(&self.pool).await?;
        let mut tables: Vec<TableSchema> = Vec::new();
        for row in rows {
            let table: String = row.try_get(0)?;
            let name: String = row.try_get(1)?;
            let formatted: String = row.try_get(2)?;
            let nullable: bool = row.try_get(3)?;
            let column = ColumnSchema::new(name, display_type(&formatted), nullable);

            if tables.last().is_none_or(|last| last.name != table) {
                tables.push(TableSchema::new(table, Vec::new()));
            }
            if let Some(last) = tables.last_mut() {
                last.columns.push(column);
            }
        }
        log::debug!("found {} tables", tables.len());
        Ok(tables)
    }

    async fn rows(&self, table: &str) -> StoreResult<Vec<Record>> {
        // validates the names before they are spliced into SQL
        let types = self.column_types(table).await?;
        let rows = query(&StatementBuilder::select_json(table, &types))
            .fetch_all(&self.pool)
            .await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let json: String = row.try_get(0)?;
            records.push(serde_json::from_str::<Record>(&json)?);
        }
        Ok(records)
    }

    async fn insert(&self, table: &str, record: &Record) -> StoreResult<()> {
        let types = self.column_types(table).await?;
        let statement = StatementBuilder::new(table, &types).values(record)?.insert();
        self.execute(statement).await?;
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        primary_key: &str,
        id: &Value,
        changes: &Record,
    ) -> StoreResult<()> {
        let types = self.column_types(table).await?;
        let statement = StatementBuilder::new(table, &types)
            .values(changes)?
            .r#where(primary_key, id)?
            .update();
        let affected = self.execute(statement).await?;
        log::debug!("updated {} rows of {}", affected, table);
        Ok(())
    }

    async fn delete(&self, table: &str, primary_key: &str, id: &Value) -> StoreResult<()> {
        let types = self.column_types(table).await?;
        let statement = StatementBuilder::new(table, &types)
            .r#where(primary_key, id)?
            .delete();
        let affected = self.execute(statement).await?;
        log::debug!("deleted {} rows of {}", affected, table);
        Ok(())
    }
}
