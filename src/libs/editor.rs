use crate::libs::backend::{Backend, DeleteRequest};
use crate::libs::error::{PanelError, PanelResult};
use crate::libs::form::{
    build_add_form, build_edit_form, creation_payload, update_payload, FormValues,
};
use crate::libs::panel::Panel;
use crate::libs::schema::find_table;
use crate::libs::state::{ModalDescriptor, ModalTarget, Phase};
use crate::libs::value::{Record, Value};
use crate::libs::view::{
    Notice, RowGrid, TableStats, View, CONFIRM_DELETE, NO_DATA, SELECT_TABLE_FIRST,
};

const NO_ID_FOR_DELETE: &str = "Error: No ID provided for deletion";
const NO_ID_FOR_EDIT: &str = "Error: No ID provided for editing";

/// Which write a finished round trip belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn verb(&self) -> &'static str {
        match self {
            Mutation::Create => "adding",
            Mutation::Update => "updating",
            Mutation::Delete => "deleting",
        }
    }
}

impl<B, V> Panel<B, V>
where
    B: Backend,
    V: View,
{
    // -------- Read path --------

    /// Loads every row of `table` and makes it the active table.
    pub async fn load_rows(&mut self, table: &str) -> PanelResult<()> {
        log::debug!("loading rows of {}", table);
        let rows = match self.backend.fetch_rows(table).await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("error loading {}: {}", table, e);
                self.view
                    .show_rows_notice(&Notice::Error(format!("Error loading data: {}", e)));
                return Err(e);
            }
        };

        self.state.active_table = Some(table.to_string());
        let primary_key = self.keys.resolve(table).to_string();
        let columns = self.grid_columns(table, &rows);

        self.view.show_stats(&TableStats {
            table: table.to_string(),
            row_count: rows.len(),
            column_count: columns.len(),
            primary_key: primary_key.clone(),
        });

        if rows.is_empty() {
            self.view.show_rows_notice(&Notice::Empty(NO_DATA.to_string()));
            return Ok(());
        }

        self.view.show_rows(&RowGrid {
            table: table.to_string(),
            primary_key,
            columns,
            rows,
        });
        Ok(())
    }

    /// Grid columns: the table's schema columns when the latest listing knows
    /// the table, otherwise every key seen across the rows in first-seen order.
    fn grid_columns(&self, table: &str, rows: &[Record]) -> Vec<String> {
        if let Some(schema) = self.state.schema_of(table) {
            return schema.column_names();
        }
        let mut columns: Vec<String> = Vec::new();
        for key in rows.iter().flat_map(|row| row.keys()) {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        columns
    }

    // -------- Forms --------

    /// Opens the add form for the active table.
    pub async fn open_add_form(&mut self) -> PanelResult<()> {
        let Some(table) = self.state.active_table.clone() else {
            self.view.alert(SELECT_TABLE_FIRST);
            return Err(PanelError::Validation(SELECT_TABLE_FIRST.to_string()));
        };
        self.show_add_form(&table).await
    }

    /// Refetches the schema and opens an add form built from `table`'s columns.
    pub async fn show_add_form(&mut self, table: &str) -> PanelResult<()> {
        let tables = match self.backend.list_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                log::error!("error showing add form: {}", e);
                self.view.alert("Error creating form");
                return Err(e);
            }
        };

        let Some(schema) = find_table(&tables, table) else {
            let err = PanelError::SchemaMismatch(table.to_string());
            log::error!("{}", err);
            self.view.alert(&err.to_string());
            return Err(err);
        };

        let modal = ModalDescriptor {
            table: table.to_string(),
            target: ModalTarget::Create,
            form: build_add_form(schema),
        };
        self.state.tables = tables;
        self.open_modal(modal);
        Ok(())
    }

    /// Opens an edit form pre-filled from `record`. The record's key value is
    /// captured now and sent back on submit.
    pub fn open_edit_form(&mut self, table: &str, record: &Record) -> PanelResult<()> {
        let primary_key = self.keys.resolve(table).to_string();
        let identifier = match record.get(&primary_key) {
            Some(id) if !id.is_missing() => id.clone(),
            _ => {
                log::error!("no {} on record of {}", primary_key, table);
                self.view.alert(NO_ID_FOR_EDIT);
                return Err(PanelError::Validation(NO_ID_FOR_EDIT.to_string()));
            }
        };

        let form = build_edit_form(record, &primary_key, self.state.schema_of(table));
        self.open_modal(ModalDescriptor {
            table: table.to_string(),
            target: ModalTarget::Update { identifier },
            form,
        });
        Ok(())
    }

    // -------- Mutations --------

    /// Submits the open form with the values the user entered.
    pub async fn submit_form(&mut self, values: FormValues) -> PanelResult<()> {
        let Some(modal) = self.state.open_modal.clone() else {
            return Err(PanelError::Validation("No form is open".to_string()));
        };
        match modal.target {
            ModalTarget::Create => self.submit_create(&modal.table, &values).await,
            ModalTarget::Update { identifier } => {
                self.submit_update(&modal.table, &identifier, &values).await
            }
        }
    }

    pub async fn submit_create(&mut self, table: &str, values: &FormValues) -> PanelResult<()> {
        let record = creation_payload(values, (self.clock)());
        self.state.phase = Phase::Submitting;
        let result = self.backend.create_record(table, &record).await;
        self.finish(table, Mutation::Create, result).await
    }

    pub async fn submit_update(
        &mut self,
        table: &str,
        identifier: &Value,
        values: &FormValues,
    ) -> PanelResult<()> {
        let primary_key = self.keys.resolve(table).to_string();
        let record = update_payload(values, &primary_key, identifier);
        self.state.phase = Phase::Submitting;
        let result = self.backend.update_record(table, &record).await;
        self.finish(table, Mutation::Update, result).await
    }

    /// Deletes the record identified by `identifier` after the user confirms.
    /// A missing identifier is rejected before anything is sent.
    pub async fn delete_record(
        &mut self,
        table: &str,
        identifier: Option<&Value>,
    ) -> PanelResult<()> {
        let id = match identifier {
            Some(id) if !id.is_missing() => id.clone(),
            _ => {
                log::error!("no ID provided for deletion");
                self.view.alert(NO_ID_FOR_DELETE);
                return Err(PanelError::Validation(NO_ID_FOR_DELETE.to_string()));
            }
        };

        if !self.view.confirm(CONFIRM_DELETE) {
            return Ok(());
        }

        let request = DeleteRequest {
            primary_key: self.keys.resolve(table).to_string(),
            id,
        };
        self.state.phase = Phase::Submitting;
        let result = self.backend.delete_record(table, &request).await;
        self.finish(table, Mutation::Delete, result).await
    }

    /// Deletes a displayed row, identified by its table's key column.
    pub async fn delete_row(&mut self, table: &str, row: &Record) -> PanelResult<()> {
        let primary_key = self.keys.resolve(table).to_string();
        self.delete_record(table, row.get(&primary_key)).await
    }

    /// Ends a round trip: success closes the form (if any) and reloads the
    /// table, failure alerts and leaves the form open. A reload that fails
    /// after a successful write is shown inline and does not fail the write.
    async fn finish(
        &mut self,
        table: &str,
        mutation: Mutation,
        result: PanelResult<serde_json::Value>,
    ) -> PanelResult<()> {
        self.state.phase = Phase::Idle;
        match result {
            Ok(_) => {
                if mutation != Mutation::Delete {
                    self.close_modal();
                }
                if let Err(e) = self.load_rows(table).await {
                    log::warn!("{} record succeeded but reload failed: {}", mutation.verb(), e);
                }
                Ok(())
            }
            Err(e) => {
                log::error!("error {} record: {}", mutation.verb(), e);
                self.view
                    .alert(&format!("Error {} record: {}", mutation.verb(), e));
                Err(e)
            }
        }
    }
}
