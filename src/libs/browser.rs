use crate::libs::backend::Backend;
use crate::libs::error::PanelResult;
use crate::libs::panel::Panel;
use crate::libs::view::{Notice, View, NO_TABLES};

impl<B, V> Panel<B, V>
where
    B: Backend,
    V: View,
{
    // -------- Table list --------

    /// Fetches the schema list and renders one collapsed entry per table.
    ///
    /// An empty list renders the empty-state notice and nothing else is
    /// requested. A failed fetch renders inline and is returned.
    pub async fn list_tables(&mut self) -> PanelResult<()> {
        log::debug!("fetching tables");
        let tables = match self.backend.list_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                log::error!("error fetching tables: {}", e);
                self.view
                    .show_tables_notice(&Notice::Error(format!("Error loading tables: {}", e)));
                return Err(e);
            }
        };

        self.state.expanded.clear();
        if tables.is_empty() {
            self.state.tables.clear();
            self.view.show_tables_notice(&Notice::Empty(NO_TABLES.to_string()));
            return Ok(());
        }

        log::debug!("received {} tables", tables.len());
        self.view.show_tables(&tables);
        self.state.tables = tables;
        Ok(())
    }

    // -------- Selection --------

    /// Toggles the table's entry open or closed and loads its rows.
    pub async fn select_table(&mut self, table: &str) -> PanelResult<()> {
        let expanded = self.state.toggle_expanded(table);
        self.view.set_expanded(table, expanded);
        self.load_rows(table).await
    }
}
