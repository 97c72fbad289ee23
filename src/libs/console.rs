use crate::libs::schema::TableSchema;
use crate::libs::state::ModalDescriptor;
use crate::libs::view::{Notice, RowGrid, TableStats, View};
use dialoguer::Confirm;
use std::io::Write;

const MAX_CELL_WIDTH: usize = 24;

/// [`View`] that prints to a terminal and asks questions with dialoguer.
pub struct ConsoleView<W: Write> {
    out: W,
    tables: Vec<TableSchema>,
    expanded: Vec<String>,
    grid: Option<RowGrid>,
}

impl ConsoleView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tables: Vec::new(),
            expanded: Vec::new(),
            grid: None,
        }
    }

    /// Rows last shown, for picking one to edit or delete.
    pub fn grid(&self) -> Option<&RowGrid> {
        self.grid.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::error!("console write failed: {}", e);
        }
    }

    fn render_tree(&mut self) {
        let mut lines = Vec::new();
        for table in &self.tables {
            let open = self.expanded.contains(&table.name);
            lines.push(format!("{} {}", if open { "v" } else { ">" }, table.name));
            if open {
                for col in &table.columns {
                    lines.push(format!("    - {} ({})", col.name, col.sql_type));
                }
            }
        }
        for l in lines {
            self.line(&l);
        }
    }
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('~');
    clipped
}

/// Lays the grid out as fixed-width text, one line per row.
pub fn render_grid(grid: &RowGrid) -> Vec<String> {
    let cells: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| grid.columns.iter().map(|c| clip(&grid.cell(row, c))).collect())
        .collect();

    let widths: Vec<usize> = grid
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(clip(c).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let join = |values: Vec<String>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format!("  # | {}", join(grid.columns.iter().map(|c| clip(c)).collect())));
    lines.push("-".repeat(lines[0].len()));
    for (n, row) in cells.into_iter().enumerate() {
        lines.push(format!("{:>3} | {}", n + 1, join(row)));
    }
    lines
}

impl<W: Write> View for ConsoleView<W> {
    fn show_tables(&mut self, tables: &[TableSchema]) {
        self.tables = tables.to_vec();
        self.expanded.clear();
        self.line("Tables:");
        self.render_tree();
    }

    fn show_tables_notice(&mut self, notice: &Notice) {
        self.tables.clear();
        self.line(notice.text());
    }

    fn set_expanded(&mut self, table: &str, expanded: bool) {
        self.expanded.retain(|t| t != table);
        if expanded {
            self.expanded.push(table.to_string());
        }
        if !self.tables.is_empty() {
            self.render_tree();
        }
    }

    fn show_stats(&mut self, stats: &TableStats) {
        let text = format!(
            "\n{}  rows: {}  columns: {}  primary key: {}",
            stats.table, stats.row_count, stats.column_count, stats.primary_key
        );
        self.line(&text);
    }

    fn show_rows(&mut self, grid: &RowGrid) {
        for l in render_grid(grid) {
            self.line(&l);
        }
        self.grid = Some(grid.clone());
    }

    fn show_rows_notice(&mut self, notice: &Notice) {
        self.grid = None;
        self.line(notice.text());
    }

    fn open_modal(&mut self, modal: &ModalDescriptor) {
        let text = format!("\n{} ({})", modal.form.title(), modal.table);
        self.line(&text);
    }

    fn close_modal(&mut self) {}

    fn alert(&mut self, message: &str) {
        self.line(&format!("! {}", message));
    }

    fn confirm(&mut self, message: &str) -> bool {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
