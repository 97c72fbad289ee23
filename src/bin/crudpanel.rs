use clap::Parser;
use crudpanel::{
    init_logging, ConsoleView, FormValues, HttpBackend, ModalDescriptor, Panel, PanelConfig,
    PanelResult, Record,
};
use dialoguer::{Input, Select};
use std::io::Stdout;

type ConsolePanel = Panel<HttpBackend, ConsoleView<Stdout>>;

enum Action {
    Open(String),
    Add,
    Edit,
    Delete,
    Reload,
    Refresh,
    Quit,
}

impl Action {
    fn label(&self) -> String {
        match self {
            Action::Open(table) => format!("Open {}", table),
            Action::Add => "Add record".to_string(),
            Action::Edit => "Edit record".to_string(),
            Action::Delete => "Delete record".to_string(),
            Action::Reload => "Reload rows".to_string(),
            Action::Refresh => "Refresh tables".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }
}

fn actions(panel: &ConsolePanel) -> Vec<Action> {
    let mut actions: Vec<Action> = panel
        .state()
        .tables
        .iter()
        .map(|t| Action::Open(t.name.clone()))
        .collect();
    if panel.state().active_table.is_some() {
        actions.push(Action::Add);
        if panel.view().grid().is_some() {
            actions.push(Action::Edit);
            actions.push(Action::Delete);
        }
        actions.push(Action::Reload);
    }
    actions.push(Action::Refresh);
    actions.push(Action::Quit);
    actions
}

/// Lets the user pick one of the rows currently on screen.
fn pick_row(panel: &ConsolePanel) -> std::io::Result<Option<(String, Record)>> {
    let Some(grid) = panel.view().grid() else {
        return Ok(None);
    };
    let labels: Vec<String> = grid
        .rows
        .iter()
        .enumerate()
        .map(|(n, row)| {
            let id = grid.identifier(row).map(|v| v.to_string()).unwrap_or_default();
            format!("{:>3}  {} = {}", n + 1, grid.primary_key, id)
        })
        .collect();
    let picked = Select::new()
        .with_prompt("Row")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(std::io::Error::other)?;
    Ok(picked.map(|n| (grid.table.clone(), grid.rows[n].clone())))
}

/// Prompts for every field of the open form, starting from what the user
/// typed last time when the form is being retried. `None` when the user
/// cancels.
fn fill_form(
    modal: &ModalDescriptor,
    previous: Option<&FormValues>,
) -> std::io::Result<Option<FormValues>> {
    let mut values = FormValues::new();
    for field in &modal.form.fields {
        let prompt = format!(
            "{}{} [{}]",
            field.label,
            if field.required { "*" } else { "" },
            field.kind.as_str()
        );
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(!field.required);
        let initial = previous
            .and_then(|values| values.get(&field.name))
            .or(field.value.as_ref());
        if let Some(value) = initial {
            input = input.with_initial_text(value.clone());
        }
        let text = input.interact_text().map_err(std::io::Error::other)?;
        values.insert(field.name.clone(), text);
    }
    let save = Select::new()
        .items(&[modal.form.submit_label(), "Cancel"])
        .default(0)
        .interact()
        .map_err(std::io::Error::other)?;
    Ok((save == 0).then_some(values))
}

/// Fills and submits the open form until it closes: a failed submit keeps
/// it open and asks again, cancelling closes it.
async fn complete_form(panel: &mut ConsolePanel) -> std::io::Result<()> {
    let mut previous: Option<FormValues> = None;
    while let Some(modal) = panel.state().open_modal.clone() {
        match fill_form(&modal, previous.as_ref())? {
            Some(values) => {
                report(panel.submit_form(values.clone()).await);
                previous = Some(values);
            }
            None => panel.close_modal(),
        }
    }
    Ok(())
}

/// Failures are already on screen; keep a trace of them.
fn report(result: PanelResult<()>) {
    if let Err(e) = result {
        log::debug!("operation failed: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let config = PanelConfig::parse();
    let backend = HttpBackend::new(&config.api)?;
    let mut panel = Panel::new(backend, ConsoleView::stdout());

    report(panel.list_tables().await);

    loop {
        let actions = actions(&panel);
        let labels: Vec<String> = actions.iter().map(Action::label).collect();
        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        match &actions[choice] {
            Action::Open(table) => report(panel.select_table(table).await),
            Action::Add => {
                report(panel.open_add_form().await);
                complete_form(&mut panel).await?;
            }
            Action::Edit => {
                if let Some((table, row)) = pick_row(&panel)? {
                    report(panel.open_edit_form(&table, &row));
                    complete_form(&mut panel).await?;
                }
            }
            Action::Delete => {
                if let Some((table, row)) = pick_row(&panel)? {
                    report(panel.delete_row(&table, &row).await);
                }
            }
            Action::Reload => {
                if let Some(table) = panel.state().active_table.clone() {
                    report(panel.load_rows(&table).await);
                }
            }
            Action::Refresh => report(panel.list_tables().await),
            Action::Quit => break,
        }
    }
    Ok(())
}
