// Read-only views of the backend: datasets, tables, services, plus upload.

use std::io::Write;
use std::path::Path;

use semtui_hub_client::SemTuiClient;
use semtui_protocol::{ResourceId, TableDocument};
use serde::Serialize;
use serde_json::json;

use crate::enrich::load_table;
use crate::util::render_table;
use crate::{CliError, TableArgs};

/// Widest a single column gets in human output.
const MAX_COL_WIDTH: usize = 40;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::general(e.to_string()))?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

fn print_text(text: &str) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

fn strings<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// datasets / dataset / tables
// ============================================================================

pub fn cmd_datasets(client: &SemTuiClient, json: bool) -> Result<(), CliError> {
    let datasets = client.list_datasets().map_err(CliError::client)?;
    if json {
        return print_json(&datasets);
    }
    if datasets.is_empty() {
        eprintln!("no datasets on {}", client.api_base());
        return Ok(());
    }
    let rows: Vec<Vec<String>> = datasets
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                d.n_tables.to_string(),
                d.last_modified_date.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_text(&render_table(&strings(["id", "name", "tables", "modified"]), &rows, MAX_COL_WIDTH))
}

pub fn cmd_dataset(client: &SemTuiClient, id: &str, json: bool) -> Result<(), CliError> {
    let dataset = client.get_dataset(&ResourceId::from(id)).map_err(CliError::client)?;
    if json {
        return print_json(&dataset);
    }
    let text = format!(
        "id:       {}\nname:     {}\ntables:   {}\nmodified: {}\n",
        dataset.id,
        dataset.name,
        dataset.n_tables,
        dataset.last_modified_date.as_deref().unwrap_or("-"),
    );
    print_text(&text)
}

pub fn cmd_tables(client: &SemTuiClient, dataset: &str, json: bool) -> Result<(), CliError> {
    let tables = client.list_tables(&ResourceId::from(dataset)).map_err(CliError::client)?;
    if json {
        return print_json(&tables);
    }
    let rows: Vec<Vec<String>> = tables
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.name.clone(),
                t.n_rows.to_string(),
                t.n_cols.to_string(),
                t.last_modified_date.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_text(&render_table(&strings(["id", "name", "rows", "cols", "modified"]), &rows, MAX_COL_WIDTH))
}

// ============================================================================
// table
// ============================================================================

pub fn cmd_table(client: &SemTuiClient, source: &TableArgs, json: bool, columns: bool) -> Result<(), CliError> {
    let table = load_table(client, source)?;
    if json {
        return print_json(&table);
    }
    if columns {
        return print_text(&column_overview(&table));
    }

    let grid = table.label_grid();
    let mut header = vec!["row".to_string()];
    header.extend(grid.header);
    let rows: Vec<Vec<String>> = grid
        .rows
        .into_iter()
        .map(|(id, labels)| std::iter::once(id).chain(labels).collect())
        .collect();
    print_text(&render_table(&header, &rows, MAX_COL_WIDTH))
}

/// One line per column: status, kind and reconciliation progress.
pub(crate) fn column_overview(table: &TableDocument) -> String {
    let rows: Vec<Vec<String>> = table
        .columns
        .iter()
        .map(|(name, column)| {
            let context = column
                .context
                .iter()
                .map(|(prefix, ctx)| format!("{} {}/{}", prefix, ctx.reconciliated, ctx.total))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                name.clone(),
                column.status.as_str().to_string(),
                column.kind.as_ref().map(|k| k.as_str().to_string()).unwrap_or_default(),
                context,
            ]
        })
        .collect();
    render_table(&strings(["column", "status", "kind", "reconciled"]), &rows, MAX_COL_WIDTH)
}

// ============================================================================
// services
// ============================================================================

pub fn cmd_services(client: &SemTuiClient, json: bool) -> Result<(), CliError> {
    let reconciliators = client.reconciliator_list().map_err(CliError::client)?;
    let extenders = client.extender_list().map_err(CliError::client)?;
    if json {
        return print_json(&json!({ "reconciliators": reconciliators, "extenders": extenders }));
    }

    let recon_rows: Vec<Vec<String>> = reconciliators
        .iter()
        .map(|r| vec![r.id.clone(), r.prefix.clone(), r.name.clone(), r.uri.clone()])
        .collect();
    let ext_rows: Vec<Vec<String>> = extenders
        .iter()
        .map(|e| vec![e.id.clone(), e.name.clone(), e.relative_url.clone()])
        .collect();

    let mut out = String::from("Reconciliators\n\n");
    out.push_str(&render_table(&strings(["id", "prefix", "name", "uri"]), &recon_rows, MAX_COL_WIDTH));
    out.push_str("\nExtenders\n\n");
    out.push_str(&render_table(&strings(["id", "name", "url"]), &ext_rows, MAX_COL_WIDTH));
    print_text(&out)
}

// ============================================================================
// upload
// ============================================================================

pub fn cmd_upload(client: &SemTuiClient, dataset: &str, file: &Path, name: Option<String>) -> Result<(), CliError> {
    if !file.is_file() {
        return Err(CliError::io(format!("{}: no such file", file.display())));
    }
    let name = match name {
        Some(n) => n,
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| CliError::args(format!("{}: cannot derive a table name", file.display())))?,
    };

    let status = client
        .add_table(&ResourceId::from(dataset), file, &name)
        .map_err(CliError::client)?;
    log::info!("uploaded {} as '{}' (HTTP {})", file.display(), name, status);
    print_text(&format!("uploaded {} to dataset {} as '{}'\n", file.display(), dataset, name))
}
