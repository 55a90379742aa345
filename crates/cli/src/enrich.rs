// Commands that change a table: reconcile, extend, push.

use std::fs;
use std::path::Path;

use chrono::Utc;
use semtui_hub_client::SemTuiClient;
use semtui_protocol::{ResourceId, TableDocument};
use semtui_recon::{extend_column, push_update, reconcile};

use crate::browse::print_json;
use crate::{CliError, OutputArgs, TableArgs};

/// Fetch the table named by `source`, or read it from `--input`.
pub(crate) fn load_table(client: &SemTuiClient, source: &TableArgs) -> Result<TableDocument, CliError> {
    match (&source.input, &source.dataset, &source.table) {
        (Some(path), None, None) => read_document(path),
        (None, Some(dataset), Some(table)) => client
            .get_table(&ResourceId::from(dataset.as_str()), &ResourceId::from(table.as_str()))
            .map_err(CliError::client),
        _ => Err(CliError::args("a table is required")
            .with_hint("pass --dataset <id> --table <id>, or --input <file.json>")),
    }
}

pub(crate) fn read_document(path: &Path) -> Result<TableDocument, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| {
        CliError::args(format!("{}: not a table document: {}", path.display(), e))
            .with_hint("expected the JSON written by `semtui table --json`")
    })
}

fn write_document(path: &Path, table: &TableDocument) -> Result<(), CliError> {
    let mut text = serde_json::to_string_pretty(table).map_err(|e| CliError::general(e.to_string()))?;
    text.push('\n');
    fs::write(path, text).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))
}

/// Handle `--output`, `--push` and `--json` for a merged table. `summary`
/// is printed when `--json` is absent.
fn finish(client: &SemTuiClient, table: &TableDocument, output: &OutputArgs, summary: &str) -> Result<(), CliError> {
    if let Some(path) = &output.output {
        write_document(path, table)?;
        log::info!("wrote {}", path.display());
    }
    if output.push {
        push_update(client, table, Utc::now()).map_err(CliError::recon)?;
    }

    if output.json {
        print_json(table)
    } else {
        println!("{}", summary);
        if output.push {
            println!("pushed table {} of dataset {}", table.table.id, table.table.id_dataset);
        }
        Ok(())
    }
}

// ============================================================================
// reconcile
// ============================================================================

pub fn cmd_reconcile(
    client: &SemTuiClient,
    source: &TableArgs,
    column: &str,
    reconciliator: &str,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let mut table = load_table(client, source)?;
    let report = reconcile(client, &mut table, column, reconciliator).map_err(CliError::recon)?;

    let summary = format!(
        "{}: reconciled {}/{} cells with '{}' (score {:.2}..{:.2})",
        report.column,
        report.reconciliated,
        report.total,
        report.reconciliator,
        table.table.min_meta_score,
        table.table.max_meta_score,
    );
    finish(client, &table, output, &summary)
}

// ============================================================================
// extend
// ============================================================================

pub fn cmd_extend(
    client: &SemTuiClient,
    source: &TableArgs,
    column: &str,
    extender: &str,
    properties: &[String],
    names: &[String],
    output: &OutputArgs,
) -> Result<(), CliError> {
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(CliError::args("column names must not be empty"));
    }
    let mut table = load_table(client, source)?;
    if let Some(taken) = names.iter().find(|n| table.column(n).is_some()) {
        return Err(CliError::args(format!("column '{}' already exists", taken)));
    }

    let report = extend_column(client, &mut table, column, extender, properties, names).map_err(CliError::recon)?;
    let summary = format!(
        "{}: added {} ({} reconciled cells in table)",
        column,
        report.columns.join(", "),
        report.n_cells_reconciliated,
    );
    finish(client, &table, output, &summary)
}

// ============================================================================
// push
// ============================================================================

pub fn cmd_push(client: &SemTuiClient, input: &Path) -> Result<(), CliError> {
    let table = read_document(input)?;
    let body = push_update(client, &table, Utc::now()).map_err(CliError::recon)?;
    log::debug!("update response: {}", body);
    println!("pushed table {} of dataset {}", table.table.id, table.table.id_dataset);
    Ok(())
}
