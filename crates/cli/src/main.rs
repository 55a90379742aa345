// SemTUI CLI - browse a backend and enrich its tables from the shell

mod browse;
mod enrich;
mod exit_codes;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use semtui_config::{ConfigError, Settings};
use semtui_hub_client::{ClientError, SemTuiClient};
use semtui_recon::ReconError;
use tracing_subscriber::EnvFilter;

use exit_codes::{
    client_exit_code, config_exit_code, recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "semtui")]
#[command(about = "Browse a SemTUI backend and reconcile or extend its tables")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Backend API base URL (overrides the settings file and SEMTUI_URI)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Settings file to read instead of the default location
    #[arg(long, global = true, env = "SEMTUI_SETTINGS", value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List datasets on the backend
    Datasets {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one dataset
    Dataset {
        /// Dataset id
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// List the tables of a dataset
    Tables {
        /// Dataset id
        dataset: String,

        #[arg(long)]
        json: bool,
    },

    /// Print a table's cell labels, or the whole document with --json
    #[command(after_help = "\
Examples:
  semtui table --dataset 29 --table 253
  semtui table --dataset 29 --table 253 --json > cities.json
  semtui table --input cities.json --columns")]
    Table {
        #[command(flatten)]
        source: TableArgs,

        /// Print the full table document as JSON
        #[arg(long)]
        json: bool,

        /// Print column status and reconciliation context instead of cells
        #[arg(long, conflicts_with = "json")]
        columns: bool,
    },

    /// List reconciliators and extenders offered by the backend
    Services {
        #[arg(long)]
        json: bool,
    },

    /// Upload a CSV file as a new table
    #[command(after_help = "\
Examples:
  semtui upload 29 cities.csv
  semtui upload 29 export.csv --name cities")]
    Upload {
        /// Dataset id
        dataset: String,

        /// CSV file to upload
        file: PathBuf,

        /// Table name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
    },

    /// Reconcile a column against a reconciliation service
    #[command(after_help = "\
Examples:
  semtui reconcile --dataset 29 --table 253 citta --with wikidata --push
  semtui reconcile --input cities.json citta --with wikidata -o cities.json
  semtui reconcile --input cities.json citta --with geonames --json | jq .table")]
    Reconcile {
        #[command(flatten)]
        source: TableArgs,

        /// Column to reconcile
        column: String,

        /// Reconciliator id (see `semtui services`)
        #[arg(long = "with", value_name = "RECONCILIATOR")]
        reconciliator: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Add columns derived from a reconciled column
    #[command(after_help = "\
The i-th column returned by the extender is stored under the i-th --name.

Examples:
  semtui extend --input cities.json citta --with wikidataPropertySPARQL \\
      --property P421,P625 --name time_zone,geocoordinates -o cities.json")]
    Extend {
        #[command(flatten)]
        source: TableArgs,

        /// Reconciled column to extend
        column: String,

        /// Extender id (see `semtui services`)
        #[arg(long = "with", value_name = "EXTENDER")]
        extender: String,

        /// Property to request. Repeatable; comma-separated accepted.
        #[arg(long = "property", value_name = "PROP", value_delimiter = ',', required = true)]
        properties: Vec<String>,

        /// Name of each new column, in response order. Repeatable; comma-separated accepted.
        #[arg(long = "name", value_name = "NAME", value_delimiter = ',', required = true)]
        names: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Send a local table document back to the backend
    Push {
        /// Table document (JSON) to send
        input: PathBuf,
    },
}

/// Where a table document comes from: the backend or a local file.
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Dataset id (with --table)
    #[arg(long, requires = "table", conflicts_with = "input")]
    pub dataset: Option<String>,

    /// Table id (with --dataset)
    #[arg(long, requires = "dataset")]
    pub table: Option<String>,

    /// Read the table document from a JSON file
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// What to do with a table after a merge.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the updated table document to a file
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the updated table document as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Send the updated table back to the backend
    #[arg(long)]
    pub push: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // RUST_LOG wins over -v. Library crates log through `log`; the subscriber
    // picks those records up via its tracing-log bridge.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::resolve(cli.settings.as_deref(), cli.api_base.as_deref(), cli.timeout)
        .map_err(CliError::config)?;
    log::debug!("backend: {}", settings.api_base);
    let client = SemTuiClient::new(&settings).map_err(CliError::client)?;

    match cli.command {
        Commands::Datasets { json } => browse::cmd_datasets(&client, json),
        Commands::Dataset { id, json } => browse::cmd_dataset(&client, &id, json),
        Commands::Tables { dataset, json } => browse::cmd_tables(&client, &dataset, json),
        Commands::Table { source, json, columns } => browse::cmd_table(&client, &source, json, columns),
        Commands::Services { json } => browse::cmd_services(&client, json),
        Commands::Upload { dataset, file, name } => browse::cmd_upload(&client, &dataset, &file, name),
        Commands::Reconcile { source, column, reconciliator, output } => {
            enrich::cmd_reconcile(&client, &source, &column, &reconciliator, &output)
        }
        Commands::Extend { source, column, extender, properties, names, output } => {
            enrich::cmd_extend(&client, &source, &column, &extender, &properties, &names, &output)
        }
        Commands::Push { input } => enrich::cmd_push(&client, &input),
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Parse { .. } => Some("settings are JSON; check for trailing commas".to_string()),
            ConfigError::Invalid(_) => Some(format!(
                "pass --api-base http://host:port/api/, set SEMTUI_URI, or edit {}",
                Settings::config_path_display()
            )),
            ConfigError::Io { .. } => None,
        };
        Self { code: config_exit_code(&err), message: err.to_string(), hint }
    }

    /// Create error from a client error with proper exit code.
    pub fn client(err: ClientError) -> Self {
        let code = client_exit_code(&err);
        let hint = match &err {
            ClientError::Network(_) => Some("is the SemTUI backend running? check --api-base".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::NotFound { .. } => Some("run `semtui services` to list available ids".to_string()),
            ReconError::NotReconciled(column) => Some(format!("reconcile '{}' before extending it", column)),
            ReconError::ColumnNameMismatch { .. } => Some("pass one --name per returned column".to_string()),
            ReconError::Transport(t) if t.status.is_none() => {
                Some("is the SemTUI backend running? check --api-base".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extend_splits_comma_lists() {
        let cli = Cli::try_parse_from([
            "semtui", "extend", "--input", "t.json", "citta", "--with", "wd",
            "--property", "P421,P625", "--name", "time_zone", "--name", "geo",
        ])
        .unwrap();
        match cli.command {
            Commands::Extend { properties, names, .. } => {
                assert_eq!(properties, ["P421", "P625"]);
                assert_eq!(names, ["time_zone", "geo"]);
            }
            _ => panic!("expected extend"),
        }
    }

    #[test]
    fn dataset_requires_table() {
        let err = Cli::try_parse_from(["semtui", "reconcile", "--dataset", "29", "citta", "--with", "wd"]);
        assert!(err.is_err());
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["semtui", "-vv", "services"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
