//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3       | Universal        | Settings could not be loaded or are bad  |
//! | 4       | Universal        | Local file read/write failed             |
//! | 10-19   | backend          | Lookup, transport and merge failures     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use semtui_config::ConfigError;
use semtui_hub_client::ClientError;
use semtui_recon::ReconError;

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

/// Settings file unreadable, or an invalid base URL / timeout.
pub const EXIT_CONFIG: u8 = 3;

/// Local file could not be read or written (`--input`, `--output`, upload).
pub const EXIT_IO: u8 = 4;

// =============================================================================
// Backend (10-19)
// =============================================================================

/// Dataset, table, reconciliator or extender does not exist.
pub const EXIT_NOT_FOUND: u8 = 10;

/// Network failure, non-2xx response, or undecodable response body.
pub const EXIT_TRANSPORT: u8 = 11;

/// The requested operation does not fit the table: unknown or unreconciled
/// column, extension columns without names or origin.
pub const EXIT_INVALID_TABLE_OP: u8 = 12;

// =============================================================================
// Error mapping
// =============================================================================

pub fn config_exit_code(_err: &ConfigError) -> u8 {
    EXIT_CONFIG
}

/// Map a client error to its exit code. A 404 counts as "not found".
pub fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::Http(404, _) => EXIT_NOT_FOUND,
        ClientError::Http(..) | ClientError::Network(_) | ClientError::Parse(_) => EXIT_TRANSPORT,
        ClientError::Io(_) => EXIT_IO,
        ClientError::Build(_) => EXIT_CONFIG,
    }
}

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::NotFound { .. } => EXIT_NOT_FOUND,
        ReconError::Transport(t) if t.status == Some(404) => EXIT_NOT_FOUND,
        ReconError::Transport(_) => EXIT_TRANSPORT,
        ReconError::UnknownColumn(_)
        | ReconError::NotReconciled(_)
        | ReconError::MissingOrigin(_)
        | ReconError::ColumnNameMismatch { .. } => EXIT_INVALID_TABLE_OP,
    }
}
