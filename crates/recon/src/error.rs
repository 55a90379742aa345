use std::fmt;

/// Which service list a lookup ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Reconciliator,
    Extender,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconciliator => write!(f, "reconciliator"),
            Self::Extender => write!(f, "extender"),
        }
    }
}

/// Failure reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "HTTP {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// Service id / prefix absent from the backend's service list.
    #[error("{kind} '{id}' not found in service list")]
    NotFound { kind: ServiceKind, id: String },
    /// Request failed or the response could not be decoded.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Column name not present in the table.
    #[error("column '{0}' does not exist in table")]
    UnknownColumn(String),
    /// Column has no reconciliation context to derive a service from.
    #[error("column '{0}' has not been reconciled")]
    NotReconciled(String),
    /// Extension column whose source column is not named in `meta`.
    #[error("extension column '{0}' has no source column in response meta")]
    MissingOrigin(String),
    /// Fewer output names than extension columns returned.
    #[error("extension returned {returned} column(s) but {named} name(s) were given")]
    ColumnNameMismatch { returned: usize, named: usize },
}
