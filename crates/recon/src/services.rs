use semtui_protocol::{ExtenderInfo, ReconciliatorInfo};

use crate::error::{ReconError, ServiceKind};

pub fn find_reconciliator<'a>(
    list: &'a [ReconciliatorInfo],
    id: &str,
) -> Result<&'a ReconciliatorInfo, ReconError> {
    list.iter().find(|r| r.id == id).ok_or_else(|| ReconError::NotFound {
        kind: ServiceKind::Reconciliator,
        id: id.to_string(),
    })
}

/// Reverse lookup used to recover the service behind a column's context key.
pub fn find_reconciliator_by_prefix<'a>(
    list: &'a [ReconciliatorInfo],
    prefix: &str,
) -> Result<&'a ReconciliatorInfo, ReconError> {
    list.iter().find(|r| r.prefix == prefix).ok_or_else(|| ReconError::NotFound {
        kind: ServiceKind::Reconciliator,
        id: prefix.to_string(),
    })
}

pub fn find_extender<'a>(list: &'a [ExtenderInfo], id: &str) -> Result<&'a ExtenderInfo, ReconError> {
    list.iter().find(|e| e.id == id).ok_or_else(|| ReconError::NotFound {
        kind: ServiceKind::Extender,
        id: id.to_string(),
    })
}
