//! Field decoders for annotation data.
//!
//! Backends are loose about annotation fields: `null` where an object is
//! expected, a bare bool for `match`, numbers sent as strings. One bad field
//! must not make a whole table undecodable, so these decoders accept the
//! common variants and turn anything else into "absent" with a warning. The
//! mergers then treat the field as missing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::table::{AnnotationMeta, MatchFlag};

fn warn_dropped(field: &str, value: &Value) {
    log::warn!("malformed '{}' value {} treated as absent", field, value);
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}

/// Optional number; numeric strings accepted.
pub(crate) fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(d)?;
    if value.is_null() {
        return Ok(None);
    }
    let parsed = as_f64(&value);
    if parsed.is_none() {
        warn_dropped("score", &value);
    }
    Ok(parsed)
}

/// Number defaulting to zero.
pub(crate) fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(opt_f64(d)?.unwrap_or_default())
}

/// Optional flag; `"true"` / `"false"` accepted.
pub(crate) fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let value = Value::deserialize(d)?;
    if value.is_null() {
        return Ok(None);
    }
    let parsed = as_bool(&value);
    if parsed.is_none() {
        warn_dropped("flag", &value);
    }
    Ok(parsed)
}

pub(crate) fn bool_or_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(opt_bool(d)?.unwrap_or_default())
}

/// Non-negative count defaulting to zero; numeric strings accepted.
pub(crate) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    if value.is_null() {
        return Ok(0);
    }
    match as_count(&value) {
        Some(n) => Ok(n),
        None => {
            warn_dropped("count", &value);
            Ok(0)
        }
    }
}

/// `match` block: `{value}` object, or a bare bool.
pub(crate) fn match_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MatchFlag>, D::Error> {
    let value = Value::deserialize(d)?;
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => match serde_json::from_value::<MatchFlag>(value.clone()) {
            Ok(flag) => Ok(Some(flag)),
            Err(_) => {
                warn_dropped("match", &value);
                Ok(None)
            }
        },
        other => match as_bool(&other) {
            Some(b) => Ok(Some(MatchFlag::new(b))),
            None => {
                warn_dropped("match", &other);
                Ok(None)
            }
        },
    }
}

/// `annotationMeta` block; `null` or a non-object becomes the empty block.
pub(crate) fn annotation_meta<'de, D: Deserializer<'de>>(d: D) -> Result<AnnotationMeta, D::Error> {
    let value = Value::deserialize(d)?;
    match value {
        Value::Null => Ok(AnnotationMeta::default()),
        Value::Object(_) => match serde_json::from_value::<AnnotationMeta>(value.clone()) {
            Ok(meta) => Ok(meta),
            Err(_) => {
                warn_dropped("annotationMeta", &value);
                Ok(AnnotationMeta::default())
            }
        },
        other => {
            warn_dropped("annotationMeta", &other);
            Ok(AnnotationMeta::default())
        }
    }
}
