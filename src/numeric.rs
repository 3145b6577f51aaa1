//! Numeric coercion shared by every extractor.
//!
//! Kernel files are plain text, so every field starts life as a token. This
//! module turns tokens into [`Value`]s of a declared [`FieldKind`] and defines
//! the zero value each kind falls back to.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::error::{ProcError, Result};

/// Expected type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    I32,
    U32,
    I64,
    U64,
}

impl FieldKind {
    /// Zero value of this kind (empty string for [`FieldKind::Str`]).
    pub fn zero(self) -> Value {
        match self {
            FieldKind::Str => Value::Str(String::new()),
            FieldKind::I32 => Value::I32(0),
            FieldKind::U32 => Value::U32(0),
            FieldKind::I64 => Value::I64(0),
            FieldKind::U64 => Value::U64(0),
        }
    }

    /// Parses `token` as this kind.
    pub fn parse(self, field: &str, token: &str) -> Result<Value> {
        let unparseable = || ProcError::FieldUnparseable {
            field: field.to_string(),
            token: token.to_string(),
        };
        let value = match self {
            FieldKind::Str => Value::Str(token.to_string()),
            FieldKind::I32 => Value::I32(token.parse().map_err(|_| unparseable())?),
            FieldKind::U32 => Value::U32(token.parse().map_err(|_| unparseable())?),
            FieldKind::I64 => Value::I64(token.parse().map_err(|_| unparseable())?),
            FieldKind::U64 => Value::U64(token.parse().map_err(|_| unparseable())?),
        };
        Ok(value)
    }

    /// Parses `token`, substituting [`FieldKind::zero`] when it does not fit.
    pub fn parse_or_zero(self, field: &str, token: &str) -> Value {
        self.parse(field, token).unwrap_or_else(|e| {
            debug!("{} - using zero", e);
            self.zero()
        })
    }
}

/// A parsed field: a string or one of the four integer widths used by the kernel.
///
/// Serializes as the bare string or number, so renderings keep the exact
/// integer that was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Str(_) => FieldKind::Str,
            Value::I32(_) => FieldKind::I32,
            Value::U32(_) => FieldKind::U32,
            Value::I64(_) => FieldKind::I64,
            Value::U64(_) => FieldKind::U64,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    // Every integer width fits in i128, which makes cross-kind coercion a
    // single range check.
    fn widen(&self) -> Option<i128> {
        match self {
            Value::Str(s) => s.parse().ok(),
            Value::I32(v) => Some(i128::from(*v)),
            Value::U32(v) => Some(i128::from(*v)),
            Value::I64(v) => Some(i128::from(*v)),
            Value::U64(v) => Some(i128::from(*v)),
        }
    }

    /// Value as `i32`, if it holds (or spells) an integer in range.
    pub fn to_i32(&self) -> Option<i32> {
        self.widen().and_then(|v| i32::try_from(v).ok())
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.widen().and_then(|v| u32::try_from(v).ok())
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.widen().and_then(|v| i64::try_from(v).ok())
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.widen().and_then(|v| u64::try_from(v).ok())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::I32(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// Parses a counter token. Negative, fractional and non-numeric tokens yield `None`.
pub fn parse_counter(token: &str) -> Option<u64> {
    token.parse().ok()
}

/// Strips the label suffix from a leading token: everything from the first `:` on.
///
/// `"MemTotal:"` becomes `"MemTotal"`, `"Ip:"` becomes `"Ip"`, and a token
/// without a colon is returned unchanged.
pub fn strip_label(token: &str) -> &str {
    token.split(':').next().unwrap_or(token)
}
