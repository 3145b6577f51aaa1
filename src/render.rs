//! Text rendering of typed and raw records.
//!
//! Rendering is a pure serialization step over an already-parsed record. Both
//! formats write integers exactly as parsed, including `u64` values above
//! `i64::MAX`.

use serde::Serialize;

/// Output format for records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Renders `value` in `format`. `pretty` only affects JSON; YAML is always
/// block-formatted.
pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: RenderFormat,
    pretty: bool,
) -> Result<String, RenderError> {
    let output = match format {
        RenderFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        RenderFormat::Json => serde_json::to_string(value)?,
        RenderFormat::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Value;
    use crate::record::RawRecord;

    fn sample() -> RawRecord {
        let mut raw = RawRecord::new();
        raw.insert("comm", Value::Str("(init)".into()));
        raw.insert("rsslim", Value::U64(u64::MAX));
        raw.insert("cutime", Value::I64(-4));
        raw
    }

    #[test]
    fn test_json_compact() {
        let out = render(&sample(), RenderFormat::Json, false).unwrap();
        assert_eq!(
            out,
            r#"{"comm":"(init)","rsslim":18446744073709551615,"cutime":-4}"#
        );
    }

    #[test]
    fn test_json_pretty_parses_back() {
        let out = render(&sample(), RenderFormat::Json, true).unwrap();
        assert!(out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["rsslim"].as_u64(), Some(u64::MAX));
        assert_eq!(parsed["cutime"].as_i64(), Some(-4));
    }

    #[test]
    fn test_yaml() {
        let out = render(&sample(), RenderFormat::Yaml, false).unwrap();
        assert!(out.contains("rsslim: 18446744073709551615"));
        assert!(out.contains("cutime: -4"));
        let parsed: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed["rsslim"].as_u64(), Some(u64::MAX));
    }
}
