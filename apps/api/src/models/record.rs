//! Student result record as returned by the extraction step.
//!
//! Field values arrive from a generative model, so every field is optional and
//! deserialization is lenient: anything that cannot be understood degrades to
//! `None` instead of failing the whole record.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of the scoresheet.
///
/// A serial number of `0` is not a valid serial and is read as absent, so the
/// row falls back to its positional number when rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_serial")]
    pub sn: Option<NonZeroU32>,
    #[serde(rename = "regNo", default, deserialize_with = "lenient_text")]
    pub reg_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub ca: Option<Score>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub exam: Option<Score>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub total: Option<Score>,
}

/// A score cell. Kept in the shape the model produced it; never computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Integer(n) => write!(f, "{n}"),
            Score::Decimal(n) => write!(f, "{n}"),
            Score::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Score::Integer(value)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::Decimal(value)
    }
}

impl From<&str> for Score {
    fn from(value: &str) -> Self {
        Score::Text(value.to_string())
    }
}

impl Record {
    /// Serial number to print at `row` (0-based within its column).
    pub fn serial_or(&self, row: usize) -> String {
        match self.sn {
            Some(sn) => sn.to_string(),
            None => (row + 1).to_string(),
        }
    }

    /// True when no field carries anything printable.
    pub fn is_blank(&self) -> bool {
        self.sn.is_none()
            && self.reg_no.as_deref().map_or(true, |s| s.trim().is_empty())
            && [&self.ca, &self.exam, &self.total]
                .iter()
                .all(|s| s.as_ref().map_or(true, |v| v.to_string().trim().is_empty()))
    }

    /// The five printable cells in column order: S/N, REG. NO., C/A, EXAM, TOTAL.
    pub fn cells(&self, row: usize) -> [String; 5] {
        [
            self.serial_or(row),
            self.reg_no.clone().unwrap_or_default(),
            display_or_blank(self.ca.as_ref()),
            display_or_blank(self.exam.as_ref()),
            display_or_blank(self.total.as_ref()),
        ]
    }
}

fn display_or_blank(score: Option<&Score>) -> String {
    score.map(ToString::to_string).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
// ────────────────────────────────────────────────────────────────────────────

fn lenient_serial<'de, D>(deserializer: D) -> Result<Option<NonZeroU32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(parsed.and_then(NonZeroU32::new))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<Score>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Score::Integer(i)),
            None => n.as_f64().map(Score::Decimal),
        },
        Value::String(s) if !s.is_empty() => Some(Score::Text(s)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Record {
        serde_json::from_value(value).expect("record should deserialize")
    }

    #[test]
    fn test_full_record_deserializes() {
        let record = parse(json!({
            "sn": 4, "regNo": "ARC/2019/001", "ca": 25, "exam": 48, "total": 73
        }));
        assert_eq!(record.sn, NonZeroU32::new(4));
        assert_eq!(record.reg_no.as_deref(), Some("ARC/2019/001"));
        assert_eq!(record.cells(0), ["4", "ARC/2019/001", "25", "48", "73"]);
    }

    #[test]
    fn test_zero_serial_is_absent() {
        let record = parse(json!({ "sn": 0, "regNo": "X1" }));
        assert_eq!(record.sn, None);
        assert_eq!(record.serial_or(6), "7");
    }

    #[test]
    fn test_numeric_string_serial_is_accepted() {
        let record = parse(json!({ "sn": " 12 " }));
        assert_eq!(record.sn, NonZeroU32::new(12));
    }

    #[test]
    fn test_missing_fields_render_blank() {
        let record = parse(json!({}));
        assert_eq!(record.cells(0), ["1", "", "", "", ""]);
    }

    #[test]
    fn test_null_and_odd_shapes_degrade_to_blank() {
        let record = parse(json!({
            "sn": "n/a", "regNo": null, "ca": true, "exam": [1, 2], "total": {"v": 1}
        }));
        assert_eq!(record.cells(2), ["3", "", "", "", ""]);
    }

    #[test]
    fn test_decimal_and_text_scores_keep_their_form() {
        let record = parse(json!({ "ca": 12.5, "exam": "ABS", "total": 70.0, "regNo": 1042 }));
        assert_eq!(record.cells(0), ["1", "1042", "12.5", "ABS", "70"]);
    }

    #[test]
    fn test_blank_record_detection() {
        assert!(parse(json!({})).is_blank());
        assert!(parse(json!({ "sn": 0, "regNo": "  ", "ca": "" })).is_blank());
        assert!(!parse(json!({ "sn": 3 })).is_blank());
        assert!(!parse(json!({ "exam": 0 })).is_blank());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let record = parse(json!({ "regNo": "AB01", "name": "Ada", "grade": "A" }));
        assert_eq!(record.reg_no.as_deref(), Some("AB01"));
    }
}
