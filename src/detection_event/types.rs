//! Detection event domain types

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Safety-equipment violation state of a detected person.
///
/// The variant order is the category-map order and fixes the annotation
/// category ids (`none=0, no_helmet=1, no_vest=2, no_helmet_no_vest=3`).
/// Downstream annotation consumers depend on these ids staying stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    None,
    NoHelmet,
    NoVest,
    NoHelmetNoVest,
}

impl Violation {
    /// All violation states in category-map order.
    pub const ALL: [Violation; 4] = [
        Violation::None,
        Violation::NoHelmet,
        Violation::NoVest,
        Violation::NoHelmetNoVest,
    ];

    /// Category id in the fixed annotation category map.
    pub fn category_id(self) -> u32 {
        match self {
            Violation::None => 0,
            Violation::NoHelmet => 1,
            Violation::NoVest => 2,
            Violation::NoHelmetNoVest => 3,
        }
    }

    /// Category name as stored and exported.
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::None => "none",
            Violation::NoHelmet => "no_helmet",
            Violation::NoVest => "no_vest",
            Violation::NoHelmetNoVest => "no_helmet_no_vest",
        }
    }

    /// Parse a stored violation value.
    ///
    /// An unrecognized value is a data-integrity fault, not recoverable
    /// input: it aborts the operation that hit it.
    pub fn parse(value: &str) -> Result<Violation> {
        match value {
            "none" => Ok(Violation::None),
            "no_helmet" => Ok(Violation::NoHelmet),
            "no_vest" => Ok(Violation::NoVest),
            "no_helmet_no_vest" => Ok(Violation::NoHelmetNoVest),
            other => Err(Error::UnknownViolationCategory(other.to_string())),
        }
    }
}

/// One detected person within a detection event.
///
/// Bounding box coordinates are normalized fractions of the frame
/// dimensions, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetection {
    pub bbox_x: f64,
    pub bbox_y: f64,
    pub bbox_width: f64,
    pub bbox_height: f64,
    pub violation: Violation,
}

/// Stored detection event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub event_id: u64,
    pub camera_id: u64,
    pub captured_at: DateTime<Utc>,
    /// Source image path or URL
    pub image_url: String,
    pub persons: Vec<PersonDetection>,
    pub created_at: DateTime<Utc>,
}

/// Detection event payload as submitted for recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDetectionEvent {
    pub camera_id: u64,
    pub captured_at: DateTime<Utc>,
    pub image_url: String,
    #[serde(default)]
    pub persons: Vec<PersonDetection>,
}

/// Time/camera filter for event queries.
///
/// Filtering is all-or-nothing: the range lookup is used only when all
/// three fields are present, otherwise every event is returned. Presence
/// decides, not truthiness, so camera id 0 is a valid filter value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    pub camera_id: Option<u64>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Parse an ISO-8601 timestamp filter value.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC),
/// or a bare date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    Err(Error::MalformedTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_category_ids_fixed_order() {
        let ids: Vec<u32> = Violation::ALL.iter().map(|v| v.category_id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        let names: Vec<&str> = Violation::ALL.iter().map(|v| v.as_str()).collect();
        assert_eq!(names, vec!["none", "no_helmet", "no_vest", "no_helmet_no_vest"]);
    }

    #[test]
    fn test_violation_parse_round_trip() {
        for v in Violation::ALL {
            assert_eq!(Violation::parse(v.as_str()).unwrap(), v);
        }
    }

    #[test]
    fn test_violation_parse_unknown_is_integrity_fault() {
        let err = Violation::parse("no_boots").unwrap_err();
        assert!(matches!(err, Error::UnknownViolationCategory(_)));
    }

    #[test]
    fn test_violation_serde_names() {
        assert_eq!(
            serde_json::to_string(&Violation::NoHelmetNoVest).unwrap(),
            "\"no_helmet_no_vest\""
        );
        let v: Violation = serde_json::from_str("\"no_vest\"").unwrap();
        assert_eq!(v, Violation::NoVest);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2026-08-30T12:00:00Z").unwrap();
        assert_eq!(rfc.hour(), 12);

        let naive = parse_timestamp("2026-08-30T12:00:00").unwrap();
        assert_eq!(naive, rfc);

        let date_only = parse_timestamp("2026-08-30").unwrap();
        assert_eq!(date_only.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_malformed() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, Error::MalformedTimestamp(_)));
    }
}
