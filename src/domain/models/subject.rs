//! Assignment subject model.
//!
//! An `AssignmentSubject` is the normalized description of a shift: the thing
//! a driver gets assigned to. Subjects are produced by two upstream adapters
//! (imported roster blocks and recurring shift templates) and both funnel
//! through [`AssignmentSubject::new`], the single place where duration is
//! derived from timestamps and rounded.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EngineError, EngineResult};

/// Round an hour value to 4 decimal places.
///
/// Durations are derived from millisecond timestamp arithmetic, which leaves
/// residue like `13.499999999998`. Rounding happens once, here, at the
/// boundary where a duration is computed; downstream code never re-derives
/// durations from timestamps.
pub fn round4(hours: f64) -> f64 {
    (hours * 10_000.0).round() / 10_000.0
}

/// Duty type of a shift, determining which hours-of-service limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyType {
    /// Short single-driver block (capped per 24h window).
    Solo1,
    /// Long single-driver block (capped per 48h window).
    Solo2,
    /// Team block (two drivers; no default hour cap).
    Team,
}

impl DutyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo1 => "solo1",
            Self::Solo2 => "solo2",
            Self::Team => "team",
        }
    }

    /// Parse a duty type from upstream text.
    ///
    /// Upstream records carry free-form variants ("Solo 1", "SOLO1",
    /// "solo_2"). Folding happens here and nowhere else: lowercase and strip
    /// everything non-alphanumeric before matching.
    pub fn parse(raw: &str) -> EngineResult<Self> {
        let folded: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "solo1" => Ok(Self::Solo1),
            "solo2" => Ok(Self::Solo2),
            "team" => Ok(Self::Team),
            _ => Err(EngineError::InvalidDutyType(raw.to_string())),
        }
    }
}

impl std::fmt::Display for DutyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized shift description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSubject {
    /// External block id, e.g. an imported roster block id.
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Hours between start and end, rounded to 4 decimals.
    pub duration_hours: f64,
    pub duty_type: DutyType,
    /// Pattern-cycle the block belongs to, if any.
    pub cycle_id: Option<String>,
    pub pattern_group: Option<String>,
}

impl AssignmentSubject {
    /// Build a subject, deriving and rounding the duration.
    ///
    /// Rejects ranges where start is not strictly before end.
    pub fn new(
        id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duty_type: DutyType,
        cycle_id: Option<String>,
        pattern_group: Option<String>,
    ) -> EngineResult<Self> {
        if start >= end {
            return Err(EngineError::InvalidTimeRange { start, end });
        }

        let millis = (end - start).num_milliseconds();
        let duration_hours = round4(millis as f64 / 3_600_000.0);

        Ok(Self {
            id: id.into(),
            start,
            end,
            duration_hours,
            duty_type,
            cycle_id,
            pattern_group,
        })
    }

    /// Adapter for imported roster block rows.
    ///
    /// Duty type comes from the operator id embedded in the row
    /// (`FTIM_MKC_Solo2_Tractor_4_d2`).
    pub fn from_block_record(record: &BlockRecord) -> EngineResult<Self> {
        let operator = OperatorId::parse(&record.operator_id)
            .ok_or_else(|| EngineError::InvalidDutyType(record.operator_id.clone()))?;

        Self::new(
            record.block_id.clone(),
            record.start,
            record.end,
            operator.duty_type,
            record.cycle_id.clone(),
            record.pattern_group.clone(),
        )
    }

    /// Adapter for one occurrence of a recurring shift template.
    ///
    /// The template carries canonical wall-clock times; an occurrence pins
    /// them to a date. A template that ends at or before its start time
    /// crosses midnight, so the end date is bumped one day forward.
    pub fn from_template_occurrence(template: &ShiftTemplate, date: NaiveDate) -> EngineResult<Self> {
        let start = date.and_time(template.start_time).and_utc();
        let mut end = date.and_time(template.end_time).and_utc();
        if template.end_time <= template.start_time {
            end += Duration::days(1);
        }

        Self::new(
            format!("{}:{}", template.id, date),
            start,
            end,
            template.duty_type,
            template.cycle_id.clone(),
            template.pattern_group.clone(),
        )
    }
}

/// Raw imported roster block row, as produced by the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRecord {
    pub block_id: String,
    /// Operator id in `FTIM_<site>_<type>_Tractor_<n>_<suffix>` format.
    pub operator_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub cycle_id: Option<String>,
    pub pattern_group: Option<String>,
}

/// Recurring shift template; occurrences are stamped onto concrete dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: String,
    pub duty_type: DutyType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub cycle_id: Option<String>,
    pub pattern_group: Option<String>,
}

/// Fields decoded from an operator id like `FTIM_MKC_Solo2_Tractor_4_d2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorId {
    pub site: String,
    pub duty_type: DutyType,
    pub tractor: String,
}

impl OperatorId {
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split('_').collect();
        if parts.len() < 6 {
            return None;
        }

        Some(Self {
            site: parts[1].to_string(),
            duty_type: DutyType::parse(parts[2]).ok()?,
            tractor: parts[4].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse_duty_type_variants() {
        assert_eq!(DutyType::parse("solo1").unwrap(), DutyType::Solo1);
        assert_eq!(DutyType::parse("Solo 1").unwrap(), DutyType::Solo1);
        assert_eq!(DutyType::parse("SOLO1").unwrap(), DutyType::Solo1);
        assert_eq!(DutyType::parse("solo_2").unwrap(), DutyType::Solo2);
        assert_eq!(DutyType::parse(" Team ").unwrap(), DutyType::Team);
        assert!(DutyType::parse("solo3").is_err());
    }

    #[test]
    fn test_duration_rounded_to_four_decimals() {
        let start = ts(2025, 3, 10, 6, 0);
        // 13h29m59.999s of millisecond arithmetic, rounds to 13.5
        let end = start + Duration::milliseconds(48_599_999);
        let subject =
            AssignmentSubject::new("B1", start, end, DutyType::Solo1, None, None).unwrap();
        assert!((subject.duration_hours - 13.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round4_idempotent() {
        let d = 13.499_999_999_998;
        assert_eq!(round4(round4(d)), round4(d));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let start = ts(2025, 3, 10, 6, 0);
        let result = AssignmentSubject::new("B1", start, start, DutyType::Solo1, None, None);
        assert!(matches!(result, Err(EngineError::InvalidTimeRange { .. })));
    }

    #[test]
    fn test_operator_id_parse() {
        let op = OperatorId::parse("FTIM_MKC_Solo2_Tractor_4_d2").unwrap();
        assert_eq!(op.site, "MKC");
        assert_eq!(op.duty_type, DutyType::Solo2);
        assert_eq!(op.tractor, "4");

        assert!(OperatorId::parse("MKC_Solo2").is_none());
    }

    #[test]
    fn test_block_record_adapter() {
        let record = BlockRecord {
            block_id: "B-100".to_string(),
            operator_id: "FTIM_MKC_Solo1_Tractor_7_d1".to_string(),
            start: ts(2025, 3, 10, 6, 0),
            end: ts(2025, 3, 10, 19, 30),
            cycle_id: Some("CYC-A".to_string()),
            pattern_group: None,
        };

        let subject = AssignmentSubject::from_block_record(&record).unwrap();
        assert_eq!(subject.duty_type, DutyType::Solo1);
        assert!((subject.duration_hours - 13.5).abs() < f64::EPSILON);
        assert_eq!(subject.cycle_id.as_deref(), Some("CYC-A"));
    }

    #[test]
    fn test_cross_midnight_occurrence() {
        let template = ShiftTemplate {
            id: "T-NIGHT".to_string(),
            duty_type: DutyType::Solo1,
            start_time: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            cycle_id: None,
            pattern_group: Some("nights".to_string()),
        };

        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let subject = AssignmentSubject::from_template_occurrence(&template, date).unwrap();

        assert!(subject.end > subject.start);
        assert!((subject.duration_hours - 3.0).abs() < f64::EPSILON);
        assert_eq!(subject.end.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }
}
