//! Attendance domain models and DTOs.
//!
//! The attendance domain revolves around one row per student, per
//! [`AttendanceEvent`], per calendar date. Events form a closed enum:
//! using text keys for events was the historical source of silently
//! missing data, so any unknown event text coming back from the
//! database is a decode error here, never an empty value.
//!
//! The summary types in this module ([`ClassroomDailySummary`],
//! [`WeeklyAttendanceSummary`], [`MonthlyStudentAttendance`]) are
//! derived views: they are recomputed from the raw rows on every
//! request and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use homeroom_core::serde::deserialize_optional_from_str;

use crate::classrooms::ClassroomBrief;
use crate::ids::{AttendanceRecordId, ClassroomId, StudentId};
use crate::students::StudentBrief;

/// Sentinel stored in `absence_reason` to mark a sick absence as
/// COVID-related. Kept as the literal string the mobile clients already
/// send.
pub const COVID_REASON: &str = "COVID-19";

/// Error for enum text that doesn't match any known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.value, self.kind)
    }
}

macro_rules! text_enum_sqlx {
    ($name:ident) => {
        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(
                    &self.as_str().to_string(),
                    buf,
                )
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<$name>()?)
            }
        }
    };
}

/// The two attendance-taking events of a school day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceEvent {
    /// School-wide morning assembly.
    Assembly,
    /// Classroom-level homeroom period. When homeroom records exist for
    /// a classroom/date, they override assembly as the basis for
    /// absence counts.
    Homeroom,
}

impl AttendanceEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assembly => "assembly",
            Self::Homeroom => "homeroom",
        }
    }
}

impl fmt::Display for AttendanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceEvent {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assembly" => Ok(Self::Assembly),
            "homeroom" => Ok(Self::Homeroom),
            other => Err(ParseEnumError::new("attendance event", other)),
        }
    }
}

text_enum_sqlx!(AttendanceEvent);

/// Why a student was not (fully) present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceType {
    /// Arrived after assembly started. Only recorded at assembly;
    /// homeroom has no lateness concept.
    Late,
    Sick,
    Activity,
    Business,
    Absent,
    Dropped,
    Other,
    OnLeave,
}

impl AbsenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Late => "late",
            Self::Sick => "sick",
            Self::Activity => "activity",
            Self::Business => "business",
            Self::Absent => "absent",
            Self::Dropped => "dropped",
            Self::Other => "other",
            Self::OnLeave => "on_leave",
        }
    }
}

impl fmt::Display for AbsenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbsenceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "late" => Ok(Self::Late),
            "sick" => Ok(Self::Sick),
            "activity" => Ok(Self::Activity),
            "business" => Ok(Self::Business),
            "absent" => Ok(Self::Absent),
            "dropped" => Ok(Self::Dropped),
            "other" => Ok(Self::Other),
            "on_leave" => Ok(Self::OnLeave),
            other => Err(ParseEnumError::new("absence type", other)),
        }
    }
}

text_enum_sqlx!(AbsenceType);

/// A rule violation in an attendance record's flag combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceRuleError {
    /// `is_present` is true but an absence type or reason is set.
    PresentWithAbsence,
    /// `absence_type` is `late` but the record is not marked absent.
    LateNotMarkedAbsent,
}

impl std::error::Error for AttendanceRuleError {}

impl fmt::Display for AttendanceRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PresentWithAbsence => {
                write!(f, "a present record cannot carry an absence type or reason")
            }
            Self::LateNotMarkedAbsent => {
                write!(f, "a late record must have is_present set to false")
            }
        }
    }
}

/// Checks the flag combination of one attendance record.
///
/// The two rules guarded here keep the daily summaries consistent:
/// presence is derived from the record count, so a present record that
/// also carries an absence type would be counted twice.
pub fn check_attendance_flags(
    is_present: Option<bool>,
    absence_type: Option<AbsenceType>,
    absence_reason: Option<&str>,
) -> Result<(), AttendanceRuleError> {
    if is_present == Some(true) && (absence_type.is_some() || absence_reason.is_some()) {
        return Err(AttendanceRuleError::PresentWithAbsence);
    }
    if absence_type == Some(AbsenceType::Late) && is_present != Some(false) {
        return Err(AttendanceRuleError::LateNotMarkedAbsent);
    }
    Ok(())
}

/// One attendance record: a student's state at one event on one date.
///
/// `is_present: None` means "not yet recorded"; derived views use
/// [`AttendanceRecord::unrecorded`] to fill gaps so consumers never
/// distinguish missing rows from unrecorded ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: Option<AttendanceRecordId>,
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub event: AttendanceEvent,
    pub is_present: Option<bool>,
    pub absence_type: Option<AbsenceType>,
    pub absence_reason: Option<String>,
}

impl AttendanceRecord {
    /// The default record for a student/event/date with no stored row.
    pub fn unrecorded(student_id: StudentId, date: NaiveDate, event: AttendanceEvent) -> Self {
        Self {
            id: None,
            student_id,
            date,
            event,
            is_present: None,
            absence_type: None,
            absence_reason: None,
        }
    }

    /// Whether this is a sick absence flagged with the COVID sentinel.
    pub fn is_covid_related(&self) -> bool {
        self.absence_type == Some(AbsenceType::Sick)
            && self.absence_reason.as_deref() == Some(COVID_REASON)
    }

    /// Validates the flag combination; see [`check_attendance_flags`].
    pub fn check_consistent(&self) -> Result<(), AttendanceRuleError> {
        check_attendance_flags(
            self.is_present,
            self.absence_type,
            self.absence_reason.as_deref(),
        )
    }
}

/// A stored attendance row as selected from `attendance_records`.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRowDb {
    pub id: AttendanceRecordId,
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub event: AttendanceEvent,
    pub is_present: Option<bool>,
    pub absence_type: Option<AbsenceType>,
    pub absence_reason: Option<String>,
}

impl AttendanceRowDb {
    pub fn into_record(self) -> AttendanceRecord {
        AttendanceRecord {
            id: Some(self.id),
            student_id: self.student_id,
            date: self.date,
            event: self.event,
            is_present: self.is_present,
            absence_type: self.absence_type,
            absence_reason: self.absence_reason,
        }
    }
}

/// An attendance row joined with its classroom, for the daily report.
#[derive(Debug, Clone, FromRow)]
pub struct DailyReportRow {
    pub classroom_id: ClassroomId,
    pub classroom_number: i32,
    #[sqlx(flatten)]
    pub record: AttendanceRowDb,
}

/// A homeroom teacher's note for one classroom/date.
#[derive(Debug, Clone, FromRow)]
pub struct HomeroomContentRow {
    pub classroom_id: ClassroomId,
    pub content: String,
}

/// Presence/late/absence counts for one classroom/date or one school
/// day.
///
/// Holds `presence + late + absence == total records of the counted
/// event` for exactly computed summaries; weekly summaries are
/// approximate by contract and may be all zero for a degraded day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceCounts {
    pub presence: i64,
    pub late: i64,
    pub absence: i64,
}

impl AttendanceCounts {
    pub fn total(&self) -> i64 {
        self.presence + self.late + self.absence
    }
}

/// One classroom's summary in the daily report. Classrooms with no
/// records for the date are excluded from the report entirely.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassroomDailySummary {
    pub classroom: ClassroomBrief,
    pub summary: AttendanceCounts,
    pub homeroom_content: Option<String>,
}

/// One student's normalized records for one date: always both events,
/// defaulted when unrecorded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentDayAttendance {
    pub student: StudentBrief,
    pub assembly: AttendanceRecord,
    pub homeroom: AttendanceRecord,
}

/// Both event records for one date in a monthly view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayRecordPair {
    pub date: NaiveDate,
    pub assembly: AttendanceRecord,
    pub homeroom: AttendanceRecord,
}

/// A student's attendance across one calendar month, ordered by date.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyStudentAttendance {
    pub student: StudentBrief,
    pub attendances: Vec<DayRecordPair>,
}

/// Approximate counts for one school day of the weekly chart.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub counts: AttendanceCounts,
}

/// School-wide summary for the five weekdays starting at a Monday.
///
/// Values are estimates for chart rendering and must not be presented
/// as exact figures.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeeklyAttendanceSummary {
    pub week_start: NaiveDate,
    pub days: Vec<DaySummary>,
}

/// How the monthly view treats dates without any stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MonthlyFill {
    /// Only dates with at least one stored row appear (historical
    /// behavior; callers must tolerate sparse coverage).
    RecordedOnly,
    /// Every Monday-Friday of the month appears; dates without rows get
    /// all-default entries.
    SchoolDays,
}

impl FromStr for MonthlyFill {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recorded-only" => Ok(Self::RecordedOnly),
            "school-days" => Ok(Self::SchoolDays),
            other => Err(ParseEnumError::new("monthly fill mode", other)),
        }
    }
}

/// Query parameters for the daily report.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyReportParams {
    /// The date to report on.
    pub date: NaiveDate,
}

/// Query parameters for the weekly summary.
#[derive(Debug, Deserialize, IntoParams)]
pub struct WeeklyParams {
    /// The Monday the week starts on.
    pub monday: NaiveDate,
}

/// Query parameters for the monthly student view.
#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlyParams {
    /// Calendar month in `YYYY-MM` form.
    pub month: String,
    /// Fill mode override; server default applies when omitted.
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<String>)]
    pub fill: Option<MonthlyFill>,
}

/// Query parameters for the per-classroom day roster.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ClassroomDayParams {
    /// The date to load or record.
    pub date: NaiveDate,
}

/// One student/event entry in a bulk recording request.
///
/// Field shapes are checked by `validate()`; the cross-field flag rules
/// are checked separately via [`RecordEntryDto::check_consistent`] so
/// the violation maps to a per-entry error message.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordEntryDto {
    pub student_id: StudentId,
    pub event: AttendanceEvent,
    pub is_present: Option<bool>,
    pub absence_type: Option<AbsenceType>,
    #[validate(length(max = 200))]
    pub absence_reason: Option<String>,
}

impl RecordEntryDto {
    /// Validates the flag combination; see [`check_attendance_flags`].
    pub fn check_consistent(&self) -> Result<(), AttendanceRuleError> {
        check_attendance_flags(
            self.is_present,
            self.absence_type,
            self.absence_reason.as_deref(),
        )
    }
}

/// Bulk recording request for one classroom/date: the full record set
/// for both events plus an optional homeroom note.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordClassroomAttendanceDto {
    #[validate(length(max = 2000))]
    pub homeroom_content: Option<String>,
    #[validate(nested)]
    pub entries: Vec<RecordEntryDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn student() -> StudentId {
        StudentId::from_uuid(Uuid::nil())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
    }

    #[test]
    fn event_text_round_trips() {
        for event in [AttendanceEvent::Assembly, AttendanceEvent::Homeroom] {
            assert_eq!(event.as_str().parse::<AttendanceEvent>().unwrap(), event);
        }
        assert!("lunch".parse::<AttendanceEvent>().is_err());
    }

    #[test]
    fn absence_type_text_round_trips() {
        for absence in [
            AbsenceType::Late,
            AbsenceType::Sick,
            AbsenceType::Activity,
            AbsenceType::Business,
            AbsenceType::Absent,
            AbsenceType::Dropped,
            AbsenceType::Other,
            AbsenceType::OnLeave,
        ] {
            assert_eq!(absence.as_str().parse::<AbsenceType>().unwrap(), absence);
        }
        assert!("vacation".parse::<AbsenceType>().is_err());
    }

    #[test]
    fn serde_names_match_wire_format() {
        let json = serde_json::to_string(&AbsenceType::OnLeave).unwrap();
        assert_eq!(json, r#""on_leave""#);
        let json = serde_json::to_string(&AttendanceEvent::Homeroom).unwrap();
        assert_eq!(json, r#""homeroom""#);
    }

    #[test]
    fn present_record_cannot_carry_absence_data() {
        let err = check_attendance_flags(Some(true), Some(AbsenceType::Sick), None).unwrap_err();
        assert_eq!(err, AttendanceRuleError::PresentWithAbsence);

        let err = check_attendance_flags(Some(true), None, Some("note")).unwrap_err();
        assert_eq!(err, AttendanceRuleError::PresentWithAbsence);
    }

    #[test]
    fn late_requires_absent_flag() {
        let err = check_attendance_flags(None, Some(AbsenceType::Late), None).unwrap_err();
        assert_eq!(err, AttendanceRuleError::LateNotMarkedAbsent);

        assert!(check_attendance_flags(Some(false), Some(AbsenceType::Late), None).is_ok());
    }

    #[test]
    fn unrecorded_is_consistent_and_all_null() {
        let record = AttendanceRecord::unrecorded(student(), date(), AttendanceEvent::Assembly);
        assert!(record.check_consistent().is_ok());
        assert!(record.id.is_none());
        assert!(record.is_present.is_none());
        assert!(record.absence_type.is_none());
        assert!(record.absence_reason.is_none());
    }

    #[test]
    fn covid_detection_needs_sick_and_sentinel() {
        let mut record = AttendanceRecord::unrecorded(student(), date(), AttendanceEvent::Assembly);
        record.is_present = Some(false);
        record.absence_type = Some(AbsenceType::Sick);
        record.absence_reason = Some(COVID_REASON.to_string());
        assert!(record.is_covid_related());

        record.absence_type = Some(AbsenceType::Absent);
        assert!(!record.is_covid_related());

        record.absence_type = Some(AbsenceType::Sick);
        record.absence_reason = Some("flu".to_string());
        assert!(!record.is_covid_related());
    }

    #[test]
    fn record_entry_dto_rejects_inconsistent_flags() {
        let entry = RecordEntryDto {
            student_id: student(),
            event: AttendanceEvent::Assembly,
            is_present: Some(true),
            absence_type: Some(AbsenceType::Late),
            absence_reason: None,
        };
        assert!(entry.check_consistent().is_err());

        let entry = RecordEntryDto {
            student_id: student(),
            event: AttendanceEvent::Assembly,
            is_present: Some(false),
            absence_type: Some(AbsenceType::Late),
            absence_reason: None,
        };
        assert!(entry.check_consistent().is_ok());
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn monthly_fill_parses_kebab_case() {
        assert_eq!(
            "recorded-only".parse::<MonthlyFill>().unwrap(),
            MonthlyFill::RecordedOnly
        );
        assert_eq!(
            "school-days".parse::<MonthlyFill>().unwrap(),
            MonthlyFill::SchoolDays
        );
        assert!("all".parse::<MonthlyFill>().is_err());
    }

    #[test]
    fn counts_total() {
        let counts = AttendanceCounts {
            presence: 30,
            late: 2,
            absence: 3,
        };
        assert_eq!(counts.total(), 35);
    }
}
