//! Pure attendance reducers.
//!
//! Everything in this module is a synchronous function over
//! already-fetched rows; the service layer owns the queries. The domain
//! policies the reducers encode:
//!
//! - Homeroom overrides assembly as the basis for absence counts the
//!   moment a single homeroom record exists ([`preferred_event`]).
//! - Lateness is only ever recorded at assembly, so late counts always
//!   come from assembly records, whatever the preferred event is.
//! - Presence is derived from the preferred event's record count, never
//!   counted directly. A student marked late at assembly may be marked
//!   present at homeroom; counting `is_present == true` would count
//!   them twice.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use homeroom_models::attendance::{
    AbsenceType, AttendanceCounts, AttendanceEvent, AttendanceRecord, DayRecordPair, MonthlyFill,
    MonthlyStudentAttendance, StudentDayAttendance,
};
use homeroom_models::ids::StudentId;
use homeroom_models::students::StudentBrief;

/// The event absence counts are based on for a classroom/date:
/// homeroom as soon as any homeroom record exists, assembly otherwise.
pub fn preferred_event(records: &[AttendanceRecord]) -> AttendanceEvent {
    if records
        .iter()
        .any(|r| r.event == AttendanceEvent::Homeroom)
    {
        AttendanceEvent::Homeroom
    } else {
        AttendanceEvent::Assembly
    }
}

/// Reduces one classroom's records for one date to presence/late/absence
/// counts.
///
/// Returns `None` for an empty record set: a classroom where attendance
/// was never taken is excluded from the daily report, which is distinct
/// from "attendance taken, everyone present".
///
/// For consistent data the counts satisfy
/// `presence + late + absence == count(preferred-event records)`;
/// presence saturates at zero so partial data can never push it
/// negative.
pub fn summarize_classroom_day(records: &[AttendanceRecord]) -> Option<AttendanceCounts> {
    if records.is_empty() {
        return None;
    }

    let preferred = preferred_event(records);

    let late = records
        .iter()
        .filter(|r| {
            r.event == AttendanceEvent::Assembly && r.absence_type == Some(AbsenceType::Late)
        })
        .count() as i64;

    let total = records.iter().filter(|r| r.event == preferred).count() as i64;

    let absence = records
        .iter()
        .filter(|r| {
            r.event == preferred
                && r.is_present == Some(false)
                && r.absence_type != Some(AbsenceType::Late)
        })
        .count() as i64;

    let presence = (total - late - absence).max(0);

    Some(AttendanceCounts {
        presence,
        late,
        absence,
    })
}

/// The event a weekly estimate bases its absence count on: whichever
/// event has more rows that day.
pub fn preferred_estimate_event(assembly_total: i64, homeroom_total: i64) -> AttendanceEvent {
    if homeroom_total > assembly_total {
        AttendanceEvent::Homeroom
    } else {
        AttendanceEvent::Assembly
    }
}

/// Combines one day's estimated totals into chart counts. Attendance is
/// the larger of the two event totals; presence is derived and
/// saturates at zero.
pub fn combine_estimates(
    assembly_total: i64,
    homeroom_total: i64,
    late: i64,
    absence: i64,
) -> AttendanceCounts {
    let attendance = assembly_total.max(homeroom_total);
    AttendanceCounts {
        presence: (attendance - late - absence).max(0),
        late,
        absence,
    }
}

/// Builds the per-student normalized view of one classroom/date.
///
/// Every roster student appears exactly once with both event records,
/// defaulted to unrecorded where no row exists. Rows whose student is
/// not on the roster (a broken join upstream) are dropped silently and
/// read as "no attendance data". Output follows roster order.
pub fn normalize_rows(
    date: NaiveDate,
    roster: &[StudentBrief],
    rows: Vec<AttendanceRecord>,
) -> Vec<StudentDayAttendance> {
    let mut by_student: BTreeMap<StudentId, (Option<AttendanceRecord>, Option<AttendanceRecord>)> =
        roster.iter().map(|s| (s.id, (None, None))).collect();

    for row in rows {
        let Some(slot) = by_student.get_mut(&row.student_id) else {
            continue;
        };
        match row.event {
            AttendanceEvent::Assembly => slot.0 = Some(row),
            AttendanceEvent::Homeroom => slot.1 = Some(row),
        }
    }

    roster
        .iter()
        .map(|student| {
            let (assembly, homeroom) = by_student
                .remove(&student.id)
                .unwrap_or((None, None));
            StudentDayAttendance {
                student: student.clone(),
                assembly: assembly.unwrap_or_else(|| {
                    AttendanceRecord::unrecorded(student.id, date, AttendanceEvent::Assembly)
                }),
                homeroom: homeroom.unwrap_or_else(|| {
                    AttendanceRecord::unrecorded(student.id, date, AttendanceEvent::Homeroom)
                }),
            }
        })
        .collect()
}

/// Groups one student's records for one month into ordered date
/// entries.
///
/// With [`MonthlyFill::RecordedOnly`] only dates that have at least one
/// row appear; with [`MonthlyFill::SchoolDays`] every Monday-Friday of
/// the month appears, defaulted where empty. Either way both events are
/// always populated, defaulted per date when missing. Rows outside the
/// month are ignored.
pub fn group_student_month(
    student: StudentBrief,
    year: i32,
    month: u32,
    rows: Vec<AttendanceRecord>,
    fill: MonthlyFill,
) -> MonthlyStudentAttendance {
    let (first, last) = match month_bounds(year, month) {
        Some(bounds) => bounds,
        None => {
            return MonthlyStudentAttendance {
                student,
                attendances: Vec::new(),
            };
        }
    };

    let mut by_date: BTreeMap<NaiveDate, (Option<AttendanceRecord>, Option<AttendanceRecord>)> =
        BTreeMap::new();

    if fill == MonthlyFill::SchoolDays {
        for date in school_days(first, last) {
            by_date.insert(date, (None, None));
        }
    }

    for row in rows {
        if row.date < first || row.date > last {
            continue;
        }
        let slot = by_date.entry(row.date).or_insert((None, None));
        match row.event {
            AttendanceEvent::Assembly => slot.0 = Some(row),
            AttendanceEvent::Homeroom => slot.1 = Some(row),
        }
    }

    let student_id = student.id;
    let attendances = by_date
        .into_iter()
        .map(|(date, (assembly, homeroom))| DayRecordPair {
            date,
            assembly: assembly.unwrap_or_else(|| {
                AttendanceRecord::unrecorded(student_id, date, AttendanceEvent::Assembly)
            }),
            homeroom: homeroom.unwrap_or_else(|| {
                AttendanceRecord::unrecorded(student_id, date, AttendanceEvent::Homeroom)
            }),
        })
        .collect();

    MonthlyStudentAttendance {
        student,
        attendances,
    }
}

/// The five weekdays of the week starting at `monday`.
pub fn week_dates(monday: NaiveDate) -> [NaiveDate; 5] {
    [0u64, 1, 2, 3, 4].map(|offset| monday + Days::new(offset))
}

/// Parses a `YYYY-MM` month key.
pub fn parse_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.trim().split_once('-')?;
    if year.len() != 4 {
        return None;
    }
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// First and last date of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))?;
    Some((first, last))
}

/// The Mondays-through-Fridays between `first` and `last`, inclusive.
fn school_days(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first
        .iter_days()
        .take_while(move |d| *d <= last)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_parsing() {
        assert_eq!(parse_month("2024-05"), Some((2024, 5)));
        assert_eq!(parse_month(" 2024-12 "), Some((2024, 12)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("2024"), None);
        assert_eq!(parse_month("24-05"), None);
        assert_eq!(parse_month("2024-xx"), None);
    }

    #[test]
    fn month_bounds_handles_length_variations() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, last) = month_bounds(2023, 2).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());

        let (_, last) = month_bounds(2024, 12).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn school_days_skip_weekends() {
        // May 2024 starts on a Wednesday and has 31 days.
        let (first, last) = month_bounds(2024, 5).unwrap();
        let days: Vec<_> = school_days(first, last).collect();
        assert_eq!(days.len(), 23);
        assert!(days.iter().all(|d| d.weekday() != Weekday::Sat));
        assert!(days.iter().all(|d| d.weekday() != Weekday::Sun));
    }

    #[test]
    fn estimate_event_prefers_larger_homeroom_count() {
        assert_eq!(
            preferred_estimate_event(30, 31),
            AttendanceEvent::Homeroom
        );
        assert_eq!(
            preferred_estimate_event(30, 30),
            AttendanceEvent::Assembly
        );
        assert_eq!(preferred_estimate_event(0, 0), AttendanceEvent::Assembly);
    }

    #[test]
    fn combine_estimates_saturates_presence() {
        let counts = combine_estimates(10, 0, 8, 5);
        assert_eq!(counts.presence, 0);
        assert_eq!(counts.late, 8);
        assert_eq!(counts.absence, 5);
    }
}
