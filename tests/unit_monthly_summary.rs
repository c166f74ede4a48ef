use chrono::{Datelike, NaiveDate, Weekday};

use homeroom::modules::attendance::summary::group_student_month;
use homeroom_models::attendance::{AbsenceType, AttendanceEvent, AttendanceRecord, MonthlyFill};
use homeroom_models::ids::{AttendanceRecordId, StudentId};
use homeroom_models::students::StudentBrief;

fn student() -> StudentBrief {
    StudentBrief {
        id: StudentId::new(),
        first_name: "Nicha".to_string(),
        last_name: "Suwan".to_string(),
        class_no: 7,
    }
}

fn record(
    student_id: StudentId,
    date: NaiveDate,
    event: AttendanceEvent,
    is_present: Option<bool>,
) -> AttendanceRecord {
    AttendanceRecord {
        id: Some(AttendanceRecordId::new()),
        student_id,
        date,
        event,
        is_present,
        absence_type: None,
        absence_reason: None,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn test_recorded_only_yields_one_entry_per_distinct_date() {
    let s = student();
    let rows = vec![
        record(s.id, day(13), AttendanceEvent::Assembly, Some(true)),
        record(s.id, day(13), AttendanceEvent::Homeroom, Some(true)),
        record(s.id, day(14), AttendanceEvent::Assembly, Some(false)),
        record(s.id, day(16), AttendanceEvent::Homeroom, Some(true)),
    ];

    let monthly = group_student_month(s, 2024, 5, rows, MonthlyFill::RecordedOnly);
    assert_eq!(monthly.attendances.len(), 3);

    let dates: Vec<NaiveDate> = monthly.attendances.iter().map(|a| a.date).collect();
    assert_eq!(dates, vec![day(13), day(14), day(16)]);
}

#[test]
fn test_missing_events_are_defaulted_not_omitted() {
    let s = student();
    let student_id = s.id;
    let rows = vec![record(
        student_id,
        day(14),
        AttendanceEvent::Assembly,
        Some(false),
    )];

    let monthly = group_student_month(s, 2024, 5, rows, MonthlyFill::RecordedOnly);
    assert_eq!(monthly.attendances.len(), 1);

    let entry = &monthly.attendances[0];
    assert_eq!(entry.assembly.is_present, Some(false));
    // The homeroom side exists with the default unrecorded shape.
    assert!(entry.homeroom.id.is_none());
    assert_eq!(entry.homeroom.is_present, None);
    assert_eq!(entry.homeroom.absence_type, None);
    assert_eq!(entry.homeroom.absence_reason, None);
    assert_eq!(entry.homeroom.student_id, student_id);
    assert_eq!(entry.homeroom.date, day(14));
}

#[test]
fn test_recorded_only_with_no_rows_is_empty() {
    let monthly = group_student_month(student(), 2024, 5, Vec::new(), MonthlyFill::RecordedOnly);
    assert!(monthly.attendances.is_empty());
}

#[test]
fn test_school_days_fill_covers_every_weekday() {
    let s = student();
    let rows = vec![record(s.id, day(13), AttendanceEvent::Assembly, Some(true))];

    let monthly = group_student_month(s, 2024, 5, rows, MonthlyFill::SchoolDays);
    // May 2024 has 23 Mondays-through-Fridays.
    assert_eq!(monthly.attendances.len(), 23);
    assert!(
        monthly
            .attendances
            .iter()
            .all(|a| !matches!(a.date.weekday(), Weekday::Sat | Weekday::Sun))
    );

    let recorded = monthly
        .attendances
        .iter()
        .find(|a| a.date == day(13))
        .unwrap();
    assert_eq!(recorded.assembly.is_present, Some(true));

    let defaulted = monthly
        .attendances
        .iter()
        .find(|a| a.date == day(14))
        .unwrap();
    assert_eq!(defaulted.assembly.is_present, None);
    assert_eq!(defaulted.homeroom.is_present, None);
}

#[test]
fn test_school_days_fill_keeps_recorded_weekend_days() {
    let s = student();
    // 2024-05-11 is a Saturday; a make-up class day with records.
    let saturday = day(11);
    let rows = vec![record(s.id, saturday, AttendanceEvent::Assembly, Some(true))];

    let monthly = group_student_month(s, 2024, 5, rows, MonthlyFill::SchoolDays);
    assert_eq!(monthly.attendances.len(), 24);
    assert!(monthly.attendances.iter().any(|a| a.date == saturday));
}

#[test]
fn test_rows_outside_the_month_are_ignored() {
    let s = student();
    let rows = vec![
        record(s.id, day(14), AttendanceEvent::Assembly, Some(true)),
        record(
            s.id,
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            AttendanceEvent::Assembly,
            Some(true),
        ),
        record(
            s.id,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            AttendanceEvent::Homeroom,
            Some(true),
        ),
    ];

    let monthly = group_student_month(s, 2024, 5, rows, MonthlyFill::RecordedOnly);
    assert_eq!(monthly.attendances.len(), 1);
    assert_eq!(monthly.attendances[0].date, day(14));
}

#[test]
fn test_entries_are_ordered_by_date() {
    let s = student();
    let rows = vec![
        record(s.id, day(29), AttendanceEvent::Assembly, Some(true)),
        record(s.id, day(2), AttendanceEvent::Assembly, Some(true)),
        record(s.id, day(17), AttendanceEvent::Assembly, Some(false)),
    ];

    let monthly = group_student_month(s, 2024, 5, rows, MonthlyFill::RecordedOnly);
    let dates: Vec<NaiveDate> = monthly.attendances.iter().map(|a| a.date).collect();
    assert_eq!(dates, vec![day(2), day(17), day(29)]);
}

#[test]
fn test_absence_details_survive_grouping() {
    let s = student();
    let mut row = record(s.id, day(14), AttendanceEvent::Assembly, Some(false));
    row.absence_type = Some(AbsenceType::Sick);
    row.absence_reason = Some("COVID-19".to_string());

    let monthly = group_student_month(s, 2024, 5, vec![row], MonthlyFill::RecordedOnly);
    let entry = &monthly.attendances[0];
    assert_eq!(entry.assembly.absence_type, Some(AbsenceType::Sick));
    assert!(entry.assembly.is_covid_related());
}
