use chrono::{Datelike, NaiveDate, Weekday};

use homeroom::modules::attendance::summary::{
    combine_estimates, preferred_estimate_event, week_dates,
};
use homeroom_models::attendance::{AttendanceCounts, AttendanceEvent};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
}

#[test]
fn test_week_has_exactly_five_consecutive_days() {
    let days = week_dates(monday());
    assert_eq!(days.len(), 5);
    assert_eq!(days[0], monday());
    assert_eq!(days[0].weekday(), Weekday::Mon);
    assert_eq!(days[4].weekday(), Weekday::Fri);
    for pair in days.windows(2) {
        assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
    }
}

#[test]
fn test_absence_basis_follows_larger_event_count() {
    // More homeroom rows than assembly rows: homeroom is the basis.
    assert_eq!(
        preferred_estimate_event(520, 540),
        AttendanceEvent::Homeroom
    );
    // Ties and assembly-heavy days stay on assembly.
    assert_eq!(
        preferred_estimate_event(540, 540),
        AttendanceEvent::Assembly
    );
    assert_eq!(preferred_estimate_event(540, 0), AttendanceEvent::Assembly);
}

#[test]
fn test_estimates_combine_against_the_larger_total() {
    let counts = combine_estimates(530, 540, 12, 25);
    assert_eq!(counts.late, 12);
    assert_eq!(counts.absence, 25);
    assert_eq!(counts.presence, 540 - 12 - 25);
    assert_eq!(counts.total(), 540);
}

#[test]
fn test_combined_estimates_are_never_negative() {
    let cases = [
        (0, 0, 0, 0),
        (10, 0, 20, 0),
        (10, 5, 4, 30),
        (0, 3, 5, 5),
    ];
    for (assembly, homeroom, late, absence) in cases {
        let counts = combine_estimates(assembly, homeroom, late, absence);
        assert!(counts.presence >= 0);
        assert!(counts.late >= 0);
        assert!(counts.absence >= 0);
    }
}

#[test]
fn test_degraded_day_shape_is_all_zero() {
    // A day whose queries failed is represented by the default counts.
    let degraded = AttendanceCounts::default();
    assert_eq!(degraded.presence, 0);
    assert_eq!(degraded.late, 0);
    assert_eq!(degraded.absence, 0);
    assert_eq!(degraded.total(), 0);
}

#[test]
fn test_empty_school_day_combines_to_zero() {
    let counts = combine_estimates(0, 0, 0, 0);
    assert_eq!(counts, AttendanceCounts::default());
}
