//! Attendance seeding functionality.
//!
//! Generates a plausible attendance history: most students present,
//! a few late at assembly (and then present at homeroom), a few absent
//! at both events with a random absence type.

use std::time::Instant;

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use homeroom_models::attendance::{AbsenceType, AttendanceEvent, COVID_REASON};
use homeroom_models::ids::StudentId;

use super::models::AttendanceSeed;

const ABSENCE_POOL: &[AbsenceType] = &[
    AbsenceType::Sick,
    AbsenceType::Sick,
    AbsenceType::Activity,
    AbsenceType::Business,
    AbsenceType::Absent,
    AbsenceType::OnLeave,
    AbsenceType::Other,
];

/// The most recent `count` school days (Mon-Fri), oldest first.
pub fn recent_school_days(count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut date = Utc::now().date_naive();
    while days.len() < count {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(date);
        }
        date = match date.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => break,
        };
    }
    days.reverse();
    days
}

/// Generates both event records for every student on every date.
pub fn generate_attendance(student_ids: &[StudentId], dates: &[NaiveDate]) -> Vec<AttendanceSeed> {
    student_ids
        .par_iter()
        .flat_map(|&student_id| {
            let mut rng = rand::thread_rng();
            let mut records = Vec::with_capacity(dates.len() * 2);

            for &date in dates {
                let roll: f64 = rng.r#gen();
                if roll < 0.90 {
                    // Present at both events.
                    records.push(present(student_id, date, AttendanceEvent::Assembly));
                    records.push(present(student_id, date, AttendanceEvent::Homeroom));
                } else if roll < 0.95 {
                    // Late at assembly, present by homeroom.
                    records.push(AttendanceSeed {
                        student_id,
                        date,
                        event: AttendanceEvent::Assembly,
                        is_present: Some(false),
                        absence_type: Some(AbsenceType::Late),
                        absence_reason: None,
                    });
                    records.push(present(student_id, date, AttendanceEvent::Homeroom));
                } else {
                    // Absent all day.
                    let absence_type = *ABSENCE_POOL.choose(&mut rng).unwrap_or(&AbsenceType::Absent);
                    let absence_reason = if absence_type == AbsenceType::Sick && rng.r#gen::<f64>() < 0.2
                    {
                        Some(COVID_REASON.to_string())
                    } else {
                        None
                    };
                    for event in [AttendanceEvent::Assembly, AttendanceEvent::Homeroom] {
                        records.push(AttendanceSeed {
                            student_id,
                            date,
                            event,
                            is_present: Some(false),
                            absence_type: Some(absence_type),
                            absence_reason: absence_reason.clone(),
                        });
                    }
                }
            }

            records
        })
        .collect()
}

fn present(student_id: StudentId, date: NaiveDate, event: AttendanceEvent) -> AttendanceSeed {
    AttendanceSeed {
        student_id,
        date,
        event,
        is_present: Some(true),
        absence_type: None,
        absence_reason: None,
    }
}

/// Seeds attendance history for the given students.
pub async fn seed_attendance(
    db: &PgPool,
    student_ids: &[StudentId],
    school_days: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let dates = recent_school_days(school_days);
    println!(
        "📋 Seeding attendance for {} students over {} school days...",
        student_ids.len(),
        dates.len()
    );

    let records = generate_attendance(student_ids, &dates);
    let inserted = insert_attendance_batch(db, &records).await?;

    println!(
        "   ✓ Inserted {} attendance records in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

/// Inserts attendance records in batches using multi-value INSERT
/// statements.
pub async fn insert_attendance_batch(
    db: &PgPool,
    records: &[AttendanceSeed],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut inserted = 0;

    for chunk in records.chunks(BATCH_SIZE) {
        inserted += insert_attendance_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_attendance_chunk(
    tx: &mut Transaction<'_, Postgres>,
    records: &[AttendanceSeed],
) -> Result<usize, Box<dyn std::error::Error>> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut query = String::from(
        "INSERT INTO attendance_records \
         (student_id, date, event, is_present, absence_type, absence_reason) VALUES ",
    );
    for i in 0..records.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }
    query.push_str(" ON CONFLICT (student_id, date, event) DO NOTHING");

    let mut q = sqlx::query(&query);
    for record in records {
        q = q
            .bind(record.student_id)
            .bind(record.date)
            .bind(record.event)
            .bind(record.is_present)
            .bind(record.absence_type)
            .bind(&record.absence_reason);
    }

    let result = q.execute(&mut **tx).await?;
    Ok(result.rows_affected() as usize)
}

/// Clears all attendance records and homeroom notes.
pub async fn clear_attendance(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing attendance records...");

    let notes = sqlx::query("DELETE FROM homeroom_contents")
        .execute(db)
        .await?
        .rows_affected();
    let records = sqlx::query("DELETE FROM attendance_records")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} records and {} notes in {:?}",
        records,
        notes,
        start_time.elapsed()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeroom_models::attendance::check_attendance_flags;

    #[test]
    fn school_days_exclude_weekends_and_come_oldest_first() {
        let days = recent_school_days(10);
        assert_eq!(days.len(), 10);
        assert!(days.iter().all(|d| !matches!(
            d.weekday(),
            Weekday::Sat | Weekday::Sun
        )));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn generated_records_cover_both_events() {
        let students = vec![StudentId::new(), StudentId::new()];
        let dates = recent_school_days(5);
        let records = generate_attendance(&students, &dates);
        assert_eq!(records.len(), students.len() * dates.len() * 2);
    }

    #[test]
    fn generated_records_are_always_consistent() {
        let students = vec![StudentId::new()];
        let dates = recent_school_days(30);
        let records = generate_attendance(&students, &dates);
        for record in &records {
            check_attendance_flags(
                record.is_present,
                record.absence_type,
                record.absence_reason.as_deref(),
            )
            .expect("seeded record violates attendance rules");
        }
    }

    #[test]
    fn late_is_only_generated_at_assembly() {
        let students: Vec<StudentId> = (0..20).map(|_| StudentId::new()).collect();
        let dates = recent_school_days(20);
        let records = generate_attendance(&students, &dates);
        assert!(
            records
                .iter()
                .filter(|r| r.absence_type == Some(AbsenceType::Late))
                .all(|r| r.event == AttendanceEvent::Assembly)
        );
    }
}
