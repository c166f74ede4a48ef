use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Weekday};
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use homeroom_models::attendance::{
    AttendanceCounts, AttendanceRecord, AttendanceRowDb, ClassroomDailySummary, DailyReportRow,
    DaySummary, HomeroomContentRow, MonthlyFill, MonthlyStudentAttendance,
    RecordClassroomAttendanceDto, StudentDayAttendance, WeeklyAttendanceSummary,
};
use homeroom_models::classrooms::ClassroomBrief;
use homeroom_models::ids::{ClassroomId, StudentId};
use homeroom_models::students::StudentBrief;

use crate::modules::attendance::summary::{
    combine_estimates, group_student_month, month_bounds, normalize_rows, parse_month,
    preferred_estimate_event, summarize_classroom_day, week_dates,
};
use crate::utils::errors::AppError;

pub struct AttendanceService;

impl AttendanceService {
    /// Per-classroom summaries for one date. Classrooms without any
    /// records for the date do not appear.
    #[instrument(skip(db))]
    pub async fn daily_report(
        db: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<ClassroomDailySummary>, AppError> {
        let rows = sqlx::query_as::<_, DailyReportRow>(
            r#"
            SELECT c.id AS classroom_id, c.number AS classroom_number,
                   ar.id, ar.student_id, ar.date, ar.event,
                   ar.is_present, ar.absence_type, ar.absence_reason
            FROM attendance_records ar
            JOIN students s ON s.id = ar.student_id
            JOIN classrooms c ON c.id = s.classroom_id
            WHERE ar.date = $1
            "#,
        )
        .bind(date)
        .fetch_all(db)
        .await
        .context("Failed to fetch attendance rows for daily report")
        .map_err(AppError::database)?;

        let notes = sqlx::query_as::<_, HomeroomContentRow>(
            "SELECT classroom_id, content FROM homeroom_contents WHERE date = $1",
        )
        .bind(date)
        .fetch_all(db)
        .await
        .context("Failed to fetch homeroom notes for daily report")
        .map_err(AppError::database)?;

        let mut notes_by_classroom: HashMap<ClassroomId, String> = notes
            .into_iter()
            .map(|note| (note.classroom_id, note.content))
            .collect();

        // Keyed by display number so the report comes out in classroom
        // order.
        let mut by_classroom: BTreeMap<(i32, ClassroomId), Vec<AttendanceRecord>> =
            BTreeMap::new();
        for row in rows {
            by_classroom
                .entry((row.classroom_number, row.classroom_id))
                .or_default()
                .push(row.record.into_record());
        }

        let report = by_classroom
            .into_iter()
            .filter_map(|((number, id), records)| {
                summarize_classroom_day(&records).map(|summary| ClassroomDailySummary {
                    classroom: ClassroomBrief { id, number },
                    summary,
                    homeroom_content: notes_by_classroom.remove(&id),
                })
            })
            .collect();

        Ok(report)
    }

    /// School-wide approximate summary for the five weekdays starting
    /// at `monday`. A day whose count queries fail degrades to zeros
    /// instead of failing the whole week; the chart is not critical
    /// data.
    #[instrument(skip(db))]
    pub async fn weekly_summary(
        db: &PgPool,
        monday: NaiveDate,
    ) -> Result<WeeklyAttendanceSummary, AppError> {
        if monday.weekday() != Weekday::Mon {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "{} is not a Monday",
                monday
            )));
        }

        let mut days = Vec::with_capacity(5);
        for date in week_dates(monday) {
            let counts = match Self::day_estimates(db, date).await {
                Ok(counts) => counts,
                Err(error) => {
                    warn!(%date, error = %error.error, "Weekly summary day degraded to zeros");
                    AttendanceCounts::default()
                }
            };
            days.push(DaySummary { date, counts });
        }

        Ok(WeeklyAttendanceSummary {
            week_start: monday,
            days,
        })
    }

    /// One day's estimated counts for the weekly chart.
    async fn day_estimates(db: &PgPool, date: NaiveDate) -> Result<AttendanceCounts, AppError> {
        let assembly_total = Self::count_event(db, date, "assembly").await?;
        let homeroom_total = Self::count_event(db, date, "homeroom").await?;

        let late: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM attendance_records
            WHERE date = $1 AND event = 'assembly' AND absence_type = 'late'
            "#,
        )
        .bind(date)
        .fetch_one(db)
        .await
        .context("Failed to count late records")
        .map_err(AppError::database)?;

        let preferred = preferred_estimate_event(assembly_total, homeroom_total);
        let absence: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM attendance_records
            WHERE date = $1 AND event = $2 AND is_present = FALSE
              AND (absence_type IS NULL OR absence_type <> 'late')
            "#,
        )
        .bind(date)
        .bind(preferred)
        .fetch_one(db)
        .await
        .context("Failed to count absences")
        .map_err(AppError::database)?;

        Ok(combine_estimates(
            assembly_total,
            homeroom_total,
            late,
            absence,
        ))
    }

    async fn count_event(db: &PgPool, date: NaiveDate, event: &str) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records WHERE date = $1 AND event = $2",
        )
        .bind(date)
        .bind(event)
        .fetch_one(db)
        .await
        .with_context(|| format!("Failed to count {} records", event))
        .map_err(AppError::database)
    }

    /// One student's attendance grouped by date across a calendar
    /// month.
    #[instrument(skip(db))]
    pub async fn monthly_student(
        db: &PgPool,
        student_id: Uuid,
        month: &str,
        fill: MonthlyFill,
    ) -> Result<MonthlyStudentAttendance, AppError> {
        let (year, month_num) = parse_month(month)
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("month must be YYYY-MM")))?;

        let student = sqlx::query_as::<_, StudentBrief>(
            "SELECT id, first_name, last_name, class_no FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let (first, last) = month_bounds(year, month_num)
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("month must be YYYY-MM")))?;

        let rows = sqlx::query_as::<_, AttendanceRowDb>(
            r#"
            SELECT id, student_id, date, event, is_present, absence_type, absence_reason
            FROM attendance_records
            WHERE student_id = $1 AND date BETWEEN $2 AND $3
            "#,
        )
        .bind(student.id)
        .bind(first)
        .bind(last)
        .fetch_all(db)
        .await
        .context("Failed to fetch monthly attendance rows")
        .map_err(AppError::database)?;

        let records = rows.into_iter().map(AttendanceRowDb::into_record).collect();
        Ok(group_student_month(student, year, month_num, records, fill))
    }

    /// Normalized per-student view of one classroom/date, for the
    /// recording UI.
    #[instrument(skip(db))]
    pub async fn classroom_day(
        db: &PgPool,
        classroom_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<StudentDayAttendance>, AppError> {
        Self::ensure_classroom_exists(db, classroom_id).await?;

        let roster = Self::fetch_roster(db, classroom_id).await?;

        let rows = sqlx::query_as::<_, AttendanceRowDb>(
            r#"
            SELECT ar.id, ar.student_id, ar.date, ar.event,
                   ar.is_present, ar.absence_type, ar.absence_reason
            FROM attendance_records ar
            JOIN students s ON s.id = ar.student_id
            WHERE s.classroom_id = $1 AND ar.date = $2
            "#,
        )
        .bind(classroom_id)
        .bind(date)
        .fetch_all(db)
        .await
        .context("Failed to fetch classroom day attendance")
        .map_err(AppError::database)?;

        let records = rows.into_iter().map(AttendanceRowDb::into_record).collect();
        Ok(normalize_rows(date, &roster, records))
    }

    /// Upserts the full record set for one classroom/date and the
    /// optional homeroom note, then returns the refreshed normalized
    /// view.
    #[instrument(skip(db, dto))]
    pub async fn record_classroom_day(
        db: &PgPool,
        classroom_id: Uuid,
        date: NaiveDate,
        dto: RecordClassroomAttendanceDto,
    ) -> Result<Vec<StudentDayAttendance>, AppError> {
        Self::ensure_classroom_exists(db, classroom_id).await?;

        for entry in &dto.entries {
            entry
                .check_consistent()
                .map_err(|rule| AppError::unprocessable(anyhow::anyhow!("{}", rule)))?;
        }

        let roster = Self::fetch_roster(db, classroom_id).await?;
        let roster_ids: HashSet<StudentId> = roster.iter().map(|s| s.id).collect();
        for entry in &dto.entries {
            if !roster_ids.contains(&entry.student_id) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Student {} is not in this classroom",
                    entry.student_id
                )));
            }
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin attendance transaction")
            .map_err(AppError::database)?;

        for entry in &dto.entries {
            sqlx::query(
                r#"
                INSERT INTO attendance_records
                    (student_id, date, event, is_present, absence_type, absence_reason)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (student_id, date, event) DO UPDATE SET
                    is_present = EXCLUDED.is_present,
                    absence_type = EXCLUDED.absence_type,
                    absence_reason = EXCLUDED.absence_reason,
                    updated_at = now()
                "#,
            )
            .bind(entry.student_id)
            .bind(date)
            .bind(entry.event)
            .bind(entry.is_present)
            .bind(entry.absence_type)
            .bind(&entry.absence_reason)
            .execute(&mut *tx)
            .await
            .context("Failed to upsert attendance record")
            .map_err(AppError::database)?;
        }

        if let Some(content) = &dto.homeroom_content
            && !content.is_empty()
        {
            sqlx::query(
                r#"
                INSERT INTO homeroom_contents (classroom_id, date, content)
                VALUES ($1, $2, $3)
                ON CONFLICT (classroom_id, date) DO UPDATE SET
                    content = EXCLUDED.content,
                    updated_at = now()
                "#,
            )
            .bind(classroom_id)
            .bind(date)
            .bind(content)
            .execute(&mut *tx)
            .await
            .context("Failed to upsert homeroom content")
            .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit attendance transaction")
            .map_err(AppError::database)?;

        Self::classroom_day(db, classroom_id, date).await
    }

    async fn ensure_classroom_exists(db: &PgPool, classroom_id: Uuid) -> Result<(), AppError> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM classrooms WHERE id = $1")
            .bind(classroom_id)
            .fetch_optional(db)
            .await
            .context("Failed to check classroom")
            .map_err(AppError::database)?;

        if exists.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Classroom not found")));
        }
        Ok(())
    }

    async fn fetch_roster(db: &PgPool, classroom_id: Uuid) -> Result<Vec<StudentBrief>, AppError> {
        sqlx::query_as::<_, StudentBrief>(
            r#"
            SELECT id, first_name, last_name, class_no
            FROM students
            WHERE classroom_id = $1
            ORDER BY class_no
            "#,
        )
        .bind(classroom_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch classroom roster")
        .map_err(AppError::database)
    }
}
