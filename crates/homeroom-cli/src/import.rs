//! Attendance CSV import.
//!
//! Ingests attendance exports with the columns `classroom`, `class_no`,
//! `date`, `event`, `is_present`, `absence_type`, `absence_reason`.
//! Every row passes through a [`FormState`] whose validators mirror the
//! API's request validation; rows that fail validation, violate the
//! attendance flag rules, or reference an unknown student are reported
//! and skipped, and the remaining rows are upserted.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use homeroom_core::form::{FieldSpec, FormState};
use homeroom_models::attendance::{AbsenceType, AttendanceEvent, check_attendance_flags};
use homeroom_models::ids::StudentId;

/// Outcome of one import run.
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: Vec<SkippedRow>,
}

/// A row that was not imported, with its 1-based line number.
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// The validation form every CSV row is checked against.
pub fn attendance_row_form() -> FormState {
    FormState::new([
        (
            "classroom",
            FieldSpec::required()
                .with_validator(|v| v.parse::<i32>().is_ok_and(|n| (101..=999).contains(&n))),
        ),
        (
            "class_no",
            FieldSpec::required()
                .with_validator(|v| v.parse::<i32>().is_ok_and(|n| (1..=60).contains(&n))),
        ),
        (
            "date",
            FieldSpec::required()
                .with_validator(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok()),
        ),
        (
            "event",
            FieldSpec::required().with_validator(|v| v.parse::<AttendanceEvent>().is_ok()),
        ),
        (
            "is_present",
            FieldSpec::optional().with_validator(|v| matches!(v, "true" | "false")),
        ),
        (
            "absence_type",
            FieldSpec::optional().with_validator(|v| v.parse::<AbsenceType>().is_ok()),
        ),
        ("absence_reason", FieldSpec::optional()),
    ])
}

struct ParsedRow {
    classroom: i32,
    class_no: i32,
    date: NaiveDate,
    event: AttendanceEvent,
    is_present: Option<bool>,
    absence_type: Option<AbsenceType>,
    absence_reason: Option<String>,
}

/// Reads the validated form back into typed values. Returns `None` if
/// any field fails to parse, which the form should have caught already.
fn parse_row(form: &FormState) -> Option<ParsedRow> {
    let classroom = form.text("classroom")?.parse().ok()?;
    let class_no = form.text("class_no")?.parse().ok()?;
    let date = NaiveDate::parse_from_str(form.text("date")?, "%Y-%m-%d").ok()?;
    let event = form.text("event")?.parse().ok()?;

    let is_present = match form.text("is_present")? {
        "" => None,
        value => Some(value == "true"),
    };
    let absence_type = match form.text("absence_type")? {
        "" => None,
        value => Some(value.parse().ok()?),
    };
    let absence_reason = match form.text("absence_reason")? {
        "" => None,
        value => Some(value.to_string()),
    };

    Some(ParsedRow {
        classroom,
        class_no,
        date,
        event,
        is_present,
        absence_type,
        absence_reason,
    })
}

/// Imports attendance rows from a CSV file.
pub async fn import_attendance_csv(db: &PgPool, path: &Path) -> anyhow::Result<ImportReport> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers().context("failed to read CSV headers")?.clone();

    let mut inserted = 0;
    let mut skipped = Vec::new();
    let mut student_cache: HashMap<(i32, i32), Option<StudentId>> = HashMap::new();

    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header row.
        let line = idx + 2;
        let record = result.with_context(|| format!("failed to read CSV line {}", line))?;

        let mut form = attendance_row_form();
        for (i, name) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                form.set(name, value.trim());
            }
        }

        if !form.form_ok() {
            skipped.push(SkippedRow {
                line,
                reason: format!("invalid fields: {}", form.invalid_keys().join(", ")),
            });
            continue;
        }

        let Some(row) = parse_row(&form) else {
            skipped.push(SkippedRow {
                line,
                reason: "unparseable row".to_string(),
            });
            continue;
        };

        if let Err(rule) =
            check_attendance_flags(row.is_present, row.absence_type, row.absence_reason.as_deref())
        {
            skipped.push(SkippedRow {
                line,
                reason: rule.to_string(),
            });
            continue;
        }

        let key = (row.classroom, row.class_no);
        let student_id = match student_cache.get(&key) {
            Some(cached) => *cached,
            None => {
                let found = lookup_student(db, row.classroom, row.class_no).await?;
                student_cache.insert(key, found);
                found
            }
        };

        let Some(student_id) = student_id else {
            skipped.push(SkippedRow {
                line,
                reason: format!(
                    "no student with roll number {} in classroom {}",
                    row.class_no, row.classroom
                ),
            });
            continue;
        };

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
        .bind(student_id)
        .bind(row.date)
        .bind(row.event)
        .bind(row.is_present)
        .bind(row.absence_type)
        .bind(&row.absence_reason)
        .execute(db)
        .await
        .with_context(|| format!("failed to upsert attendance row at line {}", line))?;

        inserted += 1;
    }

    Ok(ImportReport { inserted, skipped })
}

async fn lookup_student(
    db: &PgPool,
    classroom: i32,
    class_no: i32,
) -> anyhow::Result<Option<StudentId>> {
    let id: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT s.id
        FROM students s
        JOIN classrooms c ON c.id = s.classroom_id
        WHERE c.number = $1 AND s.class_no = $2
        "#,
    )
    .bind(classroom)
    .bind(class_no)
    .fetch_optional(db)
    .await
    .context("failed to look up student")?;

    Ok(id.map(StudentId::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(values: &[(&str, &str)]) -> FormState {
        let mut form = attendance_row_form();
        for (key, value) in values {
            form.set(key, *value);
        }
        form
    }

    #[test]
    fn complete_valid_row_passes() {
        let form = form_with(&[
            ("classroom", "101"),
            ("class_no", "12"),
            ("date", "2024-05-13"),
            ("event", "assembly"),
            ("is_present", "true"),
        ]);
        assert!(form.form_ok());
        let row = parse_row(&form).unwrap();
        assert_eq!(row.classroom, 101);
        assert_eq!(row.event, AttendanceEvent::Assembly);
        assert_eq!(row.is_present, Some(true));
        assert_eq!(row.absence_type, None);
    }

    #[test]
    fn missing_required_columns_fail() {
        let form = form_with(&[("classroom", "101"), ("class_no", "12")]);
        assert!(!form.form_ok());
        assert_eq!(form.invalid_keys(), vec!["date", "event"]);
    }

    #[test]
    fn bad_values_fail_validation() {
        let form = form_with(&[
            ("classroom", "1"),
            ("class_no", "12"),
            ("date", "13/05/2024"),
            ("event", "lunch"),
            ("is_present", "yes"),
        ]);
        assert!(!form.form_ok());
        let invalid = form.invalid_keys();
        assert!(invalid.contains(&"classroom"));
        assert!(invalid.contains(&"date"));
        assert!(invalid.contains(&"event"));
        assert!(invalid.contains(&"is_present"));
    }

    #[test]
    fn optional_columns_may_be_empty() {
        let form = form_with(&[
            ("classroom", "204"),
            ("class_no", "3"),
            ("date", "2024-05-13"),
            ("event", "homeroom"),
        ]);
        assert!(form.form_ok());
        let row = parse_row(&form).unwrap();
        assert_eq!(row.is_present, None);
        assert_eq!(row.absence_type, None);
        assert_eq!(row.absence_reason, None);
    }

    #[test]
    fn absence_row_parses() {
        let form = form_with(&[
            ("classroom", "204"),
            ("class_no", "3"),
            ("date", "2024-05-13"),
            ("event", "assembly"),
            ("is_present", "false"),
            ("absence_type", "sick"),
            ("absence_reason", "COVID-19"),
        ]);
        assert!(form.form_ok());
        let row = parse_row(&form).unwrap();
        assert_eq!(row.absence_type, Some(AbsenceType::Sick));
        assert_eq!(row.absence_reason.as_deref(), Some("COVID-19"));
        assert!(
            check_attendance_flags(row.is_present, row.absence_type, row.absence_reason.as_deref())
                .is_ok()
        );
    }
}
