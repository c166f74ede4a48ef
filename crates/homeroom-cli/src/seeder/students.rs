//! Student seeding functionality.
//!
//! Generates fake student rosters for classrooms and inserts them in
//! batches.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use homeroom_models::ids::{ClassroomId, StudentId};

use super::models::StudentSeed;

/// Generates a roster of fake students for each classroom.
pub fn generate_students(
    classroom_ids: &[ClassroomId],
    students_per_classroom: usize,
) -> Vec<StudentSeed> {
    classroom_ids
        .par_iter()
        .flat_map(|&classroom_id| {
            (0..students_per_classroom)
                .map(|idx| {
                    let first_name: String = FirstName().fake();
                    let last_name: String = LastName().fake();
                    StudentSeed {
                        classroom_id,
                        first_name,
                        last_name,
                        class_no: (idx + 1) as i32,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Seeds students into the database.
pub async fn seed_students(
    db: &PgPool,
    classroom_ids: &[ClassroomId],
    students_per_classroom: usize,
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🧑‍🎓 Seeding {} students across {} classrooms...",
        classroom_ids.len() * students_per_classroom,
        classroom_ids.len()
    );

    let students = generate_students(classroom_ids, students_per_classroom);
    let ids = insert_students_batch(db, &students).await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts students in batches using multi-value INSERT statements.
pub async fn insert_students_batch(
    db: &PgPool,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(students.len());

    for chunk in students.chunks(BATCH_SIZE) {
        let ids = insert_students_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO students (classroom_id, first_name, last_name, class_no) VALUES ");
    for i in 0..students.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for student in students {
        q = q
            .bind(student.classroom_id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(student.class_no);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids.into_iter().map(StudentId::from).collect())
}

/// Clears all students (cascades to attendance records).
pub async fn clear_students(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing students...");

    let result = sqlx::query("DELETE FROM students")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} students in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_numbers_restart_per_classroom() {
        let classrooms = vec![ClassroomId::new(), ClassroomId::new()];
        let students = generate_students(&classrooms, 3);
        assert_eq!(students.len(), 6);

        for classroom in &classrooms {
            let rolls: Vec<i32> = students
                .iter()
                .filter(|s| s.classroom_id == *classroom)
                .map(|s| s.class_no)
                .collect();
            assert_eq!(rolls, vec![1, 2, 3]);
        }
    }

    #[test]
    fn generated_names_are_non_empty() {
        let students = generate_students(&[ClassroomId::new()], 5);
        assert!(students.iter().all(|s| !s.first_name.is_empty()));
        assert!(students.iter().all(|s| !s.last_name.is_empty()));
    }
}
