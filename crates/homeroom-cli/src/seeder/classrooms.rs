//! Classroom seeding functionality.

use std::time::Instant;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use homeroom_models::ids::ClassroomId;

use super::models::ClassroomSeed;

/// Generates classroom display numbers: grades 1-6, rooms numbered
/// within each grade (101, 102, ..., 201, ...).
pub fn generate_classrooms(count: usize) -> Vec<ClassroomSeed> {
    let rooms_per_grade = count.div_ceil(6).max(1);
    (0..count)
        .map(|i| {
            let grade = (i / rooms_per_grade) % 6 + 1;
            let room = i % rooms_per_grade + 1;
            ClassroomSeed {
                number: (grade * 100 + room) as i32,
            }
        })
        .collect()
}

/// Seeds classrooms into the database.
pub async fn seed_classrooms(
    db: &PgPool,
    count: usize,
) -> Result<Vec<ClassroomId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} classrooms...", count);

    let classrooms = generate_classrooms(count);
    let ids = insert_classrooms_batch(db, &classrooms).await?;

    println!(
        "   ✓ Inserted {} classrooms in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts classrooms in batches using multi-value INSERT statements.
pub async fn insert_classrooms_batch(
    db: &PgPool,
    classrooms: &[ClassroomSeed],
) -> Result<Vec<ClassroomId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(classrooms.len());

    for chunk in classrooms.chunks(BATCH_SIZE) {
        let ids = insert_classrooms_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_classrooms_chunk(
    tx: &mut Transaction<'_, Postgres>,
    classrooms: &[ClassroomSeed],
) -> Result<Vec<ClassroomId>, Box<dyn std::error::Error>> {
    if classrooms.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO classrooms (number) VALUES ");
    for i in 0..classrooms.len() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str(&format!("(${})", i + 1));
    }
    query.push_str(" ON CONFLICT (number) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for classroom in classrooms {
        q = q.bind(classroom.number);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids.into_iter().map(ClassroomId::from).collect())
}

/// Clears all classrooms (cascades to students and attendance).
pub async fn clear_classrooms(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing classrooms...");

    let result = sqlx::query("DELETE FROM classrooms")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} classrooms in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_grade_prefixed_and_unique() {
        let classrooms = generate_classrooms(12);
        let numbers: Vec<i32> = classrooms.iter().map(|c| c.number).collect();
        assert_eq!(numbers.len(), 12);
        assert!(numbers.iter().all(|n| (101..=699).contains(n)));

        let mut deduped = numbers.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), numbers.len());
    }

    #[test]
    fn counts_spread_across_grades() {
        let classrooms = generate_classrooms(2);
        assert_eq!(classrooms[0].number, 101);
        assert_eq!(classrooms[1].number, 201);

        let classrooms = generate_classrooms(12);
        assert_eq!(classrooms[0].number, 101);
        assert_eq!(classrooms[1].number, 102);
        assert_eq!(classrooms[2].number, 201);
    }
}
