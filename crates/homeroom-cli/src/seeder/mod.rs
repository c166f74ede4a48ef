//! Database seeding for development and testing.
//!
//! Generates fake classrooms, student rosters, and attendance history.
//! Each piece can be seeded independently, or all together via
//! [`seed_all`].

pub mod attendance;
pub mod classrooms;
pub mod models;
pub mod students;

use sqlx::PgPool;

pub use models::SeedConfig;

/// Seeds classrooms, students, and attendance history in order.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let classroom_ids = classrooms::seed_classrooms(db, config.num_classrooms).await?;
    let student_ids =
        students::seed_students(db, &classroom_ids, config.students_per_classroom).await?;
    attendance::seed_attendance(db, &student_ids, config.school_days).await?;

    println!(
        "\n✅ Seeded {} classrooms, {} students, {} school days of attendance",
        classroom_ids.len(),
        student_ids.len(),
        config.school_days
    );
    Ok(())
}

/// Clears all seeded data: attendance, students, classrooms.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    attendance::clear_attendance(db).await?;
    students::clear_students(db).await?;
    classrooms::clear_classrooms(db).await?;
    println!("\n✅ Cleared all seeded data");
    Ok(())
}
