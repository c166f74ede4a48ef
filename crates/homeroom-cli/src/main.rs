use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

use homeroom_cli::import::import_attendance_csv;
use homeroom_cli::seeder::{self, SeedConfig};

#[derive(Parser)]
#[command(name = "homeroom-cli")]
#[command(about = "Homeroom CLI - Administrative tools for the attendance backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Seed the database with fake classrooms, students, and attendance
    Seed {
        /// Number of classrooms to create
        #[arg(short = 'c', long, default_value = "12")]
        classrooms: usize,

        /// Number of students per classroom
        #[arg(short = 's', long, default_value = "30")]
        students: usize,

        /// Number of school days of attendance history
        #[arg(short = 'd', long, default_value = "20")]
        days: usize,
    },
    /// Seed only classrooms
    SeedClassrooms {
        /// Number of classrooms to create
        #[arg(short = 'c', long, default_value = "12")]
        classrooms: usize,
    },
    /// Seed students for existing classrooms
    SeedStudents {
        /// Number of students per classroom
        #[arg(short = 's', long, default_value = "30")]
        students: usize,
    },
    /// Seed attendance history for existing students
    SeedAttendance {
        /// Number of school days of attendance history
        #[arg(short = 'd', long, default_value = "20")]
        days: usize,
    },
    /// Import attendance rows from a CSV file
    Import {
        /// Path to the CSV file (columns: classroom, class_no, date,
        /// event, is_present, absence_type, absence_reason)
        #[arg(long)]
        csv: PathBuf,
    },
    /// Clear all seeded data (attendance, students, classrooms)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => match homeroom_db::run_migrations(&pool).await {
            Ok(()) => println!("✅ Schema ready"),
            Err(e) => {
                eprintln!("\n❌ Error applying migrations: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Seed {
            classrooms,
            students,
            days,
        } => {
            let config = SeedConfig::new(classrooms)
                .with_students(students)
                .with_school_days(days);
            if let Err(e) = seeder::seed_all(&pool, config).await {
                eprintln!("\n❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
        Commands::SeedClassrooms { classrooms } => {
            match seeder::classrooms::seed_classrooms(&pool, classrooms).await {
                Ok(ids) => println!("✅ Created {} classrooms", ids.len()),
                Err(e) => {
                    eprintln!("\n❌ Error seeding classrooms: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::SeedStudents { students } => handle_seed_students(&pool, students).await,
        Commands::SeedAttendance { days } => handle_seed_attendance(&pool, days).await,
        Commands::Import { csv } => match import_attendance_csv(&pool, &csv).await {
            Ok(report) => {
                println!(
                    "✅ Imported {} attendance rows from {}",
                    report.inserted,
                    csv.display()
                );
                if !report.skipped.is_empty() {
                    println!("⚠️  Skipped {} rows:", report.skipped.len());
                    for row in &report.skipped {
                        println!("   line {}: {}", row.line, row.reason);
                    }
                }
            }
            Err(e) => {
                eprintln!("\n❌ Error importing CSV: {}", e);
                std::process::exit(1);
            }
        },
        Commands::ClearSeed => {
            let confirmed = Confirm::new()
                .with_prompt("Delete ALL classrooms, students, and attendance records?")
                .default(false)
                .interact()
                .expect("Failed to read confirmation");
            if !confirmed {
                println!("Aborted.");
                return;
            }
            if let Err(e) = seeder::clear_all(&pool).await {
                eprintln!("\n❌ Error clearing seeded data: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn handle_seed_students(pool: &sqlx::postgres::PgPool, students_per_classroom: usize) {
    let classroom_uuids: Vec<uuid::Uuid> =
        sqlx::query_scalar("SELECT id FROM classrooms ORDER BY number")
            .fetch_all(pool)
            .await
            .expect("Failed to fetch classrooms");

    if classroom_uuids.is_empty() {
        eprintln!("❌ No classrooms found. Run `seed-classrooms` first.");
        std::process::exit(1);
    }

    let classroom_ids: Vec<homeroom_models::ids::ClassroomId> = classroom_uuids
        .into_iter()
        .map(homeroom_models::ids::ClassroomId::from)
        .collect();
    match seeder::students::seed_students(pool, &classroom_ids, students_per_classroom).await {
        Ok(ids) => println!("✅ Created {} students", ids.len()),
        Err(e) => {
            eprintln!("\n❌ Error seeding students: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_attendance(pool: &sqlx::postgres::PgPool, days: usize) {
    let student_uuids: Vec<uuid::Uuid> =
        sqlx::query_scalar("SELECT id FROM students ORDER BY classroom_id, class_no")
            .fetch_all(pool)
            .await
            .expect("Failed to fetch students");

    if student_uuids.is_empty() {
        eprintln!("❌ No students found. Run `seed-students` first.");
        std::process::exit(1);
    }

    let student_ids: Vec<homeroom_models::ids::StudentId> = student_uuids
        .into_iter()
        .map(homeroom_models::ids::StudentId::from)
        .collect();
    match seeder::attendance::seed_attendance(pool, &student_ids, days).await {
        Ok(inserted) => println!("✅ Created {} attendance records", inserted),
        Err(e) => {
            eprintln!("\n❌ Error seeding attendance: {}", e);
            std::process::exit(1);
        }
    }
}
