use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use homeroom_core::pagination::PaginationMeta;
use homeroom_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentListParams, UpdateStudentDto,
};

use crate::utils::errors::AppError;

fn map_student_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!(
                "A student with this roll number already exists in the classroom"
            ));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(anyhow::anyhow!("Classroom not found"));
        }
    }
    AppError::database(anyhow::Error::from(e))
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (classroom_id, first_name, last_name, class_no)
            VALUES ($1, $2, $3, $4)
            RETURNING id, classroom_id, first_name, last_name, class_no, created_at, updated_at
            "#,
        )
        .bind(dto.classroom_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.class_no)
        .fetch_one(db)
        .await
        .map_err(map_student_insert_error)?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        params: StudentListParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = params.limit();
        let offset = params.offset();

        let mut count_query = String::from("SELECT COUNT(*) FROM students");
        let mut data_query = String::from(
            "SELECT id, classroom_id, first_name, last_name, class_no, created_at, updated_at \
             FROM students",
        );
        if params.classroom_id.is_some() {
            count_query.push_str(" WHERE classroom_id = $1");
            data_query.push_str(" WHERE classroom_id = $1");
        }
        data_query.push_str(" ORDER BY last_name, first_name");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        let mut data_sql = sqlx::query_as::<_, Student>(&data_query);
        if let Some(classroom_id) = params.classroom_id {
            count_sql = count_sql.bind(classroom_id);
            data_sql = data_sql.bind(classroom_id);
        }

        let total = count_sql
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let students = data_sql
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::database)?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: Some(params.page()),
                has_more: offset + limit < total,
            },
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, classroom_id, first_name, last_name, class_no, created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student_by_id(db, id).await?;

        let classroom_id = dto.classroom_id.unwrap_or(existing.classroom_id.into_inner());
        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let class_no = dto.class_no.unwrap_or(existing.class_no);

        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET classroom_id = $1, first_name = $2, last_name = $3, class_no = $4,
                updated_at = now()
            WHERE id = $5
            RETURNING id, classroom_id, first_name, last_name, class_no, created_at, updated_at
            "#,
        )
        .bind(classroom_id)
        .bind(&first_name)
        .bind(&last_name)
        .bind(class_no)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(map_student_insert_error)?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }

    /// A classroom's full roster ordered by roll number.
    #[instrument(skip(db))]
    pub async fn get_classroom_roster(
        db: &PgPool,
        classroom_id: Uuid,
    ) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, classroom_id, first_name, last_name, class_no, created_at, updated_at
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
