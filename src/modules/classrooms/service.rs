use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use homeroom_core::pagination::{PaginationMeta, PaginationParams};
use homeroom_models::classrooms::{Classroom, CreateClassroomDto, PaginatedClassroomsResponse};

use crate::utils::errors::AppError;

pub struct ClassroomService;

impl ClassroomService {
    #[instrument(skip(db))]
    pub async fn create_classroom(
        db: &PgPool,
        dto: CreateClassroomDto,
    ) -> Result<Classroom, AppError> {
        let classroom = sqlx::query_as::<_, Classroom>(
            r#"
            INSERT INTO classrooms (number)
            VALUES ($1)
            RETURNING id, number, created_at
            "#,
        )
        .bind(dto.number)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "Classroom {} already exists",
                    dto.number
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(classroom)
    }

    #[instrument(skip(db))]
    pub async fn get_classrooms(
        db: &PgPool,
        params: PaginationParams,
    ) -> Result<PaginatedClassroomsResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classrooms")
            .fetch_one(db)
            .await
            .context("Failed to count classrooms")
            .map_err(AppError::database)?;

        let classrooms = sqlx::query_as::<_, Classroom>(
            r#"
            SELECT id, number, created_at
            FROM classrooms
            ORDER BY number
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch classrooms")
        .map_err(AppError::database)?;

        Ok(PaginatedClassroomsResponse {
            meta: PaginationMeta::new(&params, total),
            data: classrooms,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_classroom_by_id(db: &PgPool, id: Uuid) -> Result<Classroom, AppError> {
        sqlx::query_as::<_, Classroom>(
            "SELECT id, number, created_at FROM classrooms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch classroom")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Classroom not found")))
    }
}
