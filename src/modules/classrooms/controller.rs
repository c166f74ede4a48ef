use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classrooms::model::{
    Classroom, CreateClassroomDto, PaginatedClassroomsResponse,
};
use crate::modules::classrooms::service::ClassroomService;
use crate::modules::students::model::Student;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::utils::pagination::PaginationParams;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classrooms",
    request_body = CreateClassroomDto,
    responses(
        (status = 200, description = "Classroom created successfully", body = Classroom),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn create_classroom(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassroomDto>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::create_classroom(&state.db, dto).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    get,
    path = "/api/classrooms",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of classrooms", body = PaginatedClassroomsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classrooms(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedClassroomsResponse>, AppError> {
    let response = ClassroomService::get_classrooms(&state.db, params).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/classrooms/{id}",
    params(
        ("id" = Uuid, Path, description = "Classroom ID")
    ),
    responses(
        (status = 200, description = "Classroom details", body = Classroom),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::get_classroom_by_id(&state.db, id).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    get,
    path = "/api/classrooms/{id}/students",
    params(
        ("id" = Uuid, Path, description = "Classroom ID")
    ),
    responses(
        (status = 200, description = "Classroom roster ordered by roll number", body = Vec<Student>),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classroom_students(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Student>>, AppError> {
    ClassroomService::get_classroom_by_id(&state.db, id).await?;
    let roster = StudentService::get_classroom_roster(&state.db, id).await?;
    Ok(Json(roster))
}
