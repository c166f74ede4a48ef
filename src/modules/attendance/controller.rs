use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    ClassroomDailySummary, ClassroomDayParams, DailyReportParams, MonthlyParams,
    MonthlyStudentAttendance, RecordClassroomAttendanceDto, StudentDayAttendance,
    WeeklyAttendanceSummary, WeeklyParams,
};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    params(DailyReportParams),
    responses(
        (status = 200, description = "Per-classroom attendance summaries for the date", body = Vec<ClassroomDailySummary>),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_daily_report(
    State(state): State<AppState>,
    Query(params): Query<DailyReportParams>,
) -> Result<Json<Vec<ClassroomDailySummary>>, AppError> {
    let report = AttendanceService::daily_report(&state.db, params.date).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/attendance/weekly",
    params(WeeklyParams),
    responses(
        (status = 200, description = "Approximate school-wide summary for five weekdays", body = WeeklyAttendanceSummary),
        (status = 400, description = "Not a Monday", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_weekly_summary(
    State(state): State<AppState>,
    Query(params): Query<WeeklyParams>,
) -> Result<Json<WeeklyAttendanceSummary>, AppError> {
    let summary = AttendanceService::weekly_summary(&state.db, params.monday).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/attendance/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID"),
        MonthlyParams
    ),
    responses(
        (status = 200, description = "The student's attendance for the month", body = MonthlyStudentAttendance),
        (status = 400, description = "Bad month format", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_student_month(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<MonthlyParams>,
) -> Result<Json<MonthlyStudentAttendance>, AppError> {
    let fill = params
        .fill
        .unwrap_or(state.attendance_config.monthly_fill);
    let attendance =
        AttendanceService::monthly_student(&state.db, id, &params.month, fill).await?;
    Ok(Json(attendance))
}

#[utoipa::path(
    get,
    path = "/api/attendance/classrooms/{id}",
    params(
        ("id" = Uuid, Path, description = "Classroom ID"),
        ClassroomDayParams
    ),
    responses(
        (status = 200, description = "Normalized per-student records for the date", body = Vec<StudentDayAttendance>),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_classroom_day(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ClassroomDayParams>,
) -> Result<Json<Vec<StudentDayAttendance>>, AppError> {
    let day = AttendanceService::classroom_day(&state.db, id, params.date).await?;
    Ok(Json(day))
}

#[utoipa::path(
    put,
    path = "/api/attendance/classrooms/{id}",
    params(
        ("id" = Uuid, Path, description = "Classroom ID"),
        ClassroomDayParams
    ),
    request_body = RecordClassroomAttendanceDto,
    responses(
        (status = 200, description = "Records stored; refreshed normalized view", body = Vec<StudentDayAttendance>),
        (status = 400, description = "Student not in classroom", body = ErrorResponse),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 422, description = "Inconsistent record flags", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn record_classroom_day(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ClassroomDayParams>,
    ValidatedJson(dto): ValidatedJson<RecordClassroomAttendanceDto>,
) -> Result<Json<Vec<StudentDayAttendance>>, AppError> {
    let day = AttendanceService::record_classroom_day(&state.db, id, params.date, dto).await?;
    Ok(Json(day))
}
