use crate::modules::attendance::controller::{
    get_classroom_day, get_daily_report, get_student_month, get_weekly_summary,
    record_classroom_day,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/daily", get(get_daily_report))
        .route("/weekly", get(get_weekly_summary))
        .route("/students/{id}", get(get_student_month))
        .route(
            "/classrooms/{id}",
            get(get_classroom_day).put(record_classroom_day),
        )
}
