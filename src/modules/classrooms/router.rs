use crate::modules::classrooms::controller::{
    create_classroom, get_classroom, get_classroom_students, get_classrooms,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_classrooms_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_classroom).get(get_classrooms))
        .route("/{id}", get(get_classroom))
        .route("/{id}/students", get(get_classroom_students))
}
