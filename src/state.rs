use sqlx::PgPool;

use crate::config::attendance::AttendanceConfig;
use crate::config::cors::CorsConfig;
use homeroom_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
    pub attendance_config: AttendanceConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        cors_config: CorsConfig::from_env(),
        attendance_config: AttendanceConfig::from_env(),
    }
}
