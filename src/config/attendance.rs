use std::env;

use homeroom_models::attendance::MonthlyFill;

/// Attendance policy configuration.
#[derive(Clone, Debug)]
pub struct AttendanceConfig {
    /// Server default for how monthly views treat dates without rows.
    /// Requests may override it with the `fill` query parameter.
    pub monthly_fill: MonthlyFill,
}

impl AttendanceConfig {
    pub fn from_env() -> Self {
        let monthly_fill = env::var("MONTHLY_FILL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(MonthlyFill::RecordedOnly);

        Self { monthly_fill }
    }
}
