//! Student domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use homeroom_core::pagination::PaginationMeta;

use crate::ids::{ClassroomId, StudentId};

/// A student enrolled in a classroom.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub classroom_id: ClassroomId,
    pub first_name: String,
    pub last_name: String,
    /// Roll number within the classroom (1-based).
    pub class_no: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact student identity embedded in attendance views.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentBrief {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub class_no: i32,
}

/// DTO for creating a student.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStudentDto {
    pub classroom_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(range(min = 1, max = 60))]
    pub class_no: i32,
}

/// DTO for updating a student. Only provided fields are changed.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStudentDto {
    pub classroom_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub class_no: Option<i32>,
}

/// Query parameters for listing students.
#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentListParams {
    /// Restrict to one classroom.
    pub classroom_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl StudentListParams {
    /// Page number, defaulting to 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, defaulting to 25 and clamped to [1, 200].
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(25).clamp(1, 200)
    }

    /// Offset derived from page and limit.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Paginated response containing students.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults_and_clamping() {
        let params = StudentListParams {
            classroom_id: None,
            page: None,
            limit: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 0);

        let params = StudentListParams {
            classroom_id: None,
            page: Some(-2),
            limit: Some(1000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 200);
    }

    #[test]
    fn list_params_offset() {
        let params = StudentListParams {
            classroom_id: None,
            page: Some(4),
            limit: Some(25),
        };
        assert_eq!(params.offset(), 75);
    }

    #[test]
    fn create_dto_validation() {
        let dto = CreateStudentDto {
            classroom_id: Uuid::nil(),
            first_name: "Nicha".to_string(),
            last_name: "Suwan".to_string(),
            class_no: 12,
        };
        assert!(dto.validate().is_ok());

        let dto = CreateStudentDto {
            classroom_id: Uuid::nil(),
            first_name: String::new(),
            last_name: "Suwan".to_string(),
            class_no: 0,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn update_dto_accepts_empty() {
        let dto = UpdateStudentDto {
            classroom_id: None,
            first_name: None,
            last_name: None,
            class_no: None,
        };
        assert!(dto.validate().is_ok());
    }
}
