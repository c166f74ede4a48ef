//! Classroom domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use homeroom_core::pagination::PaginationMeta;

use crate::ids::ClassroomId;

/// A classroom (one homeroom group of students).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Classroom {
    pub id: ClassroomId,
    /// Three-digit display number: grade followed by the room index
    /// within the grade, e.g. 101, 102, ..., 605.
    pub number: i32,
    pub created_at: DateTime<Utc>,
}

/// Compact classroom identity embedded in summaries.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassroomBrief {
    pub id: ClassroomId,
    pub number: i32,
}

/// DTO for creating a classroom.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateClassroomDto {
    /// Display number, grade-prefixed (101-999).
    #[validate(range(min = 101, max = 999))]
    pub number: i32,
}

/// Paginated response containing classrooms.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassroomsResponse {
    pub data: Vec<Classroom>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dto_validates_number_range() {
        assert!(CreateClassroomDto { number: 101 }.validate().is_ok());
        assert!(CreateClassroomDto { number: 999 }.validate().is_ok());
        assert!(CreateClassroomDto { number: 100 }.validate().is_err());
        assert!(CreateClassroomDto { number: 1000 }.validate().is_err());
    }
}
