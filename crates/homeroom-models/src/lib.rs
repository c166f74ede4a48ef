//! # Homeroom Models
//!
//! Domain models and DTOs for the Homeroom API.
//!
//! This crate holds the data structures shared between the server and
//! the CLI: typed entity IDs, the attendance domain (events, records,
//! derived summaries), and roster entities.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed UUID newtypes per entity
//! - [`attendance`]: attendance events, records, summaries, and DTOs
//! - [`classrooms`]: classroom entities and DTOs
//! - [`students`]: student entities and DTOs

pub mod attendance;
pub mod classrooms;
pub mod ids;
pub mod students;

// Re-export commonly used types at crate root for convenience
pub use ids::{AttendanceRecordId, ClassroomId, StudentId};

pub use attendance::{
    AbsenceType, AttendanceCounts, AttendanceEvent, AttendanceRecord, AttendanceRuleError,
    ClassroomDailySummary, DayRecordPair, DaySummary, MonthlyFill, MonthlyStudentAttendance,
    RecordClassroomAttendanceDto, RecordEntryDto, StudentDayAttendance, WeeklyAttendanceSummary,
};

pub use classrooms::{Classroom, ClassroomBrief, CreateClassroomDto, PaginatedClassroomsResponse};

pub use students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentBrief, StudentListParams,
    UpdateStudentDto,
};
