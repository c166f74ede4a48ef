//! Data models for database seeding configuration.

use chrono::NaiveDate;

use homeroom_models::attendance::{AbsenceType, AttendanceEvent};
use homeroom_models::ids::{ClassroomId, StudentId};

/// Seed data for creating a classroom.
pub struct ClassroomSeed {
    pub number: i32,
}

/// Seed data for creating a student.
pub struct StudentSeed {
    pub classroom_id: ClassroomId,
    pub first_name: String,
    pub last_name: String,
    pub class_no: i32,
}

/// Seed data for one attendance record.
pub struct AttendanceSeed {
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub event: AttendanceEvent,
    pub is_present: Option<bool>,
    pub absence_type: Option<AbsenceType>,
    pub absence_reason: Option<String>,
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub num_classrooms: usize,
    pub students_per_classroom: usize,
    /// How many school days of attendance history to generate, counting
    /// backwards from today and skipping weekends.
    pub school_days: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_classrooms: 12,
            students_per_classroom: 30,
            school_days: 20,
        }
    }
}

impl SeedConfig {
    /// Creates a seed configuration with the specified classroom count.
    pub fn new(num_classrooms: usize) -> Self {
        Self {
            num_classrooms,
            ..Default::default()
        }
    }

    /// Sets the number of students per classroom.
    pub fn with_students(mut self, students_per_classroom: usize) -> Self {
        self.students_per_classroom = students_per_classroom;
        self
    }

    /// Sets the number of school days of attendance history.
    pub fn with_school_days(mut self, school_days: usize) -> Self {
        self.school_days = school_days;
        self
    }

    /// Total students across all classrooms.
    pub fn total_students(&self) -> usize {
        self.num_classrooms * self.students_per_classroom
    }
}
