use utoipa::OpenApi;

use crate::modules::attendance::model::{
    AbsenceType, AttendanceCounts, AttendanceEvent, AttendanceRecord, ClassroomDailySummary,
    DayRecordPair, DaySummary, MonthlyFill, MonthlyStudentAttendance,
    RecordClassroomAttendanceDto, RecordEntryDto, StudentDayAttendance, WeeklyAttendanceSummary,
};
use crate::modules::classrooms::model::{
    Classroom, ClassroomBrief, CreateClassroomDto, PaginatedClassroomsResponse,
};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentBrief, UpdateStudentDto,
};
use crate::utils::errors::ErrorResponse;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::attendance::controller::get_daily_report,
        crate::modules::attendance::controller::get_weekly_summary,
        crate::modules::attendance::controller::get_student_month,
        crate::modules::attendance::controller::get_classroom_day,
        crate::modules::attendance::controller::record_classroom_day,
        crate::modules::classrooms::controller::create_classroom,
        crate::modules::classrooms::controller::get_classrooms,
        crate::modules::classrooms::controller::get_classroom,
        crate::modules::classrooms::controller::get_classroom_students,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
    ),
    components(
        schemas(
            AttendanceEvent,
            AbsenceType,
            AttendanceRecord,
            AttendanceCounts,
            ClassroomDailySummary,
            StudentDayAttendance,
            DayRecordPair,
            MonthlyStudentAttendance,
            MonthlyFill,
            DaySummary,
            WeeklyAttendanceSummary,
            RecordEntryDto,
            RecordClassroomAttendanceDto,
            Classroom,
            ClassroomBrief,
            CreateClassroomDto,
            PaginatedClassroomsResponse,
            Student,
            StudentBrief,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            PaginationMeta,
            PaginationParams,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance recording and derived summaries"),
        (name = "Classrooms", description = "Classroom management endpoints"),
        (name = "Students", description = "Student management endpoints")
    ),
    info(
        title = "Homeroom API",
        version = "0.1.0",
        description = "Attendance backend for a school portal: daily classroom summaries, weekly school-wide charts, and monthly per-student views over PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
