//! Report assembly: fetch via DAOs, reduce via the aggregation engine,
//! shape into response envelopes. Every envelope carries a `title` and a
//! `generated_at` timestamp taken at assembly time; none of the reports
//! mutates any entity.

mod attendance;
mod enrollment;
mod fees;
mod overview;
mod performance;
mod student;

pub use attendance::{AttendanceReport, attendance_report};
pub use enrollment::{EnrollmentReport, enrollment_report};
pub use fees::{FeeReport, fee_report};
pub use overview::{OverviewReport, overview_report};
pub use performance::{PerformanceReport, performance_report};
pub use student::{StudentPerformanceReport, student_performance_report};

/// Assembly timestamp, RFC 3339 UTC.
pub(crate) fn generated_at() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
