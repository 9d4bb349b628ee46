mod attendance;
mod conversation;
mod event;
mod exam;
mod exam_result;
mod fee;
mod grade;
mod message;
mod notification;
mod school_class;
mod student;
mod subject;
mod teacher;
mod user;

pub use attendance::{Attendance, AttendanceStatus};
pub use conversation::{Conversation, LastMessage};
pub use event::{Event, EventAudience};
pub use exam::{Exam, ExamStatus, ExamType};
pub use exam_result::ExamResult;
pub use fee::{FeePayment, FeeStatus};
pub use grade::Grade;
pub use message::Message;
pub use notification::{
    Notification, NotificationPriority, NotificationType, Recipient, TargetAudience,
};
pub use school_class::SchoolClass;
pub use student::{Sex, Student};
pub use subject::Subject;
pub use teacher::Teacher;
pub use user::{User, UserRole};
