pub mod attendance;
pub mod base;
pub mod conversation;
pub mod event;
pub mod exam;
pub mod exam_result;
pub mod fee;
pub mod grade;
pub mod message;
pub mod notification;
pub mod school_class;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod user;

pub use base::BaseDao;
