use mongodb::Database;
use scolara_config::Settings;
use scolara_services::{
    AuthService,
    dao::{
        attendance::AttendanceDao, conversation::ConversationDao, event::EventDao, exam::ExamDao,
        exam_result::ExamResultDao, fee::FeeDao, grade::GradeDao, message::MessageDao,
        notification::NotificationDao, school_class::SchoolClassDao, student::StudentDao,
        subject::SubjectDao, teacher::TeacherDao, user::UserDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub students: Arc<StudentDao>,
    pub teachers: Arc<TeacherDao>,
    pub grades: Arc<GradeDao>,
    pub classes: Arc<SchoolClassDao>,
    pub subjects: Arc<SubjectDao>,
    pub attendance: Arc<AttendanceDao>,
    pub exams: Arc<ExamDao>,
    pub exam_results: Arc<ExamResultDao>,
    pub fees: Arc<FeeDao>,
    pub events: Arc<EventDao>,
    pub notifications: Arc<NotificationDao>,
    pub conversations: Arc<ConversationDao>,
    pub messages: Arc<MessageDao>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let students = Arc::new(StudentDao::new(&db));
        let teachers = Arc::new(TeacherDao::new(&db));
        let grades = Arc::new(GradeDao::new(&db));
        let classes = Arc::new(SchoolClassDao::new(&db));
        let subjects = Arc::new(SubjectDao::new(&db));
        let attendance = Arc::new(AttendanceDao::new(&db));
        let exams = Arc::new(ExamDao::new(&db));
        let exam_results = Arc::new(ExamResultDao::new(&db));
        let fees = Arc::new(FeeDao::new(&db));
        let events = Arc::new(EventDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let conversations = Arc::new(ConversationDao::new(&db));
        let messages = Arc::new(MessageDao::new(&db));

        Self {
            db,
            settings,
            auth,
            users,
            students,
            teachers,
            grades,
            classes,
            subjects,
            attendance,
            exams,
            exam_results,
            fees,
            events,
            notifications,
            conversations,
            messages,
        }
    }
}
