use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_unique(bson::doc! { "username": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    // Students
    create_indexes(
        db,
        "students",
        vec![
            index_unique(bson::doc! { "user_id": 1 }),
            index_unique(bson::doc! { "class_id": 1, "roll_no": 1 }),
            index(bson::doc! { "grade_id": 1 }),
            index(bson::doc! { "parent_id": 1 }),
        ],
    )
    .await?;

    // Teachers
    create_indexes(
        db,
        "teachers",
        vec![
            index_unique(bson::doc! { "user_id": 1 }),
            index(bson::doc! { "class_ids": 1 }),
            index(bson::doc! { "subject_ids": 1 }),
        ],
    )
    .await?;

    // Grades
    create_indexes(db, "grades", vec![index_unique(bson::doc! { "level": 1 })]).await?;

    // Classes
    create_indexes(
        db,
        "classes",
        vec![index_unique(bson::doc! { "grade_id": 1, "name": 1 })],
    )
    .await?;

    // Subjects
    create_indexes(db, "subjects", vec![index_unique(bson::doc! { "code": 1 })]).await?;

    // Attendance: the unique key is what makes the daily save an upsert
    // instead of a check-then-write race.
    create_indexes(
        db,
        "attendance",
        vec![
            index_unique(bson::doc! { "student_id": 1, "date": 1 }),
            index(bson::doc! { "class_id": 1, "date": 1 }),
            index(bson::doc! { "date": 1 }),
        ],
    )
    .await?;

    // Exams
    create_indexes(
        db,
        "exams",
        vec![
            index(bson::doc! { "grade_id": 1, "exam_date": -1 }),
            index(bson::doc! { "subject_id": 1, "exam_date": -1 }),
            index(bson::doc! { "status": 1, "exam_date": 1 }),
        ],
    )
    .await?;

    // Exam results: same uniqueness rationale as attendance.
    create_indexes(
        db,
        "exam_results",
        vec![
            index_unique(bson::doc! { "exam_id": 1, "student_id": 1 }),
            index(bson::doc! { "student_id": 1 }),
        ],
    )
    .await?;

    // Fee payments
    create_indexes(
        db,
        "fee_payments",
        vec![
            index(bson::doc! { "student_id": 1, "academic_year": 1 }),
            index(bson::doc! { "status": 1, "due_date": 1 }),
        ],
    )
    .await?;

    // Events
    create_indexes(db, "events", vec![index(bson::doc! { "start_time": 1 })]).await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![
            index(bson::doc! { "recipients.user_id": 1, "created_at": -1 }),
            index(bson::doc! { "created_by": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Conversations
    create_indexes(
        db,
        "conversations",
        vec![
            index_unique(bson::doc! { "participant_key": 1 }),
            index(bson::doc! { "participant_ids": 1 }),
            index(bson::doc! { "updated_at": -1 }),
        ],
    )
    .await?;

    // Messages
    create_indexes(
        db,
        "messages",
        vec![
            index(bson::doc! { "conversation_id": 1, "created_at": 1 }),
            index(bson::doc! { "receiver_id": 1, "is_read": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
