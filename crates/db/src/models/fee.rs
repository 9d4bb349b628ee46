use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePayment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub amount: f64,
    pub status: FeeStatus,
    pub due_date: DateTime,
    pub paid_at: Option<DateTime>,
    pub academic_year: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Paid,
    Pending,
    Overdue,
}

impl FeePayment {
    pub const COLLECTION: &'static str = "fee_payments";
}
