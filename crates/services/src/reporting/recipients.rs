//! Expands a notification's symbolic target audience into a concrete
//! recipient list.
//!
//! Resolution happens once, at notification creation; the resulting list is
//! persisted on the document as a snapshot. The creator is excluded in every
//! branch, and (user_id, role) pairs are deduplicated even when the
//! underlying criteria overlap.

use bson::oid::ObjectId;
use scolara_db::models::{Recipient, Student, TargetAudience, Teacher, User, UserRole};
use std::collections::HashSet;

use crate::dao::base::{DaoError, DaoResult};
use crate::dao::{student::StudentDao, teacher::TeacherDao, user::UserDao};

#[derive(Debug, Clone, Copy)]
pub struct AudienceSpec {
    pub audience: TargetAudience,
    pub grade_id: Option<ObjectId>,
    pub class_id: Option<ObjectId>,
}

impl AudienceSpec {
    pub fn validate(&self) -> DaoResult<()> {
        match self.audience {
            TargetAudience::SpecificGrade if self.grade_id.is_none() => Err(
                DaoError::Validation("target_grade_id is required for specific_grade".to_string()),
            ),
            TargetAudience::SpecificClass if self.class_id.is_none() => Err(
                DaoError::Validation("target_class_id is required for specific_class".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Fetch the relevant user populations and expand the audience. The three
/// fetches behind `all` are independent, so they run concurrently.
pub async fn resolve(
    spec: &AudienceSpec,
    creator_id: ObjectId,
    students: &StudentDao,
    teachers: &TeacherDao,
    users: &UserDao,
) -> DaoResult<Vec<Recipient>> {
    spec.validate()?;

    let (student_list, teacher_list, parent_list) = match spec.audience {
        TargetAudience::All => {
            let (s, t, p) = tokio::try_join!(
                students.find_all(),
                teachers.find_all(),
                users.find_by_role(UserRole::Parent),
            )?;
            (s, t, p)
        }
        TargetAudience::Students | TargetAudience::SpecificGrade => {
            let list = match spec.grade_id {
                Some(gid) => students.find_by_grade(gid).await?,
                None => students.find_all().await?,
            };
            (list, Vec::new(), Vec::new())
        }
        TargetAudience::SpecificClass => {
            // validate() guarantees the class id is present.
            let cid = spec.class_id.ok_or(DaoError::NotFound)?;
            (students.find_by_class(cid).await?, Vec::new(), Vec::new())
        }
        TargetAudience::Teachers => (Vec::new(), teachers.find_all().await?, Vec::new()),
        TargetAudience::Parents => {
            (Vec::new(), Vec::new(), users.find_by_role(UserRole::Parent).await?)
        }
    };

    Ok(expand(spec, creator_id, &student_list, &teacher_list, &parent_list))
}

/// Pure expansion over already-fetched populations.
pub fn expand(
    spec: &AudienceSpec,
    creator_id: ObjectId,
    students: &[Student],
    teachers: &[Teacher],
    parents: &[User],
) -> Vec<Recipient> {
    let mut seen: HashSet<(ObjectId, UserRole)> = HashSet::new();
    let mut recipients = Vec::new();

    let mut push = |user_id: ObjectId, role: UserRole, out: &mut Vec<Recipient>| {
        if user_id == creator_id {
            return;
        }
        if seen.insert((user_id, role)) {
            out.push(Recipient {
                user_id,
                user_role: role,
                is_read: false,
                read_at: None,
            });
        }
    };

    let include_student = |s: &Student| match spec.audience {
        TargetAudience::All => true,
        TargetAudience::Students => spec
            .grade_id
            .map(|gid| s.grade_id == gid)
            .unwrap_or(true),
        TargetAudience::SpecificGrade => Some(s.grade_id) == spec.grade_id,
        TargetAudience::SpecificClass => Some(s.class_id) == spec.class_id,
        _ => false,
    };

    for student in students.iter().filter(|s| include_student(s)) {
        push(student.user_id, UserRole::Student, &mut recipients);
    }
    for teacher in teachers {
        push(teacher.user_id, UserRole::Teacher, &mut recipients);
    }
    for parent in parents {
        if let Some(id) = parent.id {
            push(id, UserRole::Parent, &mut recipients);
        }
    }

    recipients
}
