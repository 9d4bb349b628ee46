use serde_json::Value;

use super::test_app::TestApp;

/// A fully seeded school: one admin, one teacher (owning the class and
/// subject), one parent, and one student in the grade/class.
pub struct SeededSchool {
    pub admin: SeededUser,
    pub teacher: SeededUser,
    pub parent: SeededUser,
    pub student: SeededUser,
    pub grade_id: String,
    pub class_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub student_id: String,
}

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Register a user via the public route and return their auth info.
    /// `role` is `None` for the parent default or `Some("admin")` for the
    /// bootstrap admin.
    pub async fn register_user(
        &self,
        email: &str,
        username: &str,
        display_name: &str,
        password: &str,
        role: Option<&str>,
    ) -> SeededUser {
        let mut body = serde_json::json!({
            "email": email,
            "username": username,
            "display_name": display_name,
            "password": password,
        });
        if let Some(role) = role {
            body["role"] = serde_json::json!(role);
        }

        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&body)
            .send()
            .await
            .expect("Register request failed");

        assert_eq!(
            resp.status().as_u16(),
            201,
            "Register failed: {}",
            resp.text().await.unwrap_or_default()
        );

        self.login_user(email, password).await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed");

        assert!(
            resp.status().is_success(),
            "Login failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp.json().await.expect("Failed to parse login response");

        SeededUser {
            id: json["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            access_token: json["access_token"].as_str().unwrap().to_string(),
            refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Seed the common school structure most tests need.
    pub async fn seed_school(&self) -> SeededSchool {
        let admin = self
            .register_user("admin@school.test", "head_admin", "Head Admin", "Admin123!", Some("admin"))
            .await;
        let parent = self
            .register_user("parent@school.test", "parent_one", "Parent One", "Parent123!", None)
            .await;

        // Grade, class, subject
        let resp = self
            .auth_post("/api/grade", &admin.access_token)
            .json(&serde_json::json!({ "level": 5, "name": "Grade 5" }))
            .send()
            .await
            .expect("Create grade failed");
        assert_eq!(resp.status().as_u16(), 201);
        let grade: Value = resp.json().await.unwrap();
        let grade_id = grade["id"].as_str().unwrap().to_string();

        let resp = self
            .auth_post("/api/class", &admin.access_token)
            .json(&serde_json::json!({
                "name": "5A",
                "grade_id": grade_id,
                "capacity": 30,
            }))
            .send()
            .await
            .expect("Create class failed");
        assert_eq!(resp.status().as_u16(), 201);
        let class: Value = resp.json().await.unwrap();
        let class_id = class["id"].as_str().unwrap().to_string();

        let resp = self
            .auth_post("/api/subject", &admin.access_token)
            .json(&serde_json::json!({
                "name": "Mathematics",
                "code": "MATH",
            }))
            .send()
            .await
            .expect("Create subject failed");
        assert_eq!(resp.status().as_u16(), 201);
        let subject: Value = resp.json().await.unwrap();
        let subject_id = subject["id"].as_str().unwrap().to_string();

        // Teacher account + profile, owning the class and subject
        let resp = self
            .auth_post("/api/teacher", &admin.access_token)
            .json(&serde_json::json!({
                "email": "teacher@school.test",
                "username": "math_teacher",
                "password": "Teacher123!",
                "name": "Maria",
                "surname": "Ivanova",
                "subject_ids": [subject_id],
                "class_ids": [class_id],
            }))
            .send()
            .await
            .expect("Create teacher failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Create teacher failed: {}",
            resp.text().await.unwrap_or_default()
        );
        let teacher_profile: Value = resp.json().await.unwrap();
        let teacher_id = teacher_profile["id"].as_str().unwrap().to_string();
        let teacher = self.login_user("teacher@school.test", "Teacher123!").await;

        // Student account + profile
        let resp = self
            .auth_post("/api/student", &admin.access_token)
            .json(&serde_json::json!({
                "email": "student@school.test",
                "username": "student_one",
                "password": "Student123!",
                "name": "Ana",
                "surname": "Petrova",
                "roll_no": 1,
                "grade_id": grade_id,
                "class_id": class_id,
                "parent_id": parent.id,
                "sex": "female",
            }))
            .send()
            .await
            .expect("Create student failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Create student failed: {}",
            resp.text().await.unwrap_or_default()
        );
        let student_profile: Value = resp.json().await.unwrap();
        let student_id = student_profile["id"].as_str().unwrap().to_string();
        let student = self.login_user("student@school.test", "Student123!").await;

        SeededSchool {
            admin,
            teacher,
            parent,
            student,
            grade_id,
            class_id,
            subject_id,
            teacher_id,
            student_id,
        }
    }

    /// Add another student to an existing seeded school.
    pub async fn seed_student(
        &self,
        school: &SeededSchool,
        email: &str,
        username: &str,
        roll_no: u32,
        class_id: &str,
    ) -> (SeededUser, String) {
        let resp = self
            .auth_post("/api/student", &school.admin.access_token)
            .json(&serde_json::json!({
                "email": email,
                "username": username,
                "password": "Student123!",
                "name": "Extra",
                "surname": format!("Student{roll_no}"),
                "roll_no": roll_no,
                "grade_id": school.grade_id,
                "class_id": class_id,
                "parent_id": school.parent.id,
                "sex": "male",
            }))
            .send()
            .await
            .expect("Create student failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Create student failed: {}",
            resp.text().await.unwrap_or_default()
        );
        let profile: Value = resp.json().await.unwrap();
        let student_id = profile["id"].as_str().unwrap().to_string();
        let user = self.login_user(email, "Student123!").await;
        (user, student_id)
    }
}
