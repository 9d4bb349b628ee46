use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn broadcast_reaches_everyone_except_the_creator() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/notification", &school.admin.access_token)
        .json(&serde_json::json!({
            "title": "School closed Friday",
            "body": "Maintenance work in the main building.",
            "notification_type": "announcement",
            "target_audience": "all",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    // One student, one teacher, one parent; the admin creator is excluded.
    assert_eq!(created["recipient_count"], 3);

    for token in [
        &school.student.access_token,
        &school.teacher.access_token,
        &school.parent.access_token,
    ] {
        let resp = app.auth_get("/api/notification", token).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let page: Value = resp.json().await.unwrap();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["is_read"], false);
    }

    // The creator's own feed stays empty.
    let resp = app
        .auth_get("/api/notification", &school.admin.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn class_targeting_only_reaches_that_class() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    // Second class with its own student.
    let resp = app
        .auth_post("/api/class", &school.admin.access_token)
        .json(&serde_json::json!({
            "name": "5B",
            "grade_id": school.grade_id,
            "capacity": 30,
        }))
        .send()
        .await
        .unwrap();
    let other_class: Value = resp.json().await.unwrap();
    let other_class_id = other_class["id"].as_str().unwrap().to_string();
    let (other_student, _) = app
        .seed_student(&school, "b2@school.test", "b2_student", 1, &other_class_id)
        .await;

    let resp = app
        .auth_post("/api/notification", &school.teacher.access_token)
        .json(&serde_json::json!({
            "title": "Bring your textbooks",
            "body": "Chapter 4 tomorrow.",
            "notification_type": "general",
            "target_audience": "specific_class",
            "target_class_id": school.class_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["recipient_count"], 1);

    let resp = app
        .auth_get("/api/notification", &school.student.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 1);

    let resp = app
        .auth_get("/api/notification", &other_student.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn class_targeting_without_class_id_is_rejected() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/notification", &school.admin.access_token)
        .json(&serde_json::json!({
            "title": "Oops",
            "body": "Missing target",
            "notification_type": "general",
            "target_audience": "specific_class",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn parents_cannot_send_notifications() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/notification", &school.parent.access_token)
        .json(&serde_json::json!({
            "title": "Hi",
            "body": "From a parent",
            "notification_type": "general",
            "target_audience": "all",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn mark_read_clears_the_unread_count() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/notification", &school.admin.access_token)
        .json(&serde_json::json!({
            "title": "Fee reminder",
            "body": "Second term fees are due.",
            "notification_type": "fee",
            "priority": "high",
            "target_audience": "parents",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    let notification_id = created["id"].as_str().unwrap();

    let resp = app
        .auth_get("/api/notification/unread", &school.parent.access_token)
        .send()
        .await
        .unwrap();
    let count: Value = resp.json().await.unwrap();
    assert_eq!(count["unread"], 1);

    let resp = app
        .auth_post(
            &format!("/api/notification/{notification_id}/read"),
            &school.parent.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get("/api/notification/unread", &school.parent.access_token)
        .send()
        .await
        .unwrap();
    let count: Value = resp.json().await.unwrap();
    assert_eq!(count["unread"], 0);

    let resp = app
        .auth_get("/api/notification", &school.parent.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["items"][0]["is_read"], true);
}

#[tokio::test]
async fn non_recipients_cannot_mark_read() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/notification", &school.admin.access_token)
        .json(&serde_json::json!({
            "title": "Teachers only",
            "body": "Staff meeting Monday.",
            "notification_type": "general",
            "target_audience": "teachers",
        }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let notification_id = created["id"].as_str().unwrap();

    let resp = app
        .auth_post(
            &format!("/api/notification/{notification_id}/read"),
            &school.parent.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
