use crate::fixtures::test_app::TestApp;
use serde_json::Value;

async fn start_conversation(app: &TestApp, token: &str, other_user_id: &str) -> String {
    let resp = app
        .auth_post("/api/conversation", token)
        .json(&serde_json::json!({ "user_id": other_user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.status().as_u16(),
        201,
        "Start conversation failed: {}",
        resp.text().await.unwrap_or_default()
    );
    let conversation: Value = resp.json().await.unwrap();
    conversation["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn starting_twice_reuses_the_same_conversation() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let first = start_conversation(&app, &school.parent.access_token, &school.teacher.id).await;
    // Same pair, either direction.
    let second = start_conversation(&app, &school.teacher.access_token, &school.parent.id).await;
    assert_eq!(first, second);

    let resp = app
        .auth_get("/api/conversation", &school.parent.access_token)
        .send()
        .await
        .unwrap();
    let conversations: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(conversations.len(), 1);
}

#[tokio::test]
async fn conversation_with_yourself_is_rejected() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/conversation", &school.parent.access_token)
        .json(&serde_json::json!({ "user_id": school.parent.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn messages_flow_and_update_the_last_message() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let cid = start_conversation(&app, &school.parent.access_token, &school.teacher.id).await;

    let resp = app
        .auth_post(&format!("/api/conversation/{cid}/message"), &school.parent.access_token)
        .json(&serde_json::json!({ "content": "How is Ana doing in math?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post(&format!("/api/conversation/{cid}/message"), &school.teacher.access_token)
        .json(&serde_json::json!({ "content": "Very well, top of the class." }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["receiver_id"], school.parent.id);
    assert_eq!(reply["is_read"], false);

    let resp = app
        .auth_get(&format!("/api/conversation/{cid}/message"), &school.parent.access_token)
        .send()
        .await
        .unwrap();
    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["total"], 2);

    let resp = app
        .auth_get("/api/conversation", &school.parent.access_token)
        .send()
        .await
        .unwrap();
    let conversations: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(
        conversations[0]["last_message"]["content"],
        "Very well, top of the class."
    );
    assert_eq!(conversations[0]["last_message"]["sender_id"], school.teacher.id);
}

#[tokio::test]
async fn outsiders_cannot_read_or_post() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let cid = start_conversation(&app, &school.parent.access_token, &school.teacher.id).await;

    let resp = app
        .auth_get(&format!("/api/conversation/{cid}/message"), &school.student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_post(&format!("/api/conversation/{cid}/message"), &school.student.access_token)
        .json(&serde_json::json!({ "content": "Let me in" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn mark_read_covers_only_messages_addressed_to_the_caller() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let cid = start_conversation(&app, &school.parent.access_token, &school.teacher.id).await;

    for content in ["First", "Second"] {
        app.auth_post(&format!("/api/conversation/{cid}/message"), &school.parent.access_token)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .unwrap();
    }
    app.auth_post(&format!("/api/conversation/{cid}/message"), &school.teacher.access_token)
        .json(&serde_json::json!({ "content": "Reply" }))
        .send()
        .await
        .unwrap();

    // The teacher received two of the three.
    let resp = app
        .auth_post(&format!("/api/conversation/{cid}/read"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let marked: Value = resp.json().await.unwrap();
    assert_eq!(marked["marked"], 2);

    // Marking again is a no-op.
    let resp = app
        .auth_post(&format!("/api/conversation/{cid}/read"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    let marked: Value = resp.json().await.unwrap();
    assert_eq!(marked["marked"], 0);
}
