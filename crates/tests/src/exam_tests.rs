use crate::fixtures::seed::SeededSchool;
use crate::fixtures::test_app::TestApp;
use serde_json::Value;

async fn create_exam(app: &TestApp, school: &SeededSchool) -> String {
    let resp = app
        .auth_post("/api/exam", &school.teacher.access_token)
        .json(&serde_json::json!({
            "title": "Math Midterm",
            "subject_id": school.subject_id,
            "grade_id": school.grade_id,
            "class_id": school.class_id,
            "exam_date": "2026-03-20T09:00:00Z",
            "max_marks": 100.0,
            "duration_mins": 90,
            "exam_type": "midterm",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.status().as_u16(),
        201,
        "Create exam failed: {}",
        resp.text().await.unwrap_or_default()
    );
    let exam: Value = resp.json().await.unwrap();
    assert_eq!(exam["status"], "scheduled");
    exam["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn saving_results_moves_scheduled_to_ongoing() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [
                { "student_id": school.student_id, "marks": 72.0 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(&format!("/api/exam/{exam_id}"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    let exam: Value = resp.json().await.unwrap();
    assert_eq!(exam["status"], "ongoing");
}

#[tokio::test]
async fn result_resubmission_corrects_marks_without_duplicating() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    for marks in [60.0, 85.0] {
        let resp = app
            .auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
            .json(&serde_json::json!({
                "results": [
                    { "student_id": school.student_id, "marks": marks },
                ],
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }

    let resp = app
        .auth_get(&format!("/api/exam/{exam_id}/results"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    let report: Value = resp.json().await.unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["marks"], 85.0);
    assert_eq!(results[0]["percentage"], 85.0);
}

#[tokio::test]
async fn marks_above_max_are_rejected() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [
                { "student_id": school.student_id, "marks": 101.0 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn absent_result_reports_null_percentage() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [
                { "student_id": school.student_id, "is_absent": true },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(&format!("/api/exam/{exam_id}/results"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    let report: Value = resp.json().await.unwrap();
    let row = &report["results"][0];
    assert_eq!(row["is_absent"], true);
    assert_eq!(row["is_graded"], true);
    assert!(row["percentage"].is_null());
    assert!(row["marks"].is_null());
}

#[tokio::test]
async fn publish_lifecycle_is_irreversible() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    // Cannot publish a scheduled exam.
    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/publish"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    // Save a result (scheduled -> ongoing), then publish.
    app.auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [{ "student_id": school.student_id, "marks": 90.0 }],
        }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/publish"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Publishing again fails, and results can no longer be edited.
    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/publish"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    let resp = app
        .auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [{ "student_id": school.student_id, "marks": 10.0 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn students_only_see_published_exams() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    // Unpublished: hidden from the student.
    let resp = app
        .auth_get("/api/exam", &school.student.access_token)
        .send()
        .await
        .unwrap();
    let exams: Vec<Value> = resp.json().await.unwrap();
    assert!(exams.is_empty());

    let resp = app
        .auth_get(&format!("/api/exam/{exam_id}"), &school.student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // Publish, then it appears.
    app.auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [{ "student_id": school.student_id, "marks": 55.0 }],
        }))
        .send()
        .await
        .unwrap();
    app.auth_post(&format!("/api/exam/{exam_id}/publish"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get("/api/exam", &school.student.access_token)
        .send()
        .await
        .unwrap();
    let exams: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0]["status"], "published");
}

#[tokio::test]
async fn student_performance_report_shows_published_results_only() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;
    let exam_id = create_exam(&app, &school).await;

    app.auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [{ "student_id": school.student_id, "marks": 80.0 }],
        }))
        .send()
        .await
        .unwrap();

    // Unpublished: the student's own report hides it.
    let resp = app
        .auth_get(
            &format!("/api/student/{}/performance?period=365", school.student_id),
            &school.student.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["results"].as_array().unwrap().len(), 0);
    assert_eq!(report["overall_grade"], "N/A");

    app.auth_post(&format!("/api/exam/{exam_id}/publish"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            &format!("/api/student/{}/performance?period=365", school.student_id),
            &school.student.access_token,
        )
        .send()
        .await
        .unwrap();
    let report: Value = resp.json().await.unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["percentage"], 80.0);
    assert_eq!(results[0]["grade"], "A");
    assert_eq!(report["average_percentage"], 80.0);
}

#[tokio::test]
async fn other_parents_cannot_read_a_students_performance() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let stranger = app
        .register_user("stranger@test.com", "stranger", "Stranger", "Password123!", None)
        .await;

    let resp = app
        .auth_get(
            &format!("/api/student/{}/performance", school.student_id),
            &stranger.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
