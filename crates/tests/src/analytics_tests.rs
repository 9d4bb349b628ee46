use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn dashboard_analytics_are_admin_only() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    for path in [
        "/api/analytics/overview",
        "/api/analytics/attendance",
        "/api/analytics/performance",
        "/api/analytics/fees",
        "/api/analytics/enrollment",
    ] {
        for token in [
            &school.teacher.access_token,
            &school.parent.access_token,
            &school.student.access_token,
        ] {
            let resp = app.auth_get(path, token).send().await.unwrap();
            assert_eq!(resp.status().as_u16(), 403, "{path} should be admin-only");
        }
    }
}

#[tokio::test]
async fn overview_counts_the_school() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/exam", &school.teacher.access_token)
        .json(&serde_json::json!({
            "title": "Chapter Test",
            "subject_id": school.subject_id,
            "grade_id": school.grade_id,
            "exam_date": "2099-06-01T09:00:00Z",
            "max_marks": 20.0,
            "duration_mins": 30,
            "exam_type": "unit_test",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_get("/api/analytics/overview", &school.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let report: Value = resp.json().await.unwrap();

    assert_eq!(report["students"], 1);
    assert_eq!(report["teachers"], 1);
    assert_eq!(report["classes"], 1);
    // No attendance taken today: recorded 0, rate guarded to 0.
    assert_eq!(report["attendance_today"]["recorded"], 0);
    assert_eq!(report["attendance_today"]["rate"], 0.0);
    let upcoming = report["upcoming_exams"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    // Same wire form for the type as every other exam endpoint.
    assert_eq!(upcoming[0]["exam_type"], "unit_test");
}

#[tokio::test]
async fn enrollment_groups_by_grade_and_admission_month() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    app.seed_student(&school, "e2@school.test", "e2_student", 2, &school.class_id)
        .await;

    let resp = app
        .auth_get("/api/analytics/enrollment", &school.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let report: Value = resp.json().await.unwrap();

    assert_eq!(report["total_students"], 2);
    let by_grade = report["by_grade"].as_array().unwrap();
    assert_eq!(by_grade.len(), 1);
    assert_eq!(by_grade[0]["grade_name"], "Grade 5");
    assert_eq!(by_grade[0]["students"], 2);
    // Both were admitted just now, inside the default window.
    let by_month = report["by_month"].as_array().unwrap();
    assert_eq!(by_month.len(), 1);
    assert_eq!(by_month[0]["admissions"], 2);
}

#[tokio::test]
async fn performance_covers_published_exams() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/exam", &school.teacher.access_token)
        .json(&serde_json::json!({
            "title": "Science Quiz",
            "subject_id": school.subject_id,
            "grade_id": school.grade_id,
            "exam_date": "2026-03-10T09:00:00Z",
            "max_marks": 50.0,
            "duration_mins": 45,
            "exam_type": "quiz",
        }))
        .send()
        .await
        .unwrap();
    let exam: Value = resp.json().await.unwrap();
    let exam_id = exam["id"].as_str().unwrap();

    app.auth_post(&format!("/api/exam/{exam_id}/result"), &school.teacher.access_token)
        .json(&serde_json::json!({
            "results": [{ "student_id": school.student_id, "marks": 45.0 }],
        }))
        .send()
        .await
        .unwrap();
    app.auth_post(&format!("/api/exam/{exam_id}/publish"), &school.teacher.access_token)
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get("/api/analytics/performance", &school.admin.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let report: Value = resp.json().await.unwrap();

    assert_eq!(report["exams_considered"], 1);
    assert_eq!(report["results_graded"], 1);
    assert_eq!(report["average_percentage"], 90.0);
    assert_eq!(report["by_subject"][0]["subject_name"], "Mathematics");
    assert_eq!(report["top_performers"][0]["name"], "Ana Petrova");
    assert_eq!(report["top_performers"][0]["grade"], "A+");
    // Coarse distribution: 90% lands in the "A" band.
    let dist = report["grade_distribution"].as_array().unwrap();
    assert_eq!(dist[0]["grade"], "A");
    assert_eq!(dist[0]["count"], 1);
    assert_eq!(report["skipped_records"], 0);
}

#[tokio::test]
async fn performance_ignores_scheduled_exams() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_post("/api/exam", &school.teacher.access_token)
        .json(&serde_json::json!({
            "title": "Future Final",
            "subject_id": school.subject_id,
            "grade_id": school.grade_id,
            "exam_date": "2027-06-01T09:00:00Z",
            "max_marks": 100.0,
            "duration_mins": 120,
            "exam_type": "final",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_get("/api/analytics/performance", &school.admin.access_token)
        .send()
        .await
        .unwrap();
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["exams_considered"], 0);
    assert_eq!(report["average_percentage"], 0.0);
}

#[tokio::test]
async fn attendance_analytics_accepts_an_explicit_window() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    app.auth_post("/api/attendance", &school.teacher.access_token)
        .json(&serde_json::json!({
            "class_id": school.class_id,
            "date": "2026-03-02",
            "entries": [
                { "student_id": school.student_id, "status": "present" },
            ],
        }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            "/api/analytics/attendance?start_date=2026-03-01&end_date=2026-03-05",
            &school.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["summary"]["present"], 1);
    assert_eq!(report["summary"]["rate"], 100.0);
    assert_eq!(report["by_date"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_analytics_filters_are_bad_requests() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    // Malformed ids and dates get the same 400 as everywhere else in the API.
    let resp = app
        .auth_get(
            "/api/analytics/attendance?class_id=not-an-id",
            &school.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = app
        .auth_get(
            "/api/analytics/fees?start_date=03/15/2026",
            &school.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // A well-formed but inconsistent window stays a validation error.
    let resp = app
        .auth_get(
            "/api/analytics/fees?start_date=2026-03-10&end_date=2026-03-01",
            &school.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
