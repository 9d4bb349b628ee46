use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn day_sheet_resubmission_overwrites_instead_of_duplicating() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let sheet = |status: &str| {
        serde_json::json!({
            "class_id": school.class_id,
            "date": "2026-03-02",
            "entries": [
                { "student_id": school.student_id, "status": status },
            ],
        })
    };

    let resp = app
        .auth_post("/api/attendance", &school.teacher.access_token)
        .json(&sheet("present"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Correcting the same day replaces the record.
    let resp = app
        .auth_post("/api/attendance", &school.teacher.access_token)
        .json(&sheet("absent"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            "/api/attendance?start_date=2026-03-01&end_date=2026-03-05",
            &school.teacher.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let records: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "absent");
}

#[tokio::test]
async fn teacher_cannot_record_for_a_class_they_do_not_own() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

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
    let other_class_id = other_class["id"].as_str().unwrap();

    let resp = app
        .auth_post("/api/attendance", &school.teacher.access_token)
        .json(&serde_json::json!({
            "class_id": other_class_id,
            "date": "2026-03-02",
            "entries": [
                { "student_id": school.student_id, "status": "present" },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn students_cannot_read_attendance_lists() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_get("/api/attendance", &school.student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app
        .auth_get("/api/attendance/analytics", &school.student.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn analytics_counts_sum_and_rate_is_guarded() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let (_, second_id) = app
        .seed_student(&school, "s2@school.test", "s2_student", 2, &school.class_id)
        .await;

    app.auth_post("/api/attendance", &school.teacher.access_token)
        .json(&serde_json::json!({
            "class_id": school.class_id,
            "date": "2026-03-02",
            "entries": [
                { "student_id": school.student_id, "status": "present" },
                { "student_id": second_id, "status": "late" },
            ],
        }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(
            "/api/attendance/analytics?start_date=2026-03-01&end_date=2026-03-05",
            &school.teacher.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let report: Value = resp.json().await.unwrap();

    assert_eq!(report["summary"]["present"], 1);
    assert_eq!(report["summary"]["late"], 1);
    assert_eq!(report["summary"]["total"], 2);
    // present / total, two sided window
    assert_eq!(report["summary"]["rate"], 50.0);
    // Teacher variant carries the per-student breakdown
    assert!(report["by_student"].is_array());

    // An empty window yields rate 0, not NaN.
    let resp = app
        .auth_get(
            "/api/attendance/analytics?start_date=2020-01-01&end_date=2020-01-02",
            &school.teacher.access_token,
        )
        .send()
        .await
        .unwrap();
    let report: Value = resp.json().await.unwrap();
    assert_eq!(report["summary"]["total"], 0);
    assert_eq!(report["summary"]["rate"], 0.0);
}

#[tokio::test]
async fn analytics_rejects_inverted_window() {
    let app = TestApp::spawn().await;
    let school = app.seed_school().await;

    let resp = app
        .auth_get(
            "/api/attendance/analytics?start_date=2026-03-05&end_date=2026-03-01",
            &school.admin.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
