//! End-to-end tests for doctor credential review.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;

use support::{spawn_app, PASSWORD};

#[tokio::test]
async fn test_doctor_registration_submits_pending_verification() {
    let app = spawn_app().await;

    let (status, body) = app
        .register_doctor("200469201396", "nimali@example.com")
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let verification = &body["data"]["verification"];
    assert_eq!(verification["status"], "pending");
    assert_eq!(verification["doctor_nic"], "200469201396");
    assert_eq!(verification["license_document_url"], "https://x/doc.pdf");
    assert!(verification["reviewed_at"].is_null());
    assert!(verification["rejection_reason"].is_null());
    assert_eq!(body["data"]["user"]["role"], "doctor");
    assert_eq!(body["data"]["user"]["gender"], "female");
}

#[tokio::test]
async fn test_doctor_registration_without_license_creates_nothing() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "nic": "200469201396",
                "email": "nimali@example.com",
                "password": PASSWORD,
                "full_name": "Dr. Nimali Perera",
                "role": "doctor",
                "specialization": "Gynecology",
                "qualifications": "MBBS"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "license_document_url");

    let (_, listing) = app
        .get("/api/admin/all-doctor-verifications", &admin)
        .await;
    assert_eq!(listing["pagination"]["total"], 0);

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nimali@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_nic_is_a_conflict() {
    let app = spawn_app().await;
    app.doctor("200469201396", "nimali@example.com").await;

    let (status, body) = app
        .register_doctor("200469201396", "other@example.com")
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_approve_sets_review_and_verifies_profile() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (doctor_id, doctor) = app.doctor("200469201396", "nimali@example.com").await;

    let (status, body) = app
        .post(
            &format!("/api/admin/approve-doctor/{}", doctor_id),
            Some(&admin),
            json!({ "notes": "License checked with SLMC" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    let record = &body["data"];
    assert_eq!(record["status"], "approved");
    assert!(record["reviewed_at"].is_string());
    assert!(record["reviewed_by"].is_string());
    assert!(record["rejection_reason"].is_null());
    assert_eq!(record["review_notes"], "License checked with SLMC");

    // Profile picks up the application's specialization and opens the gate
    let (status, profile) = app.get("/api/doctor/profile", &doctor).await;
    assert_eq!(status, StatusCode::OK, "{}", profile);
    assert_eq!(profile["data"]["is_verified"], true);
    assert_eq!(profile["data"]["specialization"], "Gynecology");

    let (_, notes) = app.get("/api/doctor/notifications", &doctor).await;
    assert_eq!(notes["data"].as_array().unwrap().len(), 1);
    assert_eq!(notes["data"][0]["is_read"], false);
}

#[tokio::test]
async fn test_approve_without_body() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (doctor_id, _) = app.doctor("200469201396", "nimali@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/admin/approve-doctor/{}", doctor_id),
            Some(&admin),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["data"]["review_notes"].is_null());
}

#[tokio::test]
async fn test_approve_with_malformed_body_is_refused() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (doctor_id, _) = app.doctor("200469201396", "nimali@example.com").await;
    let approve = format!("/api/admin/approve-doctor/{}", doctor_id);

    for body in [json!({ "notes": 5 }), json!("approve please")] {
        let (status, response) = app.post(&approve, Some(&admin), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", response);
        assert_eq!(response["code"], "VALIDATION_ERROR");
    }

    let (_, pending) = app.get("/api/admin/pending-doctors", &admin).await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_review_is_a_conflict() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (doctor_id, _) = app.doctor("200469201396", "nimali@example.com").await;
    let approve = format!("/api/admin/approve-doctor/{}", doctor_id);

    let (first, _) = app.post(&approve, Some(&admin), json!({})).await;
    let (second, body) = app.post(&approve, Some(&admin), json!({})).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // A terminal record cannot be flipped to rejected either
    let (status, _) = app
        .post(
            &format!("/api/admin/reject-doctor/{}", doctor_id),
            Some(&admin),
            json!({ "reason": "Changed my mind" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (doctor_id, _) = app.doctor("200469201396", "nimali@example.com").await;
    let reject = format!("/api/admin/reject-doctor/{}", doctor_id);

    for body in [json!({}), json!({ "reason": "" }), json!({ "reason": "   " })] {
        let (status, response) = app.post(&reject, Some(&admin), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["errors"][0]["field"], "reason");
    }

    let (status, _) = app
        .request(Method::POST, &reject, Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Still pending after the refused attempts
    let (_, pending) = app.get("/api/admin/pending-doctors", &admin).await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reject_stores_reason_verbatim() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (doctor_id, _) = app.doctor("200469201396", "nimali@example.com").await;
    let reason = "  Scan is blurred; please re-upload page 2  ";

    let (status, body) = app
        .post(
            &format!("/api/admin/reject-doctor/{}", doctor_id),
            Some(&admin),
            json!({ "reason": reason }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["rejection_reason"], reason);
}

#[tokio::test]
async fn test_review_unknown_doctor() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            &format!("/api/admin/approve-doctor/{}", uuid::Uuid::new_v4()),
            Some(&admin),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post("/api/admin/approve-doctor/not-a-uuid", Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_listings_filter_by_status() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (approved_id, _) = app.doctor("200469201396", "a@example.com").await;
    let (rejected_id, _) = app.doctor("199061201234", "r@example.com").await;
    app.doctor("198870512345", "p@example.com").await;

    app.post(
        &format!("/api/admin/approve-doctor/{}", approved_id),
        Some(&admin),
        json!({}),
    )
    .await;
    app.post(
        &format!("/api/admin/reject-doctor/{}", rejected_id),
        Some(&admin),
        json!({ "reason": "Expired license" }),
    )
    .await;

    let (status, pending) = app.get("/api/admin/pending-doctors", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let pending = pending["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["status"], "pending");
    assert_eq!(pending[0]["applicant"]["email"], "p@example.com");

    let (_, rejected) = app
        .get("/api/admin/all-doctor-verifications?status=rejected", &admin)
        .await;
    let rows = rejected["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|r| r["status"] == "rejected"));

    let (_, all) = app
        .get("/api/admin/all-doctor-verifications?status=all", &admin)
        .await;
    assert_eq!(all["pagination"]["total"], 3);

    let (status, body) = app
        .get("/api/admin/all-doctor-verifications?status=under_review", &admin)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "status");
}

#[tokio::test]
async fn test_pagination_boundary() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.seed_pending_doctors(21).await;

    let (status, first) = app
        .get("/api/admin/all-doctor-verifications?limit=20", &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"].as_array().unwrap().len(), 20);
    assert_eq!(
        first["pagination"],
        json!({ "page": 1, "limit": 20, "total": 21, "pages": 2 })
    );

    let (_, second) = app
        .get(
            "/api/admin/all-doctor-verifications?status=pending&page=2&limit=20",
            &admin,
        )
        .await;
    assert_eq!(second["data"].as_array().unwrap().len(), 1);
    assert_eq!(second["pagination"]["page"], 2);

    let first_ids: Vec<_> = first["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert!(!first_ids.contains(&second["data"][0]["id"]));
}

#[tokio::test]
async fn test_page_past_u64_range_lists_nothing() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.seed_pending_doctors(2).await;

    for uri in [
        "/api/admin/all-doctor-verifications?page=18446744073709551615&limit=100",
        "/api/admin/users?page=18446744073709551615&limit=100",
    ] {
        let (status, body) = app.get(uri, &admin).await;
        assert_eq!(status, StatusCode::OK, "{}: {}", uri, body);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert!(body["pagination"]["total"].as_u64().unwrap() >= 2);
    }
}

#[tokio::test]
async fn test_rejection_scenario_end_to_end() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .register_doctor("200419201396", "doctor@example.com")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["verification"]["status"], "pending");
    assert_eq!(body["data"]["user"]["date_of_birth"], "2004-07-10");
    assert_eq!(body["data"]["user"]["gender"], "male");
    let doctor_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    let doctor = app.login("doctor@example.com").await;

    let (status, body) = app
        .post(
            &format!("/api/admin/reject-doctor/{}", doctor_id),
            Some(&admin),
            json!({ "reason": "Illegible document" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["rejection_reason"], "Illegible document");
    assert!(body["data"]["reviewed_at"].is_string());

    let (status, own) = app
        .get("/api/doctor/verification/200419201396", &doctor)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["data"]["status"], "rejected");
    assert_eq!(own["data"]["rejection_reason"], "Illegible document");

    // Rejected doctors stay outside the gate and are told why
    let (status, _) = app.get("/api/doctor/profile", &doctor).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
