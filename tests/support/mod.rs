//! Shared harness for the end-to-end API tests.
//!
//! Each test gets its own in-memory SQLite database with the real
//! migrations applied, a scratch upload directory and a limiter that never
//! refuses.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use hercycle::api::{create_router, AppState};
use hercycle::config::Config;
use hercycle::domain::{Application, NewUser, Nic, UserRole};
use hercycle::errors::AppResult;
use hercycle::infra::{Database, Persistence, RateLimiter, UnitOfWork};
use hercycle::services::{ServiceContainer, Services};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const PASSWORD: &str = "SecurePass123!";
pub const ADMIN_NIC: &str = "198512345678";
pub const ADMIN_EMAIL: &str = "admin@hercycle.lk";

/// Limiter that counts nothing and allows everything
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn check_rate_limit(
        &self,
        _identifier: &str,
        _max_requests: u64,
        _window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        Ok((1, true))
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Config,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.config.upload_dir);
    }
}

/// App with the verified-doctor gate on (the default).
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    // One connection: every pooled connection would get its own memory DB
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = SeaDatabase::connect(options)
        .await
        .expect("sqlite connection");
    Database::from_connection(db.clone())
        .run_migrations()
        .await
        .expect("migrations");

    let mut config = Config::new("sqlite::memory:", JWT_SECRET);
    config.upload_dir = scratch_dir();
    config.public_base_url = "http://test.local".to_string();
    configure(&mut config);

    let state = AppState::from_connection(db.clone(), Arc::new(Unlimited), config.clone());

    TestApp {
        router: create_router(state),
        db,
        config,
    }
}

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("hercycle-test-{}", Uuid::new_v4()))
}

// =============================================================================
// Requests
// =============================================================================

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["access_token"]
            .as_str()
            .expect("access_token")
            .to_string()
    }

    /// Provision the admin the way the CLI does, then sign in.
    pub async fn admin_token(&self) -> String {
        Services::from_connection(self.db.clone(), &self.config)
            .users()
            .create_admin(
                Nic::parse(ADMIN_NIC).unwrap(),
                ADMIN_EMAIL.to_string(),
                "Site Admin".to_string(),
                PASSWORD.to_string(),
            )
            .await
            .expect("admin account");
        self.login(ADMIN_EMAIL).await
    }

    pub async fn register_doctor(&self, nic: &str, email: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            None,
            json!({
                "nic": nic,
                "email": email,
                "password": PASSWORD,
                "full_name": "Dr. Nimali Perera",
                "phone": "+94771234567",
                "role": "doctor",
                "specialization": "Gynecology",
                "qualifications": "MBBS, MD (OBGYN)",
                "license_document_url": "https://x/doc.pdf",
                "registration_details": "SLMC 12345"
            }),
        )
        .await
    }

    /// Register a doctor and return `(user_id, token)`.
    pub async fn doctor(&self, nic: &str, email: &str) -> (String, String) {
        let (status, body) = self.register_doctor(nic, email).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["data"]["user"]["id"].as_str().unwrap().to_string();
        (id, self.login(email).await)
    }

    pub async fn register_user(&self, nic: &str, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "nic": nic,
                    "email": email,
                    "password": PASSWORD,
                    "full_name": "Kasuni Silva"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        self.login(email).await
    }

    /// Insert pending doctor applications directly, skipping password hashing.
    pub async fn seed_pending_doctors(&self, count: u32) {
        let uow = Persistence::new(self.db.clone());
        for i in 0..count {
            let nic = Nic::parse(&format!("1990{:03}{:04}0", 610 + i, i)).unwrap();
            uow.transaction(move |ctx| {
                Box::pin(async move {
                    let user = ctx
                        .users()
                        .create(NewUser {
                            nic: nic.as_str().to_string(),
                            email: format!("seeded{}@example.com", i),
                            password_hash: "not-a-hash".to_string(),
                            full_name: format!("Seeded Doctor {}", i),
                            phone: None,
                            role: UserRole::Doctor,
                            gender: nic.gender(),
                            date_of_birth: nic.date_of_birth(),
                        })
                        .await?;
                    ctx.verifications()
                        .create(Application {
                            id: Uuid::new_v4(),
                            user_id: user.id,
                            doctor_nic: user.nic.clone(),
                            specialization: "General".to_string(),
                            qualifications: "MBBS".to_string(),
                            license_document_url: "https://x/doc.pdf".to_string(),
                            registration_details: String::new(),
                            submitted_at: Utc::now(),
                        })
                        .await?;
                    Ok(())
                })
            })
            .await
            .expect("seed doctor");
        }
    }
}
