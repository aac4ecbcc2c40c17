//! Shared fixtures for integration tests: an in-memory database, the real
//! router, and session issuance helpers.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use atrium::{
    api::build_router,
    auth::{
        user::{NewUser, UserStatus},
        SessionService,
    },
    config::AuthConfig,
    domain::{Role, UserId},
    storage::{
        repositories::{SqlxSessionRepository, SqlxUserRepository, UserRepository},
        run_migrations, DbPool,
    },
};

pub struct TestApp {
    pub pool: DbPool,
    session_service: SessionService,
}

pub struct TestSession {
    pub user_id: UserId,
    pub token: String,
}

pub async fn setup_test_app() -> TestApp {
    // One pinned connection keeps the private :memory: database alive for
    // the whole test; concurrent requests serialize at the pool.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");

    run_migrations(&pool).await.expect("run migrations for tests");

    let session_service = SessionService::new(
        Arc::new(SqlxSessionRepository::new(pool.clone())),
        &AuthConfig::default(),
    );

    TestApp { pool, session_service }
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.pool.clone())
    }

    async fn create_user(&self, role: Role) -> UserId {
        let users = SqlxUserRepository::new(self.pool.clone());
        let user = users
            .create_user(NewUser {
                id: UserId::new(),
                email: format!("{}@example.com", UserId::new()),
                name: "Test User".to_string(),
                role,
                status: UserStatus::Active,
            })
            .await
            .expect("create user");
        user.id
    }

    pub async fn create_session(&self, role: Role) -> TestSession {
        let user_id = self.create_user(role).await;
        let issued = self.session_service.issue(&user_id).await.expect("issue session");
        TestSession { user_id, token: issued.token }
    }

    pub async fn admin_session(&self) -> TestSession {
        self.create_session(Role::Admin).await
    }

    pub async fn member_session(&self) -> TestSession {
        self.create_session(Role::Member).await
    }

    /// Issue a session that is already past its expiry.
    pub async fn expired_session(&self) -> TestSession {
        let user_id = self.create_user(Role::Admin).await;
        let stale_service = SessionService::new(
            Arc::new(SqlxSessionRepository::new(self.pool.clone())),
            &AuthConfig { session_ttl_hours: -1 },
        );
        let issued = stale_service.issue(&user_id).await.expect("issue expired session");
        TestSession { user_id, token: issued.token }
    }

    pub async fn deactivate_user(&self, user_id: &UserId) {
        let users = SqlxUserRepository::new(self.pool.clone());
        users.set_user_status(user_id, UserStatus::Inactive).await.expect("deactivate user");
    }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    app.router().oneshot(request).await.expect("send request")
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json body")
}

/// Error kind from a `{ error, message }` failure body.
pub async fn error_kind(response: Response<Body>) -> String {
    response_json(response).await["error"].as_str().expect("error field").to_string()
}
