//! End-to-end tests driving the assembled router over an in-memory database

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::app::{AppState, app_router};
use crate::core::auth::{JwtConfig, JwtService};
use crate::core::db::{
    CategoryRepository, PasswordRepository, SqlitePool, UNCATEGORIZED, create_memory_pool,
};
use crate::core::validation::ValidationError;

struct TestApp {
    router: Router,
    pool: SqlitePool,
    categories: CategoryRepository,
    passwords: PasswordRepository,
}

impl TestApp {
    async fn new() -> Self {
        let pool = create_memory_pool().await.unwrap();
        let jwt_service = JwtService::new(JwtConfig::new("e2e_test_secret"));
        let state = AppState::new(pool.clone(), jwt_service, 4);

        Self {
            pool,
            categories: state.categories.clone(),
            passwords: state.passwords.clone(),
            router: app_router(state),
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }

    async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/create-user",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register `testuser` and return its access and refresh tokens
    async fn logged_in(&self) -> (String, String) {
        self.register("testuser", "testpard%$3").await;
        let (status, body) = self.login("testuser", "testpard%$3").await;
        assert_eq!(status, StatusCode::OK);

        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_index() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Ohkay ✅");
}

#[tokio::test]
async fn test_create_user_then_duplicate() {
    let app = TestApp::new().await;

    let (status, body) = app.register("testuser", "testpard%$3").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Successfully created user");

    let (status, body) = app.register("testuser", "testpard%$3").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already taken");
}

#[tokio::test]
async fn test_create_user_validation_errors() {
    let app = TestApp::new().await;

    let (status, body) = app.register("1user", "testpard%$3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_USERNAME");

    let (status, body) = app.register("abc", "testpard%$3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Username length should be between 4 and 10 characters"
    );

    // username is checked before password on registration
    let (status, body) = app.send("POST", "/create-user", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username");
}

#[tokio::test]
async fn test_login_returns_token_pair() {
    let app = TestApp::new().await;
    app.register("testuser", "testpard%$3").await;

    let (status, body) = app.login("testuser", "testpard%$3").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn test_login_failures_are_generic() {
    let app = TestApp::new().await;
    app.register("testuser", "testpard%$3").await;

    let (status, wrong_password) = app.login("testuser", "wrongpasswo3r&d").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], "Invalid username or password");

    let (status, unknown_user) = app.login("nobody", "testpard%$3").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user, wrong_password);
}

#[tokio::test]
async fn test_login_validates_password_first() {
    let app = TestApp::new().await;

    let (status, body) = app.login("testuser", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], ValidationError::PasswordFormat.to_string());

    let (status, body) = app.send("POST", "/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password is required");
}

#[tokio::test]
async fn test_login_rejects_bad_username_before_store() {
    let app = TestApp::new().await;
    // any store access from here on would surface as a 500
    app.pool.close().await;

    let (status, body) = app.login("ab", "valid123#").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Username length should be between 4 and 10 characters"
    );
    assert_eq!(body["code"], "INVALID_USERNAME_LENGTH");
}

#[tokio::test]
async fn test_passwords_sharing_bcrypt_prefix_are_refused() {
    let app = TestApp::new().await;
    let prefix = "a1@".repeat(24);

    let (status, body) = app.register("truncu", &format!("{}REAL1!", prefix)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PASSWORD_TOO_LONG");

    let (status, body) = app.login("truncu", &format!("{}WRONG2#", prefix)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PASSWORD_TOO_LONG");
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Gate and tokens
// ============================================================================

#[tokio::test]
async fn test_check_greets_access_token_holder() {
    let app = TestApp::new().await;
    let (access, _) = app.logged_in().await;

    let (status, body) = app.send("GET", "/check", Some(&access), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Hello, testuser! This endpoint is protected by JWT."
    );
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/check", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISSING_TOKEN");
}

#[tokio::test]
async fn test_malformed_token_blocks_handler() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            "POST",
            "/categories",
            Some("invalidtoken"),
            Some(json!({ "name": "Work" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Not enough segments");
    assert!(app.categories.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_token_from_other_secret_is_401() {
    let app = TestApp::new().await;
    let foreign = JwtService::new(JwtConfig::new("someone_elses_secret"));
    let (token, _) = foreign.generate_access_token("testuser").unwrap();

    let (status, body) = app.send("GET", "/check", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new().await;
    let (_, refresh) = app.logged_in().await;

    let (status, body) = app.send("POST", "/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::OK);

    let new_access = body["access_token"].as_str().unwrap();
    let (status, _) = app.send("GET", "/check", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_kinds_are_not_interchangeable() {
    let app = TestApp::new().await;
    let (access, refresh) = app.logged_in().await;

    let (status, body) = app.send("POST", "/refresh", Some(&access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Only refresh tokens are allowed");

    let (status, body) = app.send("GET", "/check", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_WRONG_KIND");
}

// ============================================================================
// Records
// ============================================================================

#[tokio::test]
async fn test_category_lifecycle() {
    let app = TestApp::new().await;
    let (access, _) = app.logged_in().await;
    let token = Some(access.as_str());

    let (status, body) = app
        .send("POST", "/categories", token, Some(json!({ "name": "Work" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category created successfully.");

    let (status, _) = app
        .send("POST", "/categories", token, Some(json!({ "name": "Work" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("POST", "/categories", token, Some(json!({ "name": "  " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.send("GET", "/categories", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    let id = body["categories"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "PUT",
            &format!("/categories/{}", id),
            token,
            Some(json!({ "name": "Office" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category updated successfully.");
    assert_eq!(
        app.categories.find_by_id(id).await.unwrap().unwrap().name,
        "Office"
    );

    let (status, body) = app
        .send("PUT", "/categories/999", token, Some(json!({ "name": "Nope" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found.");

    let (status, body) = app
        .send("DELETE", &format!("/categories/{}", id), token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted successfully.");
}

#[tokio::test]
async fn test_password_lifecycle() {
    let app = TestApp::new().await;
    let (access, _) = app.logged_in().await;
    let token = Some(access.as_str());
    let category = app.categories.create("Work").await.unwrap();

    let (status, body) = app
        .send(
            "POST",
            "/passwords",
            token,
            Some(json!({
                "name": "github",
                "email": "dev@example.com",
                "password": "hunter2",
                "notes": "2fa enabled",
                "category_id": category.id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Password created successfully.");

    let (status, body) = app
        .send(
            "POST",
            "/passwords",
            token,
            Some(json!({ "name": "orphan", "category_id": 999 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category ID");

    let uri = format!("/categories/{}/passwords", category.id);
    let (status, body) = app.send("GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["passwords"][0]["email"], "dev@example.com");
    let id = body["passwords"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "PUT",
            &format!("/passwords/{}", id),
            token,
            Some(json!({ "password": "correct-horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully.");

    let record = app.passwords.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.password.as_deref(), Some("correct-horse"));
    assert_eq!(record.name.as_deref(), Some("github"));

    let (status, body) = app
        .send("PUT", "/passwords/999", token, Some(json!({ "notes": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Password not found.");

    let (status, body) = app
        .send("DELETE", &format!("/passwords/{}", id), token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password deleted successfully.");

    let (status, _) = app
        .send("DELETE", &format!("/passwords/{}", id), token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_category_keeps_its_passwords() {
    let app = TestApp::new().await;
    let (access, _) = app.logged_in().await;
    let token = Some(access.as_str());
    let category = app.categories.create("Work").await.unwrap();

    app.send(
        "POST",
        "/passwords",
        token,
        Some(json!({ "name": "github", "category_id": category.id })),
    )
    .await;

    let (status, _) = app
        .send("DELETE", &format!("/categories/{}", category.id), token, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send("GET", "/categories", token, None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["categories"][0]["name"], UNCATEGORIZED);
    let uncategorized_id = body["categories"][0]["id"].as_i64().unwrap();

    let uri = format!("/categories/{}/passwords", uncategorized_id);
    let (_, body) = app.send("GET", &uri, token, None).await;
    assert_eq!(body["passwords"][0]["name"], "github");

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/categories/{}", uncategorized_id),
            token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CATEGORY_PROTECTED");
}

#[tokio::test]
async fn test_non_numeric_id_is_json_bad_request() {
    let app = TestApp::new().await;
    let (access, _) = app.logged_in().await;

    let (status, body) = app
        .send("DELETE", "/passwords/abc", Some(&access), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_category_passwords_is_404() {
    let app = TestApp::new().await;
    let (access, _) = app.logged_in().await;

    let (status, _) = app
        .send("GET", "/categories/999/passwords", Some(&access), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
