//! Login, registration and logout flows.

use laundry_integration_tests::{BackendData, TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_user_login_lands_on_dashboard() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app.login("alice", "secret").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let body = app.page("/dashboard").await;
    assert!(body.contains("Your Plan:"));
    assert!(body.contains("premium"));
    assert!(body.contains("No requests found."));
}

#[tokio::test]
async fn test_admin_login_through_user_form_lands_on_admin() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app.login("root", "toor").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn test_bad_credentials_show_server_detail() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app.login("alice", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains("value=\"alice\""));

    let response = app.get("/dashboard").await;
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_blank_login_makes_no_call() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app.login("  ", "secret").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Please enter username and password."));
    assert_eq!(app.backend.total_hits(), 0);
}

#[tokio::test]
async fn test_register_password_mismatch_makes_no_call() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app
        .post_form(
            "/auth/register",
            &[
                ("username", "bob"),
                ("password", "one"),
                ("confirm_password", "two"),
                ("email", "bob@example.com"),
                ("phone", "9876543210"),
                ("plan", "basic"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Passwords do not match."));
    assert!(body.contains("value=\"bob@example.com\""));
    assert_eq!(app.backend.count("POST", "/register"), 0);
}

#[tokio::test]
async fn test_register_sends_user_role_then_login_works() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app
        .post_form(
            "/auth/register",
            &[
                ("username", "bob"),
                ("password", "hunter2"),
                ("confirm_password", "hunter2"),
                ("email", "bob@example.com"),
                ("phone", "9876543210"),
                ("plan", "basic"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    let sent = app.backend.last_body("/register").expect("register body");
    assert_eq!(sent["role"], "user");
    assert_eq!(sent["email"], "bob@example.com");
    assert_eq!(sent["plan"], "basic");

    let body = app.page("/auth/login").await;
    assert!(body.contains("Registration successful. Please login."));

    let response = app.login("bob", "hunter2").await;
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_duplicate_registration_shows_detail() {
    let app = TestApp::spawn(BackendData::standard()).await;

    let response = app
        .post_form(
            "/auth/register",
            &[
                ("username", "alice"),
                ("password", "x"),
                ("confirm_password", "x"),
                ("email", "alice@example.com"),
                ("phone", "1"),
                ("plan", "basic"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Username already exists"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn(BackendData::standard()).await;
    app.login("alice", "secret").await;

    let response = app.post_form("/auth/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_login_page_redirects_signed_in_user() {
    let app = TestApp::spawn(BackendData::standard()).await;
    app.login("alice", "secret").await;

    let response = app.get("/auth/login").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}
