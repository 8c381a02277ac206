//! The web front end wired to a [`FakeBackend`].

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use laundry_web::config::{ApiConfig, WebConfig};
use laundry_web::state::AppState;
use reqwest::{Client, Response, redirect};

use crate::backend::{BackendData, FakeBackend};

/// Configuration pointing the front end at `backend`.
pub fn config_for(backend: &FakeBackend, port: u16) -> WebConfig {
    WebConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port,
        base_url: format!("http://127.0.0.1:{port}"),
        api: ApiConfig {
            base_url: backend.url().clone(),
            timeout: None,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The full router for in-process `oneshot` requests.
pub fn router(backend: &FakeBackend) -> Router {
    let state = AppState::new(config_for(backend, 3000)).expect("Failed to build app state");
    laundry_web::app(state)
}

/// A served front end plus a browser-like client that keeps cookies and
/// does not follow redirects.
pub struct TestApp {
    pub url: String,
    pub client: Client,
    pub backend: FakeBackend,
}

impl TestApp {
    /// Start a fake backend with `data` and serve the front end against it.
    pub async fn spawn(data: BackendData) -> Self {
        let backend = FakeBackend::spawn(data).await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind front end");
        let port = listener
            .local_addr()
            .expect("Failed to read local address")
            .port();

        let state = AppState::new(config_for(&backend, port)).expect("Failed to build app state");
        let app = laundry_web::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Front end stopped");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: format!("http://127.0.0.1:{port}"),
            client,
            backend,
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.url))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.url))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Submit the multipart order request form.
    pub async fn post_multipart(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text((*name).to_string(), (*value).to_string())
            });
        self.client
            .post(format!("{}{path}", self.url))
            .multipart(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// GET and return the body text.
    pub async fn page(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("Failed to read body")
    }

    /// Log in through the user login form.
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form(
            "/auth/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    /// Log in through the admin login form.
    pub async fn admin_login(&self, username: &str, password: &str) -> Response {
        self.post_form("/admin/login", &[("username", username), ("password", password)])
            .await
    }
}

/// `Location` header of a redirect response.
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
