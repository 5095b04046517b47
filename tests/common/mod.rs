//! Stub backend shared by the integration tests.
//!
//! Serves the four endpoints the portal talks to on an ephemeral port and
//! records every request it sees.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use course_portal::{ApiClient, ApiConfig, App, SessionManager, SessionStore};

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    content_delay: Duration,
}

/// Running stub backend.
pub struct StubBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        Self::start_with_delay(Duration::ZERO).await
    }

    /// Start a stub whose role content endpoints answer after `delay`.
    pub async fn start_with_delay(delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: Arc::clone(&requests),
            content_delay: delay,
        };

        let router = Router::new()
            .route("/auth/token", post(token))
            .route("/api/courses", get(courses))
            .route("/api/students", get(students))
            .route("/api/teachers", get(teachers))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests made to `path`, in order.
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(ApiConfig::new(self.base_url.parse().unwrap())).unwrap()
    }

    /// A fresh app backed by `store`, as if a new tab were opened.
    pub fn app_with_store(&self, store: SessionStore) -> App {
        App::new(Arc::new(SessionManager::hydrate(store)), self.api())
    }

    pub fn app(&self) -> App {
        self.app_with_store(SessionStore::in_memory())
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(State(state): State<StubState>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(Recorded {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization,
    });

    next.run(request).await
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn token(Form(form): Form<LoginForm>) -> Response {
    let issued = match (form.username.as_str(), form.password.as_str()) {
        ("student1", "pass123") => Some(("t1", "student")),
        ("teacher1", "pass123") => Some(("t2", "teacher")),
        ("guest1", "pass123") => Some(("t3", "guest")),
        ("broken1", "pass123") => {
            return (StatusCode::OK, "not json").into_response();
        }
        _ => None,
    };

    match issued {
        Some((token, role)) => Json(json!({
            "access_token": token,
            "token_type": "bearer",
            "role": role,
            "username": form.username,
        }))
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect username or password"})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

const COURSES: [(i64, &str, &str); 5] = [
    (1, "Basic Mathematics", "Introduction to calculus and algebra."),
    (2, "Web Programming", "Fundamentals of HTML, CSS and JavaScript."),
    (3, "Information Security", "Cryptography, hashes and security."),
    (4, "Databases", "Relational modelling and SQL."),
    (5, "Computer Networks", "TCP/IP, DNS, protocols and infrastructure."),
];

async fn courses(Query(query): Query<SearchQuery>) -> Json<serde_json::Value> {
    let term = query.search.unwrap_or_default().to_lowercase();
    let matching: Vec<_> = COURSES
        .iter()
        .filter(|(_, name, description)| {
            term.is_empty()
                || name.to_lowercase().contains(&term)
                || description.to_lowercase().contains(&term)
        })
        .map(|(id, name, description)| json!({"id": id, "name": name, "description": description}))
        .collect();
    Json(json!(matching))
}

async fn students(State(state): State<StubState>, headers: HeaderMap) -> Response {
    role_content(&state, &headers, "t1", "Student").await
}

async fn teachers(State(state): State<StubState>, headers: HeaderMap) -> Response {
    role_content(&state, &headers, "t2", "Teacher").await
}

async fn role_content(state: &StubState, headers: &HeaderMap, token: &str, area: &str) -> Response {
    if !state.content_delay.is_zero() {
        tokio::time::sleep(state.content_delay).await;
    }

    let expected = format!("Bearer {}", token);
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match header {
        Some(value) if value == expected => Json(json!({
            "message": format!("Welcome to the {} Area", area),
            "data": format!("Exclusive {} Content", area),
        }))
        .into_response(),
        Some(_) => StatusCode::FORBIDDEN.into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}
