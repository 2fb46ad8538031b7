//! Integration tests for the REST API.
//!
//! The full router runs against the in-memory store with a real JWT token
//! service, driven request by request through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use campus::adapters::auth::{CurrentUserValidator, JwtTokenService};
use campus::adapters::http::{api_router, AppState, CookieSettings};
use campus::adapters::memory::InMemoryStore;
use campus::domain::foundation::{AuthError, InstituteId, Role};
use campus::domain::user::User;
use campus::ports::{PasswordHasher, UserRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

const PASSWORD: &str = "correct horse battery";

/// Reversible hasher; argon2 is exercised by its own adapter tests.
struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain${}", password))
    }
}

struct TestApp {
    router: Router,
    institute: InstituteId,
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestApp {
    /// App with one ADMIN account, `admin@campus.test`.
    async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let institute = InstituteId::new();
        let admin = User::new(
            institute,
            "admin@campus.test",
            "Ada",
            "Admin",
            PlainHasher.hash(PASSWORD).unwrap(),
            Role::Admin,
        )
        .unwrap();
        UserRepository::create(store.as_ref(), &admin, None).await.unwrap();

        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::new("integration-secret-that-is-long-enough".to_string()),
            "campus",
            3600,
        ));
        let sessions = Arc::new(CurrentUserValidator::new(tokens.clone(), store.clone()));
        let state = AppState::from_store(
            store,
            Arc::new(PlainHasher),
            tokens,
            sessions,
            CookieSettings { secure: false },
        );

        Self {
            router: api_router(state),
            institute,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply { status, headers, body }
    }

    async fn login(&self, email: &str) -> String {
        let reply = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
        reply.body["token"].as_str().unwrap().to_string()
    }

    /// Creates a user as `token` and returns its id.
    async fn create_user(&self, token: &str, first_name: &str, role: &str) -> String {
        let reply = self
            .send(
                Method::POST,
                "/api/users",
                Some(token),
                Some(json!({
                    "institute_id": self.institute,
                    "email": format!("{}@campus.test", first_name.to_lowercase()),
                    "first_name": first_name,
                    "last_name": "Tester",
                    "password": PASSWORD,
                    "role": role,
                })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "create failed: {}", reply.body);
        reply.body["id"].as_str().unwrap().to_string()
    }
}

fn kolb_fixture() -> Vec<Vec<u8>> {
    let mut rows = vec![vec![4, 2, 3, 1]; 12];
    rows[9] = vec![3, 2, 4, 1];
    rows[11] = vec![1, 2, 3, 4];
    rows
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new().await;
    let reply = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}

#[tokio::test]
async fn login_sets_http_only_cookie() {
    let app = TestApp::new().await;
    let reply = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADMIN@campus.test", "password": PASSWORD })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["role"], "ADMIN");
    assert!(reply.body["user"].get("password_hash").is_none());
    let cookie = reply.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=3600"));
}

#[tokio::test]
async fn cookie_authenticates_me() {
    let app = TestApp::new().await;
    let token = app.login("admin@campus.test").await;

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("access_token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_alike() {
    let app = TestApp::new().await;
    for email in ["admin@campus.test", "nobody@campus.test"] {
        let reply = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": "wrong password" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["code"], "INVALID_CREDENTIALS");
    }
}

#[tokio::test]
async fn protected_routes_reject_missing_or_forged_tokens() {
    let app = TestApp::new().await;

    let missing = app.send(Method::GET, "/api/users", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["code"], "UNAUTHENTICATED");

    let forged = app.send(Method::GET, "/api/users", Some("not-a-jwt"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn logout_expires_cookie() {
    let app = TestApp::new().await;
    let reply = app.send(Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    let cookie = reply.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

// =============================================================================
// Users and roles
// =============================================================================

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    app.create_user(&admin, "Sam", "STUDENT").await;

    let reply = app
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "institute_id": app.institute,
                "email": "SAM@campus.test",
                "first_name": "Sam",
                "last_name": "Again",
                "password": PASSWORD,
                "role": "STUDENT",
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn students_cannot_create_users() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    app.create_user(&admin, "Sam", "STUDENT").await;
    let student = app.login("sam@campus.test").await;

    let reply = app
        .send(
            Method::POST,
            "/api/users",
            Some(&student),
            Some(json!({
                "email": "eve@campus.test",
                "first_name": "Eve",
                "last_name": "Tester",
                "password": PASSWORD,
                "role": "STUDENT",
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn transition_outside_table_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    let director = app.create_user(&admin, "Dora", "DIRECTOR").await;

    let reply = app
        .send(
            Method::PATCH,
            &format!("/api/users/{}/role", director),
            Some(&admin),
            Some(json!({ "role": "STUDENT" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "INVALID_TRANSITION");

    let unchanged = app.send(Method::GET, &format!("/api/users/{}", director), Some(&admin), None).await;
    assert_eq!(unchanged.body["role"], "DIRECTOR");
    assert_eq!(unchanged.body["record"]["kind"], "DIRECTOR");
}

// =============================================================================
// Courses, Kolb test and surveys
// =============================================================================

#[tokio::test]
async fn course_lifecycle_through_promotion() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    app.create_user(&admin, "Tom", "TEACHER").await;
    let student_id = app.create_user(&admin, "Sam", "STUDENT").await;
    let teacher = app.login("tom@campus.test").await;
    let student = app.login("sam@campus.test").await;

    // Teacher builds a course with one visible and one scheduled content.
    let course = app
        .send(
            Method::POST,
            "/api/courses",
            Some(&teacher),
            Some(json!({ "name": "Algebra", "description": "Linear equations" })),
        )
        .await;
    assert_eq!(course.status, StatusCode::CREATED);
    let course_id = course.body["id"].as_str().unwrap().to_string();

    let section = app
        .send(
            Method::POST,
            &format!("/api/courses/{}/sections", course_id),
            Some(&teacher),
            Some(json!({ "title": "Week 1" })),
        )
        .await;
    assert_eq!(section.status, StatusCode::CREATED);
    let section_id = section.body["id"].as_str().unwrap().to_string();

    let contents_uri = format!("/api/courses/{}/sections/{}/contents", course_id, section_id);
    let now = app
        .send(
            Method::POST,
            &contents_uri,
            Some(&teacher),
            Some(json!({ "title": "Intro", "kind": "TEXT", "body": "Welcome" })),
        )
        .await;
    assert_eq!(now.status, StatusCode::CREATED);
    assert_eq!(now.body["visible"], true);

    let later = app
        .send(
            Method::POST,
            &contents_uri,
            Some(&teacher),
            Some(json!({
                "title": "Exam",
                "kind": "TEXT",
                "body": "Questions",
                "visible_from": "2999-01-01T00:00:00Z",
            })),
        )
        .await;
    assert_eq!(later.body["visible"], false);

    // Enrollment is idempotent.
    let members_uri = format!("/api/courses/{}/members", course_id);
    let enroll = json!({ "student_id": student_id });
    let first = app.send(Method::POST, &members_uri, Some(&teacher), Some(enroll.clone())).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = app.send(Method::POST, &members_uri, Some(&teacher), Some(enroll)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["enrolled"], false);

    let me = app.send(Method::GET, "/api/auth/me", Some(&student), None).await;
    assert_eq!(me.body["record"]["courses"][0]["id"], course_id.as_str());

    // The student sees only the visible content.
    let course_uri = format!("/api/courses/{}", course_id);
    let student_view = app.send(Method::GET, &course_uri, Some(&student), None).await;
    assert_eq!(student_view.status, StatusCode::OK);
    assert_eq!(student_view.body["sections"][0]["contents"].as_array().unwrap().len(), 1);

    // Kolb test and survey.
    let kolb = app
        .send(Method::POST, "/api/kolb", Some(&student), Some(json!({ "answers": kolb_fixture() })))
        .await;
    assert_eq!(kolb.status, StatusCode::OK);
    assert_eq!(kolb.body["profile"], "DIVERGENT");

    let result = app
        .send(Method::GET, &format!("/api/kolb/{}", student_id), Some(&teacher), None)
        .await;
    assert_eq!(result.status, StatusCode::OK);
    assert_eq!(result.body["scores"]["ec"], 44);

    let survey_uri = format!("/api/courses/{}/survey", course_id);
    let answer = app
        .send(Method::POST, &survey_uri, Some(&student), Some(json!({ "rating": 4, "comment": "Clear" })))
        .await;
    assert_eq!(answer.status, StatusCode::OK);
    let summary = app.send(Method::GET, &survey_uri, Some(&teacher), None).await;
    assert_eq!(summary.body["responses"], 1);
    assert_eq!(summary.body["distribution"], json!([0, 0, 0, 1, 0]));

    // Promotion to TEACHER drops the student from the member list.
    let promoted = app
        .send(
            Method::PATCH,
            &format!("/api/users/{}/role", student_id),
            Some(&admin),
            Some(json!({ "role": "TEACHER" })),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["role"], "TEACHER");

    let after = app.send(Method::GET, &course_uri, Some(&teacher), None).await;
    assert_eq!(after.body["members"], json!([]));
    let record = app
        .send(Method::GET, &format!("/api/users/{}", student_id), Some(&admin), None)
        .await;
    assert_eq!(record.body["record"]["kind"], "TEACHER");
    assert_eq!(record.body["record"]["courses"], json!([]));
}

#[tokio::test]
async fn malformed_kolb_matrix_is_a_bad_request() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    app.create_user(&admin, "Sam", "STUDENT").await;
    let student = app.login("sam@campus.test").await;

    let mut rows = kolb_fixture();
    rows[0] = vec![4, 4, 1, 1];
    let reply = app
        .send(Method::POST, "/api/kolb", Some(&student), Some(json!({ "answers": rows })))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn deleting_teacher_removes_owned_courses() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    let teacher_id = app.create_user(&admin, "Tom", "TEACHER").await;
    let teacher = app.login("tom@campus.test").await;
    let course = app
        .send(Method::POST, "/api/courses", Some(&teacher), Some(json!({ "name": "Physics" })))
        .await;
    let course_uri = format!("/api/courses/{}", course.body["id"].as_str().unwrap());

    let deleted = app
        .send(Method::DELETE, &format!("/api/users/{}", teacher_id), Some(&admin), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.send(Method::GET, &course_uri, Some(&admin), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["code"], "COURSE_NOT_FOUND");
}

#[tokio::test]
async fn existing_tokens_follow_role_changes_and_deletion() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    let teacher_id = app.create_user(&admin, "Tom", "TEACHER").await;
    let student_id = app.create_user(&admin, "Sam", "STUDENT").await;
    let teacher = app.login("tom@campus.test").await;
    let student = app.login("sam@campus.test").await;

    let kolb = app
        .send(Method::POST, "/api/kolb", Some(&student), Some(json!({ "answers": kolb_fixture() })))
        .await;
    assert_eq!(kolb.status, StatusCode::OK);
    let result_uri = format!("/api/kolb/{}", student_id);
    let allowed = app.send(Method::GET, &result_uri, Some(&teacher), None).await;
    assert_eq!(allowed.status, StatusCode::OK);

    let demoted = app
        .send(
            Method::PATCH,
            &format!("/api/users/{}/role", teacher_id),
            Some(&admin),
            Some(json!({ "role": "STUDENT" })),
        )
        .await;
    assert_eq!(demoted.status, StatusCode::OK);

    // Same token, now answered with the stored STUDENT role.
    let denied = app.send(Method::GET, &result_uri, Some(&teacher), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    let me = app.send(Method::GET, "/api/auth/me", Some(&teacher), None).await;
    assert_eq!(me.body["role"], "STUDENT");

    let deleted = app
        .send(Method::DELETE, &format!("/api/users/{}", teacher_id), Some(&admin), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = app.send(Method::GET, "/api/auth/me", Some(&teacher), None).await;
    assert_eq!(gone.status, StatusCode::UNAUTHORIZED);
    assert_eq!(gone.body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn promoted_student_loses_kolb_result() {
    let app = TestApp::new().await;
    let admin = app.login("admin@campus.test").await;
    let student_id = app.create_user(&admin, "Sam", "STUDENT").await;
    let student = app.login("sam@campus.test").await;
    app.send(Method::POST, "/api/kolb", Some(&student), Some(json!({ "answers": kolb_fixture() })))
        .await;

    let role_uri = format!("/api/users/{}/role", student_id);
    for role in ["TEACHER", "STUDENT"] {
        let reply = app.send(Method::PATCH, &role_uri, Some(&admin), Some(json!({ "role": role }))).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    let result = app
        .send(Method::GET, &format!("/api/kolb/{}", student_id), Some(&admin), None)
        .await;
    assert_eq!(result.status, StatusCode::NOT_FOUND);
    assert_eq!(result.body["code"], "RESULT_NOT_FOUND");
}
