use abi::{DbConfig, Error, Reservation};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use booking_service::{router, AppState, Notifier, SessionStore, StaticCredentials};
use http_body_util::BodyExt;
use reservation::ReservationManager;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::time;
use tower::ServiceExt;

/// Records every attempt; optionally fails each one.
#[derive(Default)]
struct MockNotifier {
    attempts: AtomicUsize,
    fail: bool,
}

impl MockNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_confirmation(&self, _rsvp: &Reservation, _operator: &str) -> Result<(), Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(Error::NotifyError("smtp unreachable".into()))
        } else {
            Ok(())
        }
    }
}

async fn test_app(notifier: Arc<dyn Notifier>) -> Router {
    let db = DbConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
    };
    let manager = ReservationManager::from_config(&db).await.unwrap();
    router(AppState {
        manager,
        notifier,
        verifier: Arc::new(StaticCredentials::new("admin", "1234")),
        sessions: SessionStore::default(),
        operator: "operator@club.test".into(),
    })
}

fn ana() -> Value {
    json!({
        "name": "Ana",
        "email": "a@x.com",
        "date": "2024-06-01",
        "time": "10:00",
        "field": "A"
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(res: Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn create_then_conflict() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    let res = app.clone().oneshot(post_json("/api/reservations", &ana())).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["id"], 1);

    let mut rival = ana();
    rival["name"] = json!("Luis");
    rival["email"] = json!("l@x.com");
    let res = app.clone().oneshot(post_json("/api/reservations", &rival)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let message = body_text(res).await;
    assert!(message.contains("field A"));
    assert!(message.contains("10:00"));
}

#[tokio::test]
async fn create_with_missing_fields_is_rejected() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    let mut input = ana();
    input["email"] = json!("");
    let res = app.clone().oneshot(post_json("/api/reservations", &input)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("email"));

    // nothing was stored
    let res = app
        .oneshot(get("/api/occupied-times?date=2024-06-01&field=A"))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["times"], json!([]));
}

#[tokio::test]
async fn occupied_times_lists_booked_slots() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    app.clone().oneshot(post_json("/api/reservations", &ana())).await.unwrap();

    let res = app
        .clone()
        .oneshot(get("/api/occupied-times?date=2024-06-01&field=A"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["times"], json!(["10:00"]));

    let res = app
        .clone()
        .oneshot(get("/api/occupied-times?date=2024-06-01&field=B"))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["times"], json!([]));

    // both parameters are mandatory
    let res = app
        .oneshot(get("/api/occupied-times?date=2024-06-01"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notification_failure_does_not_affect_create() {
    let notifier = Arc::new(MockNotifier::failing());
    let app = test_app(notifier.clone()).await;

    let res = app.clone().oneshot(post_json("/api/reservations", &ana())).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_json(res).await["id"], 1);

    // the detached send was attempted exactly once
    time::sleep(Duration::from_millis(50)).await;
    assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);

    // and the reservation is durable
    let res = app
        .oneshot(get("/api/occupied-times?date=2024-06-01&field=A"))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["times"], json!(["10:00"]));
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    let res = app.clone().oneshot(get("/admin/reservations")).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/admin/login");

    let res = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/reservations/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=wrong"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_list_and_delete_after_login() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    app.clone().oneshot(post_json("/api/reservations", &ana())).await.unwrap();

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=1234"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let cookie = res.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let with_session = |req: Request<Body>| {
        let (mut parts, body) = req.into_parts();
        parts.headers.insert(header::COOKIE, cookie.parse().unwrap());
        Request::from_parts(parts, body)
    };

    let res = app
        .clone()
        .oneshot(with_session(get("/admin/reservations")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page = body_text(res).await;
    assert!(page.contains("Ana"));
    assert!(page.contains("10:00"));

    let delete_req = || {
        with_session(
            Request::builder()
                .method("DELETE")
                .uri("/admin/reservations/1")
                .body(Body::empty())
                .unwrap(),
        )
    };
    let res = app.clone().oneshot(delete_req()).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // second delete of the same id reports not found, never an error
    let res = app.clone().oneshot(delete_req()).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // the slot is free again
    let res = app
        .oneshot(post_json("/api/reservations", &ana()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = test_app(Arc::new(MockNotifier::default())).await;

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=1234"))
                .unwrap(),
        )
        .await
        .unwrap();
    let cookie = res.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/logout")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    // the old token no longer grants access
    let res = app
        .oneshot(
            Request::builder()
                .uri("/admin/reservations")
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/admin/login");
}
