use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use gather_db::{create_pool, DbRuntimeSettings};
use gather_server::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

const MOD_EMAIL: &str = "mods@example.org";

/// Builds a test app over a single-connection in-memory database.
fn test_app() -> Router {
    let pool = create_pool(
        ":memory:",
        DbRuntimeSettings {
            pool_max_size: 1,
            ..DbRuntimeSettings::default()
        },
    )
    .unwrap();
    let conn = pool.get().unwrap();
    gather_db::run_migrations(&conn).unwrap();
    drop(conn);

    app(AppState {
        pool,
        moderator_email: Some(MOD_EMAIL.to_string()),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/register",
            json!({"name": name, "email": email}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn draft(title: &str) -> Value {
    json!({
        "title": title,
        "description": "March downtown for justice",
        "date": "2026-10-01T18:00",
        "location": {"city": "London", "country": "United Kingdom"},
        "category": "protest",
        "sourceLink": "https://example.org/rally"
    })
}

async fn submit(app: &Router, token: &str, body: Value) -> Value {
    let (status, event) = send(app, post_json("/api/events", body, Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    event
}

async fn approve(app: &Router, mod_token: &str, event_id: &str) {
    let (status, _) = send(
        app,
        post_json(
            &format!("/api/events/{event_id}/approve"),
            json!({"verified": false}),
            Some(mod_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn feed_starts_empty() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/events", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn submission_requires_auth() {
    let app = test_app();

    let (status, _) = send(&app, post_json("/api/events", draft("Rally"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submitted_event_is_pending_and_hidden() {
    let app = test_app();
    let token = register(&app, "Ada", "ada@example.org").await;

    let event = submit(&app, &token, draft("Rally")).await;
    assert_eq!(event["status"], "pending");
    assert_eq!(event["verified"], false);

    let (_, feed) = send(&app, get("/api/events", None)).await;
    assert_eq!(feed, json!([]));
}

#[tokio::test]
async fn invalid_draft_is_rejected() {
    let app = test_app();
    let token = register(&app, "Ada", "ada@example.org").await;

    let mut bad = draft("Rally");
    bad["sourceLink"] = json!("not a url");
    let (status, body) = send(&app, post_json("/api/events", bad, Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sourceLink"));
}

#[tokio::test]
async fn single_event_visibility() {
    let app = test_app();
    let creator = register(&app, "Ada", "ada@example.org").await;
    let other = register(&app, "Bob", "bob@example.org").await;
    let mod_token = register(&app, "Mo", MOD_EMAIL).await;

    let event = submit(&app, &creator, draft("Rally")).await;
    let event_id = event["id"].as_str().unwrap();
    let uri = format!("/api/events/{event_id}");

    // Pending: hidden from anonymous and unrelated users, visible to the
    // creator and moderators.
    let (status, _) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get(&uri, Some(&other))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get(&uri, Some(&creator))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, get(&uri, Some(&mod_token))).await;
    assert_eq!(status, StatusCode::OK);

    // Approved: public.
    approve(&app, &mod_token, event_id).await;
    let (status, body) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn feed_filters_apply() {
    let app = test_app();
    let token = register(&app, "Ada", "ada@example.org").await;
    let mod_token = register(&app, "Mo", MOD_EMAIL).await;

    let mut iftar = draft("Community Iftar");
    iftar["location"] = json!({"city": "Berlin", "country": "Germany"});
    iftar["category"] = json!("cultural");

    for body in [draft("Rally for Justice"), iftar] {
        let event = submit(&app, &token, body).await;
        approve(&app, &mod_token, event["id"].as_str().unwrap()).await;
    }

    let (_, all) = send(&app, get("/api/events", None)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, by_search) = send(&app, get("/api/events?search=rally", None)).await;
    assert_eq!(by_search.as_array().unwrap().len(), 1);
    assert_eq!(by_search[0]["title"], "Rally for Justice");

    let (_, by_location) = send(&app, get("/api/events?location=berlin", None)).await;
    assert_eq!(by_location.as_array().unwrap().len(), 1);

    let (_, by_category) = send(&app, get("/api/events?category=cultural", None)).await;
    assert_eq!(by_category.as_array().unwrap().len(), 1);
    assert_eq!(by_category[0]["category"], "cultural");

    // The literal 'all' disables the category filter.
    let (_, sentinel) = send(&app, get("/api/events?category=all", None)).await;
    assert_eq!(sentinel.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn report_approved_event() {
    let app = test_app();
    let creator = register(&app, "Ada", "ada@example.org").await;
    let reporter = register(&app, "Bob", "bob@example.org").await;
    let mod_token = register(&app, "Mo", MOD_EMAIL).await;

    let event = submit(&app, &creator, draft("Rally")).await;
    let event_id = event["id"].as_str().unwrap();

    // Reporting a pending event is a state conflict.
    let (status, _) = send(
        &app,
        post_json(
            &format!("/api/events/{event_id}/report"),
            json!({"reason": "spam"}),
            Some(&reporter),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    approve(&app, &mod_token, event_id).await;

    let (status, report) = send(
        &app,
        post_json(
            &format!("/api/events/{event_id}/report"),
            json!({"reason": "wrong_info"}),
            Some(&reporter),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["eventId"], event_id);
    assert_eq!(report["reason"], "wrong_info");
}

#[tokio::test]
async fn report_requires_auth_and_known_event() {
    let app = test_app();
    let token = register(&app, "Ada", "ada@example.org").await;

    let (status, _) = send(
        &app,
        post_json("/api/events/e1/report", json!({"reason": "spam"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json(
            "/api/events/no-such-event/report",
            json!({"reason": "spam"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
