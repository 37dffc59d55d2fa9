mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use common::{body_text, MockBackend};
use portfolio_frontend::create_app;

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn project_list_renders_cards_newest_first() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/projects",
        200,
        json!([{ "_id": "p1", "title": "Alpha", "tags": ["x", "y"] }]),
    );
    let app = create_app(backend.app_state());

    let res = app.oneshot(get("/projects")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;

    assert!(html.contains("Alpha"));
    assert!(html.contains(">x<"));
    assert!(html.contains(">y<"));
    assert!(!html.contains("badge-outline"));
    assert!(html.contains("/projects/p1"));

    let seen = backend.requests_to("GET", "/projects");
    assert_eq!(seen[0].query.as_deref(), Some("sort=-createdAt"));
}

#[tokio::test]
async fn home_shows_one_error_when_a_fetch_fails() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/projects", 200, json!([{ "_id": "p1", "title": "Alpha" }]));
    backend.respond("GET", "/blogs", 500, json!({ "error": "down" }));
    let app = create_app(backend.app_state());

    let html = body_text(app.oneshot(get("/")).await.unwrap()).await;

    assert!(html.contains("Failed to fetch data"));
    assert!(!html.contains("Alpha"));
}

#[tokio::test]
async fn cached_list_is_served_without_a_second_request() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/blogs", 200, json!([{ "_id": "b1", "title": "Hello" }]));
    let app = create_app(backend.app_state());

    let first = app.clone().oneshot(get("/blog")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = body_text(app.oneshot(get("/blog")).await.unwrap()).await;

    assert!(second.contains("Hello"));
    assert_eq!(backend.requests_to("GET", "/blogs").len(), 1);
}

#[tokio::test]
async fn missing_post_renders_not_found() {
    let backend = MockBackend::start().await;
    let app = create_app(backend.app_state());

    let res = app.oneshot(get("/blog/nope")).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(backend.requests_to("GET", "/comments/blog/nope").is_empty());
}

#[tokio::test]
async fn backend_failure_on_detail_is_a_bad_gateway() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/projects/p1", 500, json!({ "error": "Database unavailable" }));
    let app = create_app(backend.app_state());

    let res = app.oneshot(get("/projects/p1")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(res).await.contains("Database unavailable"));
}

#[tokio::test]
async fn blog_detail_loads_comments_and_sanitizes_content() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/blogs/b1",
        200,
        json!({
            "_id": "b1",
            "title": "Hello",
            "content": "<p>Safe</p><script>alert(1)</script>"
        }),
    );
    backend.respond(
        "GET",
        "/comments/blog/b1",
        200,
        json!([{ "_id": "c1", "author": { "name": "Bob" }, "content": "First!", "approved": true }]),
    );
    let app = create_app(backend.app_state());

    let html = body_text(app.oneshot(get("/blog/b1")).await.unwrap()).await;

    assert!(html.contains("<p>Safe</p>"));
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("First!"));
    assert!(html.contains("Comments (1)"));
}

#[tokio::test]
async fn like_toggle_issues_visitor_cookie_and_persists() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/blogs/b1", 200, json!({ "_id": "b1", "title": "Hello" }));
    backend.respond("GET", "/comments/blog/b1", 200, json!([]));
    let app = create_app(backend.app_state());

    let res = app
        .clone()
        .oneshot(Request::post("/likes/blog/b1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let location = res.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/blog/b1?toast=Thanks%20for%20liking%21"));
    let cookie = res.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("visitor_id="));

    let html = body_text(
        app.clone()
            .oneshot(
                Request::get("/blog/b1")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("aria-pressed=\"true\""));

    let stranger = body_text(app.oneshot(get("/blog/b1")).await.unwrap()).await;
    assert!(stranger.contains("aria-pressed=\"false\""));
}

#[tokio::test]
async fn comment_post_redirects_back_with_toast() {
    let backend = MockBackend::start().await;
    backend.respond(
        "POST",
        "/comments/blog/b1",
        201,
        json!({ "_id": "c9", "author": { "name": "Ann" }, "content": "Nice", "approved": false }),
    );
    backend.respond("GET", "/comments/blog/b1", 200, json!([]));
    let app = create_app(backend.app_state());

    let res = app
        .oneshot(form_post(
            "/comments/blog/b1",
            "name=Ann&email=&content=Nice&parent_id=",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(res.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .starts_with("/blog/b1?toast=Comment%20added"));
    assert_eq!(backend.requests_to("POST", "/comments/blog/b1").len(), 1);
}

#[tokio::test]
async fn invalid_contact_form_is_re_rendered() {
    let backend = MockBackend::start().await;
    let app = create_app(backend.app_state());

    let res = app
        .oneshot(form_post(
            "/contact",
            "name=Ann&email=ann%40site.dev&subject=&message=Hello",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(res).await;
    assert!(html.contains("Please fill in all required fields"));
    assert!(html.contains("ann@site.dev"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn subscribe_stays_on_site() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/subscribers", 201, json!({}));
    let app = create_app(backend.app_state());

    let res = app
        .oneshot(form_post(
            "/subscribe",
            "email=a%40x.io&return_to=https%3A%2F%2Fevil.example",
        ))
        .await
        .unwrap();

    let location = res.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/?toast="));
    assert_eq!(
        backend.requests_to("POST", "/subscribers")[0].json(),
        json!({ "email": "a@x.io" })
    );
}
