mod common;

use serde_json::json;

use common::MockBackend;
use portfolio_frontend::api::Session;
use portfolio_frontend::models::{BlogPost, Subscriber};
use portfolio_frontend::views::{EmptyState, ListView, Notifier};

fn blogs() -> serde_json::Value {
    json!([
        { "_id": "b1", "title": "First steps with Rust", "tags": ["rust"], "published": true },
        { "_id": "b2", "title": "Async in practice", "tags": ["tokio"], "published": false }
    ])
}

#[tokio::test]
async fn delete_removes_item_only_after_server_ack() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/blogs", 200, blogs());
    backend.respond("DELETE", "/blogs/b1", 200, json!({ "success": true }));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();

    let mut view = ListView::<BlogPost>::new();
    view.load(&client, &mut notifier).await;
    assert_eq!(view.items().len(), 2);
    assert!(backend.requests_to("GET", "/blogs")[0].authorization.is_some());

    assert!(view.request_delete("b1"));
    assert!(backend.requests_to("DELETE", "/blogs/b1").is_empty());

    assert!(view.confirm(&client, &mut notifier).await);
    assert!(view.find("b1").is_none());
    assert_eq!(notifier.last().unwrap().title.as_deref(), Some("Blog Deleted"));

    view.search("first");
    assert!(view.visible().is_empty());
    assert_eq!(view.empty_state(), Some(EmptyState::NoResults));
}

#[tokio::test]
async fn failed_toggle_leaves_flag_unchanged() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/blogs", 200, blogs());
    backend.respond("PUT", "/blogs/b2", 500, json!({ "error": "Database unavailable" }));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();

    let mut view = ListView::<BlogPost>::new();
    view.load(&client, &mut notifier).await;
    assert!(view.request_toggle("b2"));
    assert!(!view.confirm(&client, &mut notifier).await);

    assert!(!view.find("b2").unwrap().published);
    assert!(view.pending().is_none());
    let toast = notifier.last().unwrap();
    assert!(toast.is_error());
    assert_eq!(toast.description, "Database unavailable");

    let put = &backend.requests_to("PUT", "/blogs/b2")[0];
    assert_eq!(put.json(), json!({ "published": true }));
}

#[tokio::test]
async fn cancel_sends_nothing() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/blogs", 200, blogs());
    let client = backend.client();
    let mut notifier = Notifier::new();

    let mut view = ListView::<BlogPost>::new();
    view.load(&client, &mut notifier).await;
    view.request_delete("b2");
    view.cancel();

    assert!(!view.confirm(&client, &mut notifier).await);
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(view.items().len(), 2);
}

#[tokio::test]
async fn subscriber_toggle_uses_distinct_routes() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/subscribers",
        200,
        json!([
            { "_id": "s1", "email": "a@x.io", "active": true },
            { "_id": "s2", "email": "b@x.io", "active": false }
        ]),
    );
    backend.respond("DELETE", "/subscribers/a%40x.io", 200, json!({}));
    backend.respond("PUT", "/subscribers/activate/s2", 200, json!({}));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();

    let mut view = ListView::<Subscriber>::new();
    view.load(&client, &mut notifier).await;

    view.request_toggle("s1");
    assert!(view.confirm(&client, &mut notifier).await);
    view.request_toggle("s2");
    assert!(view.confirm(&client, &mut notifier).await);

    assert!(!view.find("s1").unwrap().active);
    assert!(view.find("s2").unwrap().active);
    assert_eq!(backend.requests_to("DELETE", "/subscribers/a%40x.io").len(), 1);
    assert_eq!(backend.requests_to("PUT", "/subscribers/activate/s2").len(), 1);
}

#[tokio::test]
async fn failed_load_leaves_list_empty_with_toast() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/blogs", 500, json!({ "error": "down" }));
    let mut notifier = Notifier::new();

    let mut view = ListView::<BlogPost>::new();
    view.load(&backend.client(), &mut notifier).await;

    assert!(view.items().is_empty());
    assert!(!view.is_loading());
    assert!(notifier.has_errors());
    assert_eq!(view.empty_state(), Some(EmptyState::Nothing));
}
