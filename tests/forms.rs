mod common;

use serde_json::json;

use common::{MockBackend, PNG};
use portfolio_frontend::api::{ImageFile, Session};
use portfolio_frontend::views::{BlogEditor, BlogForm, Notifier, ProjectEditor};

fn complete_blog() -> BlogForm {
    BlogForm {
        title: "Hello".to_string(),
        excerpt: "Short".to_string(),
        content: "<p>Body</p>".to_string(),
        tags: vec!["rust".to_string()],
        image: "https://cdn.test/a.png".to_string(),
        published: false,
    }
}

#[tokio::test]
async fn missing_tags_blocks_submit() {
    let backend = MockBackend::start().await;
    let mut notifier = Notifier::new();
    let mut editor = BlogEditor {
        form: BlogForm {
            tags: Vec::new(),
            ..complete_blog()
        },
        editing: None,
    };

    assert!(!editor.submit(&backend.client(), &mut notifier).await);

    let toast = notifier.last().unwrap();
    assert_eq!(toast.title.as_deref(), Some("Missing Tags"));
    assert_eq!(toast.description, "Please add at least one tag");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn new_blog_is_posted() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/blogs", 201, json!({ "_id": "b1", "title": "Hello" }));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();
    let mut editor = BlogEditor {
        form: complete_blog(),
        editing: None,
    };

    assert!(editor.submit(&client, &mut notifier).await);

    let posted = &backend.requests_to("POST", "/blogs")[0];
    assert_eq!(posted.json()["title"], "Hello");
    assert_eq!(posted.json()["tags"], json!(["rust"]));
    assert_eq!(posted.authorization.as_deref(), Some("Bearer t"));
    assert_eq!(notifier.last().unwrap().title.as_deref(), Some("Blog Created"));
}

#[tokio::test]
async fn editing_blog_is_put() {
    let backend = MockBackend::start().await;
    backend.respond(
        "GET",
        "/blogs/b1",
        200,
        json!({
            "_id": "b1",
            "title": "Hello",
            "excerpt": "Short",
            "content": "<p>Body</p>",
            "tags": ["rust"],
            "image": "https://cdn.test/a.png",
            "published": true
        }),
    );
    backend.respond("PUT", "/blogs/b1", 200, json!({}));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();

    let mut editor = BlogEditor::load(&client, "b1").await.unwrap();
    assert!(editor.is_editing());
    assert!(editor.add_tag("axum"));
    assert!(!editor.add_tag(" rust "));
    assert!(editor.submit(&client, &mut notifier).await);

    let put = &backend.requests_to("PUT", "/blogs/b1")[0];
    assert_eq!(put.json()["tags"], json!(["rust", "axum"]));
    assert_eq!(put.json()["published"], true);
    assert!(backend.requests_to("POST", "/blogs").is_empty());
    assert_eq!(notifier.last().unwrap().title.as_deref(), Some("Blog Updated"));
}

#[tokio::test]
async fn blog_image_upload_fills_the_form() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/upload", 200, json!({ "url": "https://cdn.test/up.png" }));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();
    let mut editor = BlogEditor::new();

    assert!(
        editor
            .upload_image(&client, ImageFile::new("cover.png", PNG.to_vec()), &mut notifier)
            .await
    );
    assert_eq!(editor.form.image, "https://cdn.test/up.png");
}

#[tokio::test]
async fn project_is_posted_with_versions() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/projects", 201, json!({ "_id": "p1", "title": "Alpha" }));
    let client = backend.client().with_session(Session::with_token("t"));
    let mut notifier = Notifier::new();

    let mut editor = ProjectEditor::new();
    editor.form.title = "Alpha".to_string();
    editor.form.description = "Short".to_string();
    editor.form.long_description = "Longer".to_string();
    editor.form.image = "https://cdn.test/p.png".to_string();
    editor.form.demo_url = "https://alpha.test".to_string();
    editor.form.repo_url = "https://git.test/alpha".to_string();
    editor.add_tag("rust");
    editor.add_feature("Fast");
    editor.add_version();
    editor.add_version_feature("Dark mode");

    assert!(editor.submit(&client, &mut notifier).await);

    let body = backend.requests_to("POST", "/projects")[0].json();
    assert_eq!(body["title"], "Alpha");
    assert_eq!(body["longDescription"], "Longer");
    assert_eq!(body["versions"].as_array().unwrap().len(), 2);
    assert_eq!(body["versions"][1]["version"], "v2.0");
    assert_eq!(body["versions"][1]["features"], json!(["Dark mode"]));
    assert_eq!(notifier.last().unwrap().title.as_deref(), Some("Project Created"));
}

#[tokio::test]
async fn project_without_urls_is_not_sent() {
    let backend = MockBackend::start().await;
    let mut notifier = Notifier::new();

    let mut editor = ProjectEditor::new();
    editor.form.title = "Alpha".to_string();
    editor.form.description = "Short".to_string();
    editor.form.long_description = "Longer".to_string();
    editor.form.image = "https://cdn.test/p.png".to_string();
    editor.add_tag("rust");

    assert!(!editor.submit(&backend.client(), &mut notifier).await);
    assert_eq!(notifier.last().unwrap().title.as_deref(), Some("Missing URLs"));
    assert!(backend.requests().is_empty());
}
