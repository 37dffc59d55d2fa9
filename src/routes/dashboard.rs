//! Admin dashboard: route guard, login, resource lists with confirmation
//! dialogs, editors and message detail.

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{page, redirect_with, toasts_from_query, visitor, AppState, VISITOR_COOKIE};
use crate::api::{upload_image, ApiClient, ImageFile, Session};
use crate::models::{MediaType, User};
use crate::render::dashboard::{self as render, TableRow};
use crate::views::blog_form::BlogEditor;
use crate::views::list::{ListView, StatusFilter};
use crate::views::message::{MessageDetail, MESSAGES_PATH};
use crate::views::notify::{Notifier, Toast};
use crate::views::overview;
use crate::views::project_form::ProjectEditor;
use crate::views::shell::{self, ShellState, DASHBOARD_PATH, LOGIN_PATH};

/// The authenticated caller, attached by [`guard`].
#[derive(Debug, Clone)]
pub struct Admin {
    pub client: ApiClient,
    pub user: User,
}

impl Admin {
    fn name(&self) -> &str {
        self.user.display_name()
    }
}

fn session_for(state: &AppState, jar: &CookieJar) -> Session {
    match jar.get(VISITOR_COOKIE) {
        Some(cookie) => Session::restore(&state.visitor_store(cookie.value())),
        None => Session::anonymous(),
    }
}

/// Runs the shell check on every dashboard navigation.
pub async fn guard(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let client = state.client.with_session(session_for(&state, &jar));
    let mut notifier = Notifier::new();
    let path = request.uri().path().to_string();

    match shell::check(&path, &client, &mut notifier).await {
        ShellState::Public => next.run(request).await,
        ShellState::Authenticated(user) => {
            request.extensions_mut().insert(Admin { client, user });
            next.run(request).await
        }
        ShellState::Redirect { to } => redirect_with(&to, notifier.toasts()).into_response(),
    }
}

// ============================================================================
// Login / logout
// ============================================================================

pub async fn login_page(Query(params): Query<HashMap<String, String>>) -> Response {
    page(render::login_page("", &toasts_from_query(&params)))
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Response {
    let mut notifier = Notifier::new();
    let session = shell::login(
        &state.client,
        &credentials.email,
        &credentials.password,
        &mut notifier,
    )
    .await;

    let Some(token) = session.as_ref().and_then(Session::token) else {
        return (
            StatusCode::UNAUTHORIZED,
            page(render::login_page(&credentials.email, notifier.toasts())),
        )
            .into_response();
    };

    let (jar, visitor_id) = visitor(jar, state.config.is_production());
    if let Err(e) = Session::login(token, &state.visitor_store(&visitor_id)).await {
        tracing::error!(error = %e, "failed to persist session");
        notifier.error("Error", "Could not start your session. Please try again.");
        return page(render::login_page(&credentials.email, notifier.toasts()));
    }

    (jar, redirect_with(DASHBOARD_PATH, notifier.toasts())).into_response()
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
    jar: CookieJar,
) -> Response {
    let mut notifier = Notifier::new();
    if !shell::logout(&admin.client, &mut notifier).await {
        return redirect_with(DASHBOARD_PATH, notifier.toasts()).into_response();
    }

    if let Some(cookie) = jar.get(VISITOR_COOKIE) {
        let mut session = admin.client.session().clone();
        if let Err(e) = session.logout(&state.visitor_store(cookie.value())).await {
            tracing::error!(error = %e, "failed to clear session");
        }
    }
    redirect_with(LOGIN_PATH, notifier.toasts()).into_response()
}

// ============================================================================
// Overview
// ============================================================================

pub async fn overview_page(
    Extension(admin): Extension<Admin>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut notifier = Notifier::new();
    for toast in toasts_from_query(&params) {
        notifier.push(toast);
    }
    let stats = overview::load(&admin.client, &mut notifier).await;
    page(render::overview_page(stats.as_ref(), admin.name(), notifier.toasts()))
}

// ============================================================================
// Lists & confirmation
// ============================================================================

fn list_path<R: TableRow>() -> String {
    format!("{}/{}", DASHBOARD_PATH, R::KIND.slug())
}

/// Loads the collection, reporting a failure alongside any carried toast.
async fn loaded<R: TableRow>(admin: &Admin, notifier: &mut Notifier) -> ListView<R> {
    let mut view = ListView::<R>::new();
    view.load(&admin.client, notifier).await;
    view
}

pub async fn list<R: TableRow>(
    Extension(admin): Extension<Admin>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut notifier = Notifier::new();
    for toast in toasts_from_query(&params) {
        notifier.push(toast);
    }
    let mut view = loaded::<R>(&admin, &mut notifier).await;
    if let Some(q) = params.get("q") {
        view.search(q);
    }
    if let Some(status) = params.get("status") {
        view.set_status_filter(StatusFilter::parse(status));
    }
    page(render::list_page(&view, admin.name(), notifier.toasts()))
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Delete,
    Toggle,
}

async fn pending<R: TableRow>(
    admin: &Admin,
    id: &str,
    action: Action,
    notifier: &mut Notifier,
) -> Option<ListView<R>> {
    let mut view = loaded::<R>(admin, notifier).await;
    let opened = match action {
        Action::Delete => view.request_delete(id),
        Action::Toggle => view.request_toggle(id),
    };
    if !opened && !notifier.has_errors() {
        notifier.error("Error", format!("{} not found", R::KIND.label()));
    }
    opened.then_some(view)
}

async fn show_dialog<R: TableRow>(admin: &Admin, id: &str, action: Action) -> Response {
    let mut notifier = Notifier::new();
    match pending::<R>(admin, id, action, &mut notifier).await {
        Some(view) => page(render::confirm_page(&view, admin.name(), notifier.toasts())),
        None => redirect_with(&list_path::<R>(), notifier.toasts()).into_response(),
    }
}

async fn run_action<R: TableRow>(state: &AppState, admin: &Admin, id: &str, action: Action) -> Response {
    let mut notifier = Notifier::new();
    if let Some(mut view) = pending::<R>(admin, id, action, &mut notifier).await {
        if view.confirm(&admin.client, &mut notifier).await {
            state.cache.invalidate_all().await;
        }
    }
    redirect_with(&list_path::<R>(), notifier.toasts()).into_response()
}

pub async fn confirm_delete<R: TableRow>(
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
) -> Response {
    show_dialog::<R>(&admin, &id, Action::Delete).await
}

pub async fn delete<R: TableRow>(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
) -> Response {
    run_action::<R>(&state, &admin, &id, Action::Delete).await
}

pub async fn confirm_toggle<R: TableRow>(
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
) -> Response {
    show_dialog::<R>(&admin, &id, Action::Toggle).await
}

pub async fn toggle<R: TableRow>(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
) -> Response {
    run_action::<R>(&state, &admin, &id, Action::Toggle).await
}

// ============================================================================
// Multipart editor forms
// ============================================================================

/// Text inputs and uploaded files of one editor post.
#[derive(Debug, Default)]
struct EditorPost {
    text: HashMap<String, String>,
    files: HashMap<String, ImageFile>,
}

impl EditorPost {
    async fn read(mut multipart: Multipart) -> Result<Self, String> {
        let mut post = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(|e| e.to_string())?;
            match file_name {
                Some(file_name) if !file_name.is_empty() => {
                    if !bytes.is_empty() {
                        post.files.insert(name, ImageFile::new(file_name, bytes.to_vec()));
                    }
                }
                _ => {
                    post.text
                        .insert(name, String::from_utf8_lossy(&bytes).into_owned());
                }
            }
        }
        Ok(post)
    }

    fn get(&self, key: &str) -> &str {
        self.text.get(key).map(String::as_str).unwrap_or("")
    }

    fn set(&self, key: &str, target: &mut String) {
        if let Some(value) = self.text.get(key) {
            *target = value.clone();
        }
    }

    fn checked(&self, key: &str) -> bool {
        self.text.contains_key(key)
    }

    /// `("remove_tag", Some("rust"))` for `remove_tag:rust`.
    fn action(&self) -> (&str, Option<&str>) {
        let action = self.get("action");
        match action.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (action, None),
        }
    }

    fn state<T: serde::de::DeserializeOwned + Default>(&self) -> T {
        serde_json::from_str(self.get("state")).unwrap_or_default()
    }

    fn take_file(&mut self, key: &str, notifier: &mut Notifier) -> Option<ImageFile> {
        let file = self.files.remove(key);
        if file.is_none() {
            notifier.error("Upload Failed", "Please choose an image to upload");
        }
        file
    }
}

fn index(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.parse().ok())
}

pub async fn new_blog(Extension(admin): Extension<Admin>) -> Response {
    page(render::blog_editor_page(&BlogEditor::new(), admin.name(), &[]))
}

pub async fn edit_blog(Extension(admin): Extension<Admin>, Path(id): Path<String>) -> Response {
    match BlogEditor::load(&admin.client, &id).await {
        Ok(editor) => page(render::blog_editor_page(&editor, admin.name(), &[])),
        Err(e) => {
            let mut notifier = Notifier::new();
            notifier.error("Error", e.to_string());
            redirect_with(&list_path::<crate::models::BlogPost>(), notifier.toasts()).into_response()
        }
    }
}

pub async fn save_new_blog(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
    multipart: Multipart,
) -> Response {
    blog_form(&state, &admin, None, multipart).await
}

pub async fn save_blog(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    blog_form(&state, &admin, Some(id), multipart).await
}

async fn blog_form(
    state: &AppState,
    admin: &Admin,
    editing: Option<String>,
    multipart: Multipart,
) -> Response {
    let mut notifier = Notifier::new();
    let mut post = match EditorPost::read(multipart).await {
        Ok(post) => post,
        Err(e) => return bad_form(&list_path::<crate::models::BlogPost>(), e),
    };

    let mut editor: BlogEditor = post.state();
    editor.editing = editing;
    post.set("title", &mut editor.form.title);
    post.set("excerpt", &mut editor.form.excerpt);
    post.set("content", &mut editor.form.content);
    post.set("image", &mut editor.form.image);
    editor.form.published = post.checked("published");

    let (action, value) = post.action();
    let (action, value) = (action.to_string(), value.map(str::to_string));
    match (action.as_str(), value.as_deref()) {
        ("add_tag", _) => {
            editor.add_tag(post.get("tag_input"));
        }
        ("remove_tag", Some(tag)) => editor.remove_tag(tag),
        ("upload_image", _) => {
            if let Some(file) = post.take_file("image_file", &mut notifier) {
                editor.upload_image(&admin.client, file, &mut notifier).await;
            }
        }
        ("submit", _) => {
            if editor.submit(&admin.client, &mut notifier).await {
                state.cache.invalidate_all().await;
                return redirect_with(&list_path::<crate::models::BlogPost>(), notifier.toasts())
                    .into_response();
            }
        }
        _ => {}
    }

    page(render::blog_editor_page(&editor, admin.name(), notifier.toasts()))
}

pub async fn new_project(Extension(admin): Extension<Admin>) -> Response {
    page(render::project_editor_page(&ProjectEditor::new(), admin.name(), &[]))
}

pub async fn save_new_project(
    State(state): State<AppState>,
    Extension(admin): Extension<Admin>,
    multipart: Multipart,
) -> Response {
    let mut notifier = Notifier::new();
    let mut post = match EditorPost::read(multipart).await {
        Ok(post) => post,
        Err(e) => return bad_form(&list_path::<crate::models::Project>(), e),
    };

    let mut editor = post.state::<ProjectEditor>().normalized();
    let form = &mut editor.form;
    post.set("title", &mut form.title);
    post.set("description", &mut form.description);
    post.set("long_description", &mut form.long_description);
    post.set("demo_url", &mut form.demo_url);
    post.set("repo_url", &mut form.repo_url);
    post.set("image", &mut form.image);
    form.published = post.checked("published");

    let version = editor.active_version_mut();
    post.set("version_label", &mut version.version);
    post.set("version_date", &mut version.date);
    post.set("version_notes", &mut version.notes);
    post.set("version_description", &mut version.description);

    let (action, value) = post.action();
    let (action, value) = (action.to_string(), value.map(str::to_string));
    match (action.as_str(), value.as_deref()) {
        ("add_tag", _) => {
            editor.add_tag(post.get("tag_input"));
        }
        ("remove_tag", Some(v)) => editor.remove_tag(v),
        ("add_feature", _) => {
            editor.add_feature(post.get("feature_input"));
        }
        ("remove_feature", Some(v)) => editor.remove_feature(v),
        ("add_challenge", _) => {
            editor.add_challenge(post.get("challenge_input"));
        }
        ("remove_challenge", Some(v)) => editor.remove_challenge(v),
        ("add_solution", _) => {
            editor.add_solution(post.get("solution_input"));
        }
        ("remove_solution", Some(v)) => editor.remove_solution(v),
        ("add_version_feature", _) => {
            editor.add_version_feature(post.get("version_feature_input"));
        }
        ("remove_version_feature", Some(v)) => editor.remove_version_feature(v),
        ("add_version_change", _) => {
            editor.add_version_change(post.get("version_change_input"));
        }
        ("remove_version_change", Some(v)) => editor.remove_version_change(v),
        ("add_media", _) => {
            let media_type = match post.get("media_type") {
                "video" => MediaType::Video,
                _ => MediaType::Image,
            };
            editor.add_media(
                media_type,
                post.get("media_url"),
                post.get("media_caption"),
                &mut notifier,
            );
        }
        ("remove_media", v) => {
            if let Some(i) = index(v) {
                editor.remove_media(i);
            }
        }
        ("remove_screenshot", v) => {
            if let Some(i) = index(v) {
                editor.remove_screenshot(i);
            }
        }
        ("add_version", _) => editor.add_version(),
        ("remove_version", v) => {
            if let Some(i) = index(v) {
                editor.remove_version(i, &mut notifier);
            }
        }
        ("set_active", v) => {
            if let Some(i) = index(v) {
                editor.set_active(i);
            }
        }
        ("upload_image", _) => {
            if let Some(file) = post.take_file("image_file", &mut notifier) {
                editor.upload_image(&admin.client, file, &mut notifier).await;
            }
        }
        ("upload_screenshot", _) => {
            if let Some(file) = post.take_file("screenshot_file", &mut notifier) {
                editor.upload_screenshot(&admin.client, file, &mut notifier).await;
            }
        }
        ("submit", _) => {
            if editor.submit(&admin.client, &mut notifier).await {
                state.cache.invalidate_all().await;
                return redirect_with(&list_path::<crate::models::Project>(), notifier.toasts())
                    .into_response();
            }
        }
        _ => {}
    }

    page(render::project_editor_page(&editor, admin.name(), notifier.toasts()))
}

fn bad_form(back: &str, error: String) -> Response {
    tracing::warn!(error = %error, "unreadable editor form");
    let mut notifier = Notifier::new();
    notifier.error("Error", "The form could not be read. Please try again.");
    redirect_with(back, notifier.toasts()).into_response()
}

// ============================================================================
// Upload
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Relays one image to the backend and returns its hosted URL.
pub async fn upload(Extension(admin): Extension<Admin>, multipart: Multipart) -> Response {
    let post = match EditorPost::read(multipart).await {
        Ok(post) => post,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };
    let Some(file) = post.files.into_values().next() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file provided".to_string(),
            }),
        )
            .into_response();
    };

    match upload_image(&admin.client, file).await {
        Ok(url) => Json(UploadResponse { url }).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// Messages
// ============================================================================

fn message_path(id: &str) -> String {
    format!("{}/{}", MESSAGES_PATH, urlencoding::encode(id))
}

pub async fn message(
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut notifier = Notifier::new();
    match MessageDetail::load(&admin.client, &id, &mut notifier).await {
        Some(detail) => {
            let toasts: Vec<Toast> = toasts_from_query(&params);
            page(render::message_page(&detail, admin.name(), &toasts))
        }
        None => redirect_with(MESSAGES_PATH, notifier.toasts()).into_response(),
    }
}

pub async fn toggle_message_read(
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
) -> Response {
    let mut notifier = Notifier::new();
    match MessageDetail::load(&admin.client, &id, &mut notifier).await {
        Some(mut detail) => {
            detail.toggle_read(&admin.client, &mut notifier).await;
            redirect_with(&message_path(&id), notifier.toasts()).into_response()
        }
        None => redirect_with(MESSAGES_PATH, notifier.toasts()).into_response(),
    }
}

pub async fn delete_message(Extension(admin): Extension<Admin>, Path(id): Path<String>) -> Response {
    let mut notifier = Notifier::new();
    let Some(detail) = MessageDetail::load(&admin.client, &id, &mut notifier).await else {
        return redirect_with(MESSAGES_PATH, notifier.toasts()).into_response();
    };
    if detail.delete(&admin.client, &mut notifier).await {
        redirect_with(MESSAGES_PATH, notifier.toasts()).into_response()
    } else {
        redirect_with(&message_path(&id), notifier.toasts()).into_response()
    }
}
