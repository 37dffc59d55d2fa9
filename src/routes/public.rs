//! Public site: home, blog, projects, contact, newsletter, comments and likes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::collections::HashMap;

use super::{page, page_with_status, redirect_with, toasts_from_query, visitor, AppState, VISITOR_COOKIE};
use crate::models::ContentType;
use crate::render::public as render;
use crate::views::comments::{CommentDraft, CommentSection};
use crate::views::like::LikeWidget;
use crate::views::notify::{Notifier, Toast};
use crate::views::public::{self as views, ContactForm, DetailState, HomePage, SubscribeForm};

pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let home = HomePage::load(&state.client, &state.cache).await;
    page(render::home(&home, &toasts_from_query(&params)))
}

pub async fn blog_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let posts = views::blog_list(&state.client, &state.cache).await;
    page(render::blog_list(&posts, &toasts_from_query(&params)))
}

pub async fn project_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let projects = views::project_list(&state.client, &state.cache).await;
    page(render::project_list(&projects, &toasts_from_query(&params)))
}

/// Like widget and comment tree shared by both detail pages.
async fn engagement(
    state: &AppState,
    jar: &CookieJar,
    content_type: ContentType,
    id: &str,
    toasts: &mut Vec<Toast>,
) -> (LikeWidget, CommentSection) {
    let visitor_id = jar
        .get(VISITOR_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();
    let like = LikeWidget::mount(&state.visitor_store(&visitor_id), content_type, id, 0);

    let mut notifier = Notifier::new();
    let mut comments = CommentSection::new(content_type, id);
    comments.load(&state.client, &mut notifier).await;
    toasts.extend(notifier.drain());

    (like, comments)
}

fn missing(detail_error: Option<String>, toasts: &[Toast]) -> Response {
    match detail_error {
        None => page_with_status(StatusCode::NOT_FOUND, render::not_found(toasts)),
        Some(message) => page_with_status(StatusCode::BAD_GATEWAY, render::error_page(&message, toasts)),
    }
}

pub async fn blog_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Response {
    let mut toasts = toasts_from_query(&params);
    match views::blog_detail(&state.client, &state.cache, &id).await {
        DetailState::Found(post) => {
            let (like, comments) =
                engagement(&state, &jar, ContentType::Blog, &post.id, &mut toasts).await;
            page(render::blog_detail(&post, &like, &comments, &toasts))
        }
        DetailState::NotFound => missing(None, &toasts),
        DetailState::Failed(message) => missing(Some(message), &toasts),
    }
}

pub async fn project_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Response {
    let mut toasts = toasts_from_query(&params);
    match views::project_detail(&state.client, &state.cache, &id).await {
        DetailState::Found(project) => {
            let (like, comments) =
                engagement(&state, &jar, ContentType::Project, &project.id, &mut toasts).await;
            page(render::project_detail(&project, &like, &comments, &toasts))
        }
        DetailState::NotFound => missing(None, &toasts),
        DetailState::Failed(message) => missing(Some(message), &toasts),
    }
}

// ============================================================================
// Comments & likes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub parent_id: String,
}

impl From<CommentInput> for CommentDraft {
    fn from(input: CommentInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            content: input.content,
            parent_id: Some(input.parent_id).filter(|p| !p.trim().is_empty()),
        }
    }
}

pub async fn post_comment(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Form(input): Form<CommentInput>,
) -> Response {
    let Ok(content_type) = kind.parse::<ContentType>() else {
        return page_with_status(StatusCode::NOT_FOUND, render::not_found(&[]));
    };

    let mut notifier = Notifier::new();
    let mut section = CommentSection::new(content_type, id.as_str());
    section
        .post(&CommentDraft::from(input), &state.client, &mut notifier)
        .await;

    redirect_with(&render::content_path(content_type, &id), notifier.toasts()).into_response()
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    jar: CookieJar,
) -> Response {
    let Ok(content_type) = kind.parse::<ContentType>() else {
        return page_with_status(StatusCode::NOT_FOUND, render::not_found(&[]));
    };

    let (jar, visitor_id) = visitor(jar, state.config.is_production());
    let store = state.visitor_store(&visitor_id);
    let mut notifier = Notifier::new();
    let mut like = LikeWidget::mount(&store, content_type, &id, 0);
    if let Err(e) = like.toggle(&store, &mut notifier).await {
        tracing::error!(content_id = %id, error = %e, "failed to persist like");
        notifier.error("Error", "Could not save your like. Please try again.");
    }

    (
        jar,
        redirect_with(&render::content_path(content_type, &id), notifier.toasts()),
    )
        .into_response()
}

// ============================================================================
// Contact & newsletter
// ============================================================================

pub async fn contact_page(Query(params): Query<HashMap<String, String>>) -> Response {
    page(render::contact(&ContactForm::default(), &toasts_from_query(&params)))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Form(mut form): Form<ContactForm>,
) -> Response {
    let mut notifier = Notifier::new();
    if form.submit(&state.client, &mut notifier).await {
        return redirect_with("/contact", notifier.toasts()).into_response();
    }
    page_with_status(
        StatusCode::UNPROCESSABLE_ENTITY,
        render::contact(&form, notifier.toasts()),
    )
}

#[derive(Debug, Deserialize)]
pub struct SubscribeInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub return_to: String,
}

/// Only same-site paths are accepted as redirect targets.
fn local_path(path: &str) -> &str {
    if path.starts_with('/') && !path.starts_with("//") {
        path
    } else {
        "/"
    }
}

pub async fn subscribe(
    State(state): State<AppState>,
    Form(input): Form<SubscribeInput>,
) -> Response {
    let mut notifier = Notifier::new();
    let mut form = SubscribeForm { email: input.email };
    form.submit(&state.client, &mut notifier).await;
    redirect_with(local_path(&input.return_to), notifier.toasts()).into_response()
}

pub async fn not_found() -> Response {
    page_with_status(StatusCode::NOT_FOUND, render::not_found(&[]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_rejects_offsite_targets() {
        assert_eq!(local_path("/blog"), "/blog");
        assert_eq!(local_path("//evil.example"), "/");
        assert_eq!(local_path("https://evil.example"), "/");
        assert_eq!(local_path(""), "/");
    }

    #[test]
    fn test_comment_input_blank_parent_is_top_level() {
        let draft = CommentDraft::from(CommentInput {
            name: "Ann".into(),
            email: String::new(),
            content: "Hi".into(),
            parent_id: " ".into(),
        });
        assert_eq!(draft.parent_id, None);
    }
}
