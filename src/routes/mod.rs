/**
 * Routes Module
 * Page handlers for the public site and the admin dashboard
 */
pub mod dashboard;
pub mod health;
pub mod public;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{ApiClient, RevalidateCache};
use crate::config::FrontendConfig;
use crate::store::{LocalStore, ScopedStore};
use crate::views::notify::Toast;

/// Cookie identifying a browser; keys its slice of the local store.
pub const VISITOR_COOKIE: &str = "visitor_id";

#[derive(Clone)]
pub struct AppState {
    /// Anonymous client; per-request clients are derived with a session.
    pub client: ApiClient,
    pub cache: Arc<RevalidateCache>,
    pub store: Arc<dyn LocalStore>,
    pub config: Arc<FrontendConfig>,
}

impl AppState {
    pub fn new(client: ApiClient, store: Arc<dyn LocalStore>, config: FrontendConfig) -> Self {
        Self {
            cache: Arc::new(RevalidateCache::new(config.revalidate())),
            client,
            store,
            config: Arc::new(config),
        }
    }

    /// The local store as seen by one visitor.
    pub fn visitor_store(&self, visitor_id: &str) -> ScopedStore {
        ScopedStore::new(self.store.clone(), visitor_id)
    }
}

/// Returns the visitor id, issuing a new cookie when the browser has none.
pub fn visitor(jar: CookieJar, secure: bool) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(VISITOR_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| uuid::Uuid::parse_str(id).is_ok())
    {
        return (jar, id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let cookie = Cookie::build((VISITOR_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .permanent();
    (jar.add(cookie), id)
}

// ============================================================================
// Toasts across redirects
// ============================================================================

/// Toast carried in the query string of a redirect target.
pub fn toasts_from_query(params: &HashMap<String, String>) -> Vec<Toast> {
    Toast::from_query(params).into_iter().collect()
}

/// `303 See Other` to `to`, with the last toast (if any) appended to the query.
pub fn redirect_with(to: &str, toasts: &[Toast]) -> Redirect {
    match toasts.last() {
        Some(toast) => {
            let sep = if to.contains('?') { '&' } else { '?' };
            Redirect::to(&format!("{}{}{}", to, sep, toast.to_query()))
        }
        None => Redirect::to(to),
    }
}

pub fn page(html: String) -> Response {
    Html(html).into_response()
}

pub fn page_with_status(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}
