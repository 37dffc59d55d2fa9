use serde::{Deserialize, Serialize};

use super::form::{blank, FormError};
use super::notify::Notifier;
use crate::api::{endpoints, ApiClient, ApiError, ListQuery, RevalidateCache};
use crate::models::{BlogPost, Project};

pub const MAX_TAG_BADGES: usize = 3;

/// Tag badges for a card: at most three, plus the count of the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBadges<'a> {
    pub shown: &'a [String],
    pub overflow: usize,
}

pub fn tag_badges(tags: &[String]) -> TagBadges<'_> {
    let shown = &tags[..tags.len().min(MAX_TAG_BADGES)];
    TagBadges {
        shown,
        overflow: tags.len() - shown.len(),
    }
}

// ============================================================================
// Home
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct HomePage {
    pub featured: Vec<Project>,
    pub recent: Vec<BlogPost>,
    pub error: Option<String>,
}

impl HomePage {
    /// Fetches featured projects and recent posts concurrently. Either failure sets the
    /// shared error and neither list is shown. Nothing is retried.
    pub async fn load(client: &ApiClient, cache: &RevalidateCache) -> Self {
        let featured_req = endpoints::list_projects(&ListQuery::default().limit(3).featured());
        let recent_req = endpoints::list_blogs(&ListQuery::newest().limit(2));

        let (featured, recent) = tokio::join!(
            cache.fetch::<Vec<Project>>(client, &featured_req, "projects"),
            cache.fetch::<Vec<BlogPost>>(client, &recent_req, "blogs"),
        );

        match (featured, recent) {
            (Ok(featured), Ok(recent)) => Self {
                featured,
                recent,
                error: None,
            },
            (featured, recent) => {
                for e in [featured.err(), recent.err()].into_iter().flatten() {
                    tracing::warn!(error = %e, "home page fetch failed");
                }
                Self {
                    error: Some("Failed to fetch data".to_string()),
                    ..Self::default()
                }
            }
        }
    }
}

// ============================================================================
// Lists & details
// ============================================================================

/// Public blog list, newest first. Failures render as an empty list.
pub async fn blog_list(client: &ApiClient, cache: &RevalidateCache) -> Vec<BlogPost> {
    let req = endpoints::list_blogs(&ListQuery::newest());
    cache.fetch(client, &req, "blogs").await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "blog list fetch failed");
        Vec::new()
    })
}

pub async fn project_list(client: &ApiClient, cache: &RevalidateCache) -> Vec<Project> {
    let req = endpoints::list_projects(&ListQuery::newest());
    cache.fetch(client, &req, "projects").await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "project list fetch failed");
        Vec::new()
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> From<Result<T, ApiError>> for DetailState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(record) => DetailState::Found(record),
            Err(e) if e.is_not_found() => DetailState::NotFound,
            Err(e) => {
                tracing::warn!(error = %e, "detail fetch failed");
                DetailState::Failed(e.to_string())
            }
        }
    }
}

pub async fn blog_detail(
    client: &ApiClient,
    cache: &RevalidateCache,
    id: &str,
) -> DetailState<BlogPost> {
    cache
        .fetch::<BlogPost>(client, &endpoints::get_blog(id), "blog")
        .await
        .into()
}

pub async fn project_detail(
    client: &ApiClient,
    cache: &RevalidateCache,
    id: &str,
) -> DetailState<Project> {
    cache
        .fetch::<Project>(client, &endpoints::get_project(id), "project")
        .await
        .into()
}

// ============================================================================
// Contact & newsletter
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .any(|field| blank(field))
        {
            return Err(FormError::MissingFields);
        }
        Ok(())
    }

    /// Sends the message; the form is cleared on success and kept on failure.
    pub async fn submit(&mut self, client: &ApiClient, notifier: &mut Notifier) -> bool {
        if let Err(e) = self.validate() {
            e.notify(notifier);
            return false;
        }

        let body = serde_json::json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "subject": self.subject.trim(),
            "message": self.message.trim(),
        });
        match client.send(&endpoints::create_contact(body)).await {
            Ok(_) => {
                notifier.success(
                    "Message sent!",
                    "Thank you for your message. I'll get back to you soon.",
                );
                *self = Self::default();
                true
            }
            Err(e) => {
                notifier.error("Error", e.to_string());
                false
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubscribeForm {
    pub email: String,
}

impl SubscribeForm {
    pub async fn submit(&mut self, client: &ApiClient, notifier: &mut Notifier) -> bool {
        if blank(&self.email) {
            notifier.error("Error", "Please enter your email address");
            return false;
        }
        match client.send(&endpoints::subscribe(self.email.trim())).await {
            Ok(_) => {
                notifier.success("Subscribed!", "Thank you for subscribing to my newsletter.");
                self.email.clear();
                true
            }
            Err(e) => {
                notifier.error("Error", e.to_string());
                false
            }
        }
    }
}
