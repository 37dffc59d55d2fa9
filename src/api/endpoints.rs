//! Request builders for every backend route the frontend calls.

use serde_json::{json, Value};

use super::request::{segment, ApiRequest};
use crate::models::ContentType;

/// Optional collection query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub featured: Option<bool>,
}

impl ListQuery {
    /// Newest first.
    pub fn newest() -> Self {
        Self {
            sort: Some("-createdAt".to_string()),
            ..Self::default()
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = Some(true);
        self
    }

    fn apply(&self, mut req: ApiRequest) -> ApiRequest {
        if let Some(limit) = self.limit {
            req = req.query("limit", limit);
        }
        if let Some(featured) = self.featured {
            req = req.query("featured", featured);
        }
        if let Some(sort) = &self.sort {
            req = req.query("sort", sort);
        }
        req
    }
}

// ============================================================================
// Blogs
// ============================================================================

pub fn list_blogs(query: &ListQuery) -> ApiRequest {
    query.apply(ApiRequest::get("/blogs"))
}

pub fn get_blog(id: &str) -> ApiRequest {
    ApiRequest::get(format!("/blogs/{}", segment(id)))
}

pub fn create_blog(body: Value) -> ApiRequest {
    ApiRequest::post("/blogs").json(body).authenticated()
}

pub fn update_blog(id: &str, body: Value) -> ApiRequest {
    ApiRequest::put(format!("/blogs/{}", segment(id)))
        .json(body)
        .authenticated()
}

pub fn delete_blog(id: &str) -> ApiRequest {
    ApiRequest::delete(format!("/blogs/{}", segment(id))).authenticated()
}

// ============================================================================
// Projects
// ============================================================================

pub fn list_projects(query: &ListQuery) -> ApiRequest {
    query.apply(ApiRequest::get("/projects"))
}

pub fn get_project(id: &str) -> ApiRequest {
    ApiRequest::get(format!("/projects/{}", segment(id)))
}

pub fn create_project(body: Value) -> ApiRequest {
    ApiRequest::post("/projects").json(body).authenticated()
}

pub fn update_project(id: &str, body: Value) -> ApiRequest {
    ApiRequest::put(format!("/projects/{}", segment(id)))
        .json(body)
        .authenticated()
}

pub fn delete_project(id: &str) -> ApiRequest {
    ApiRequest::delete(format!("/projects/{}", segment(id))).authenticated()
}

// ============================================================================
// Comments
// ============================================================================

fn comments_path(content_type: ContentType, content_id: &str) -> String {
    format!("/comments/{}/{}", content_type, segment(content_id))
}

pub fn list_comments(content_type: ContentType, content_id: &str) -> ApiRequest {
    ApiRequest::get(comments_path(content_type, content_id))
}

pub fn post_comment(content_type: ContentType, content_id: &str, body: Value) -> ApiRequest {
    ApiRequest::post(comments_path(content_type, content_id)).json(body)
}

// ============================================================================
// Contacts
// ============================================================================

pub fn list_contacts() -> ApiRequest {
    ApiRequest::get("/contacts").authenticated()
}

pub fn get_contact(id: &str) -> ApiRequest {
    ApiRequest::get(format!("/contacts/{}", segment(id))).authenticated()
}

pub fn create_contact(body: Value) -> ApiRequest {
    ApiRequest::post("/contacts").json(body)
}

/// Toggles the read flag server-side; no body.
pub fn mark_contact_read(id: &str) -> ApiRequest {
    ApiRequest::put(format!("/contacts/{}/read", segment(id))).authenticated()
}

pub fn delete_contact(id: &str) -> ApiRequest {
    ApiRequest::delete(format!("/contacts/{}", segment(id))).authenticated()
}

// ============================================================================
// Subscribers
// ============================================================================

pub fn list_subscribers() -> ApiRequest {
    ApiRequest::get("/subscribers").authenticated()
}

pub fn subscribe(email: &str) -> ApiRequest {
    ApiRequest::post("/subscribers").json(json!({ "email": email }))
}

pub fn activate_subscriber(id: &str) -> ApiRequest {
    ApiRequest::put(format!("/subscribers/activate/{}", segment(id))).authenticated()
}

/// Deactivation is keyed by email, unlike every other subscriber route.
pub fn deactivate_subscriber(email: &str) -> ApiRequest {
    ApiRequest::delete(format!("/subscribers/{}", segment(email))).authenticated()
}

pub fn delete_subscriber(id: &str) -> ApiRequest {
    ApiRequest::delete(format!("/subscribers/id/{}", segment(id))).authenticated()
}

// ============================================================================
// Auth & dashboard
// ============================================================================

pub fn login(email: &str, password: &str) -> ApiRequest {
    ApiRequest::post("/auth/login").json(json!({ "email": email, "password": password }))
}

pub fn me() -> ApiRequest {
    ApiRequest::get("/auth/me").authenticated()
}

pub fn logout() -> ApiRequest {
    ApiRequest::get("/auth/logout").authenticated()
}

pub fn dashboard_stats() -> ApiRequest {
    ApiRequest::get("/dashboard/stats").authenticated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn test_home_queries() {
        let featured = list_projects(&ListQuery::default().limit(3).featured());
        assert_eq!(featured.target(), "/projects?limit=3&featured=true");

        let recent = list_blogs(&ListQuery::newest().limit(2));
        assert_eq!(recent.target(), "/blogs?limit=2&sort=-createdAt");
    }

    #[test]
    fn test_subscriber_toggle_routes_differ() {
        let on = activate_subscriber("s1");
        assert_eq!((on.method, on.path.as_str()), (Method::PUT, "/subscribers/activate/s1"));

        let off = deactivate_subscriber("a@b.io");
        assert_eq!(off.method, Method::DELETE);
        assert_eq!(off.path, "/subscribers/a%40b.io");
        assert!(off.auth);

        assert_eq!(delete_subscriber("s1").path, "/subscribers/id/s1");
    }

    #[test]
    fn test_comment_paths() {
        let req = list_comments(ContentType::Project, "p1");
        assert_eq!(req.path, "/comments/project/p1");
        assert!(!req.auth);
    }
}
