//! List behaviour for each dashboard resource.

use serde_json::json;

use super::list::ListResource;
use crate::api::{endpoints, ApiRequest, ListQuery};
use crate::models::{BlogPost, ContactMessage, Project, ResourceKind, Subscriber};

fn any_tag_matches(tags: &[String], needle: &str) -> bool {
    tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

fn publish_toast(kind: ResourceKind, published: bool) -> (String, String) {
    let label = kind.label();
    if published {
        (
            format!("{} Unpublished", label),
            format!("The {} has been unpublished successfully", label.to_lowercase()),
        )
    } else {
        (
            format!("{} Published", label),
            format!("The {} has been published successfully", label.to_lowercase()),
        )
    }
}

fn publish_prompt(kind: ResourceKind, published: bool) -> String {
    let verb = if published { "Unpublish" } else { "Publish" };
    format!("{} {}?", verb, kind.label())
}

impl ListResource for BlogPost {
    const KIND: ResourceKind = ResourceKind::Blog;
    const PLURAL: &'static str = "blogs";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || any_tag_matches(&self.tags, needle)
    }

    fn flag(&self) -> bool {
        self.published
    }

    fn set_flag(&mut self, value: bool) {
        self.published = value;
    }

    fn list_request() -> ApiRequest {
        endpoints::list_blogs(&ListQuery::default()).authenticated()
    }

    fn delete_request(&self) -> ApiRequest {
        endpoints::delete_blog(&self.id)
    }

    fn toggle_request(&self) -> ApiRequest {
        endpoints::update_blog(&self.id, json!({ "published": !self.published }))
    }

    fn toggle_prompt(&self) -> String {
        publish_prompt(Self::KIND, self.published)
    }

    fn toggle_toast(&self) -> (String, String) {
        publish_toast(Self::KIND, self.published)
    }
}

impl ListResource for Project {
    const KIND: ResourceKind = ResourceKind::Project;
    const PLURAL: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || any_tag_matches(&self.tags, needle)
    }

    fn flag(&self) -> bool {
        self.published
    }

    fn set_flag(&mut self, value: bool) {
        self.published = value;
    }

    fn list_request() -> ApiRequest {
        endpoints::list_projects(&ListQuery::default()).authenticated()
    }

    fn delete_request(&self) -> ApiRequest {
        endpoints::delete_project(&self.id)
    }

    fn toggle_request(&self) -> ApiRequest {
        endpoints::update_project(&self.id, json!({ "published": !self.published }))
    }

    fn toggle_prompt(&self) -> String {
        publish_prompt(Self::KIND, self.published)
    }

    fn toggle_toast(&self) -> (String, String) {
        publish_toast(Self::KIND, self.published)
    }
}

impl ListResource for ContactMessage {
    const KIND: ResourceKind = ResourceKind::Message;
    const PLURAL: &'static str = "messages";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.subject]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    fn flag(&self) -> bool {
        self.read
    }

    fn set_flag(&mut self, value: bool) {
        self.read = value;
    }

    fn list_request() -> ApiRequest {
        endpoints::list_contacts()
    }

    fn delete_request(&self) -> ApiRequest {
        endpoints::delete_contact(&self.id)
    }

    fn toggle_request(&self) -> ApiRequest {
        endpoints::mark_contact_read(&self.id)
    }

    fn toggle_prompt(&self) -> String {
        if self.read {
            "Mark as Unread?".to_string()
        } else {
            "Mark as Read?".to_string()
        }
    }

    fn toggle_toast(&self) -> (String, String) {
        if self.read {
            (
                "Marked as Unread".to_string(),
                "The message has been marked as unread".to_string(),
            )
        } else {
            (
                "Marked as Read".to_string(),
                "The message has been marked as read".to_string(),
            )
        }
    }
}

impl ListResource for Subscriber {
    const KIND: ResourceKind = ResourceKind::Subscriber;
    const PLURAL: &'static str = "subscribers";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        self.email.to_lowercase().contains(needle)
    }

    fn flag(&self) -> bool {
        self.active
    }

    fn set_flag(&mut self, value: bool) {
        self.active = value;
    }

    fn list_request() -> ApiRequest {
        endpoints::list_subscribers()
    }

    fn delete_request(&self) -> ApiRequest {
        endpoints::delete_subscriber(&self.id)
    }

    fn toggle_request(&self) -> ApiRequest {
        if self.active {
            endpoints::deactivate_subscriber(&self.email)
        } else {
            endpoints::activate_subscriber(&self.id)
        }
    }

    fn toggle_prompt(&self) -> String {
        if self.active {
            "Deactivate Subscriber?".to_string()
        } else {
            "Activate Subscriber?".to_string()
        }
    }

    fn toggle_toast(&self) -> (String, String) {
        if self.active {
            (
                "Subscriber Deactivated".to_string(),
                "The subscriber has been deactivated successfully".to_string(),
            )
        } else {
            (
                "Subscriber Activated".to_string(),
                "The subscriber has been activated successfully".to_string(),
            )
        }
    }

    fn nothing_yet() -> String {
        "There are no newsletter subscribers yet.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn post(title: &str, tags: &[&str]) -> BlogPost {
        serde_json::from_value(json!({
            "_id": title.to_lowercase(),
            "title": title,
            "tags": tags,
            "published": true
        }))
        .unwrap()
    }

    #[test]
    fn test_blog_matches_title_or_tag() {
        let p = post("Async Rust", &["Tokio"]);
        assert!(p.matches("async"));
        assert!(p.matches("tok"));
        assert!(!p.matches("python"));
    }

    #[test]
    fn test_blog_toggle_sends_negated_flag() {
        let p = post("Async Rust", &[]);
        let req = p.toggle_request();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.body, Some(json!({"published": false})));
        assert_eq!(p.toggle_prompt(), "Unpublish Blog?");
        assert_eq!(p.toggle_toast().0, "Blog Unpublished");
    }

    #[test]
    fn test_message_matches_name_email_subject() {
        let m: ContactMessage = serde_json::from_value(json!({
            "_id": "m1", "name": "Dana", "email": "dana@x.io",
            "subject": "Hiring", "message": "secret words"
        }))
        .unwrap();
        assert!(m.matches("dana"));
        assert!(m.matches("hiring"));
        assert!(!m.matches("secret"));
    }

    #[test]
    fn test_subscriber_toggle_depends_on_state() {
        let mut s: Subscriber =
            serde_json::from_value(json!({"_id": "s1", "email": "e@x.io", "active": true})).unwrap();
        assert_eq!(s.toggle_request().path, "/subscribers/e%40x.io");
        s.active = false;
        assert_eq!(s.toggle_request().path, "/subscribers/activate/s1");
    }
}
