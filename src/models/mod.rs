/*!
 * Models
 * Typed records for every backend resource, parsed at the HTTP boundary
 */

/// Implements `Serialize`/`Deserialize` for a document type that derives them
/// with `#[serde(remote = "Self")]`. Incoming `id` is folded into `_id` first,
/// for the top level and for each listed nested object.
macro_rules! document_serde {
    ($ty:ident $(, nested: [$($field:literal),+])?) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let mut value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                $crate::models::normalize_document_id(&mut value);
                $($(
                    if let Some(inner) = value.get_mut($field) {
                        $crate::models::normalize_document_id(inner);
                    }
                )+)?
                $ty::deserialize(value).map_err(serde::de::Error::custom)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                $ty::serialize(self, serializer)
            }
        }
    };
}

pub mod blog;
pub mod comment;
pub mod dashboard;
pub mod message;
pub mod project;
pub mod user;

pub use blog::{Author, BlogPost};
pub use comment::{Comment, CommentAuthor};
pub use dashboard::{Counts, DashboardStats, HealthPoint, PublishCounts, RecentItems};
pub use message::{ContactMessage, Subscriber};
pub use project::{MediaItem, MediaType, Project, Version};
pub use user::User;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend documents carry `_id`, the `id` virtual, or both. Keeps a single `_id`.
pub(crate) fn normalize_document_id(value: &mut serde_json::Value) {
    if let Some(object) = value.as_object_mut() {
        if let Some(id) = object.remove("id") {
            if !object.contains_key("_id") {
                object.insert("_id".to_string(), id);
            }
        }
    }
}

/// Content that can carry comments and likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Project,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Project => "project",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(ContentType::Blog),
            "project" => Ok(ContentType::Project),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// Resource families shown in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Blog,
    Project,
    Comment,
    Message,
    Subscriber,
}

impl ResourceKind {
    /// Dashboard path segment.
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "blogs",
            ResourceKind::Project => "projects",
            ResourceKind::Comment => "comments",
            ResourceKind::Message => "messages",
            ResourceKind::Subscriber => "subscribers",
        }
    }

    /// Capitalised singular, used in notification titles.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "Blog",
            ResourceKind::Project => "Project",
            ResourceKind::Comment => "Comment",
            ResourceKind::Message => "Message",
            ResourceKind::Subscriber => "Subscriber",
        }
    }

    /// Status badge text for the on/off state of the resource's flag.
    pub fn status_label(&self, flag: bool) -> &'static str {
        match (self, flag) {
            (ResourceKind::Blog | ResourceKind::Project, true) => "Published",
            (ResourceKind::Blog | ResourceKind::Project, false) => "Draft",
            (ResourceKind::Comment, true) => "Approved",
            (ResourceKind::Comment, false) => "Pending",
            (ResourceKind::Message, true) => "Read",
            (ResourceKind::Message, false) => "Unread",
            (ResourceKind::Subscriber, true) => "Active",
            (ResourceKind::Subscriber, false) => "Inactive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_document_id() {
        let mut both = serde_json::json!({"_id": "a", "id": "a", "title": "t"});
        normalize_document_id(&mut both);
        assert_eq!(both, serde_json::json!({"_id": "a", "title": "t"}));

        let mut virtual_only = serde_json::json!({"id": "b"});
        normalize_document_id(&mut virtual_only);
        assert_eq!(virtual_only, serde_json::json!({"_id": "b"}));

        let mut scalar = serde_json::json!("u1");
        normalize_document_id(&mut scalar);
        assert_eq!(scalar, serde_json::json!("u1"));
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("blog".parse::<ContentType>().unwrap(), ContentType::Blog);
        assert_eq!(ContentType::Project.to_string(), "project");
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ResourceKind::Blog.status_label(false), "Draft");
        assert_eq!(ResourceKind::Comment.status_label(true), "Approved");
        assert_eq!(ResourceKind::Message.status_label(false), "Unread");
    }
}
