use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_READ_TIME: &str = "5 min read";

/// A post's author, either a bare id or a populated profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Profile {
        #[serde(rename = "_id", alias = "id", default)]
        id: String,
        name: String,
    },
    Ref(String),
}

impl Author {
    pub fn name(&self) -> Option<&str> {
        match self {
            Author::Profile { name, .. } => Some(name),
            Author::Ref(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// Rich HTML; sanitised before it is rendered.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

document_serde!(BlogPost, nested: ["author"]);

impl BlogPost {
    pub fn read_time(&self) -> &str {
        self.read_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_READ_TIME)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(Author::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_populated_author() {
        let post: BlogPost = serde_json::from_value(json!({
            "_id": "b1",
            "title": "Hello",
            "author": {"_id": "u1", "name": "Rod"},
            "createdAt": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(post.author_name(), Some("Rod"));
        assert_eq!(post.read_time(), DEFAULT_READ_TIME);
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_parses_author_ref_and_id_alias() {
        let post: BlogPost = serde_json::from_value(json!({
            "id": "b2",
            "title": "Ref",
            "author": "u1",
            "tags": ["rust"]
        }))
        .unwrap();
        assert_eq!(post.id, "b2");
        assert_eq!(post.author, Some(Author::Ref("u1".into())));
        assert_eq!(post.author_name(), None);
    }

    #[test]
    fn test_parses_record_with_both_ids() {
        let post: BlogPost = serde_json::from_value(json!({
            "_id": "b4",
            "id": "b4",
            "title": "Both",
            "author": {"_id": "u1", "id": "u1", "name": "Rod"}
        }))
        .unwrap();
        assert_eq!(post.id, "b4");
        assert_eq!(
            post.author,
            Some(Author::Profile {
                id: "u1".into(),
                name: "Rod".into()
            })
        );
    }

    #[test]
    fn test_missing_title_is_rejected() {
        assert!(serde_json::from_value::<BlogPost>(json!({"_id": "b3"})).is_err());
    }
}
