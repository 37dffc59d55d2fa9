use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

/// One release entry in a project's history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub version: String,
    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub demo_url: String,
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub versions: Vec<Version>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

document_serde!(Project);

impl Project {
    /// The newest version, by position.
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_versions_and_media() {
        let project: Project = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Alpha",
            "tags": ["x", "y"],
            "demoUrl": "https://demo",
            "versions": [{
                "version": "v1.0",
                "date": "2024-01-02",
                "media": [{"type": "video", "url": "https://v", "caption": "Demo"}]
            }]
        }))
        .unwrap();
        assert_eq!(project.demo_url, "https://demo");
        let version = project.latest_version().unwrap();
        assert_eq!(version.media[0].media_type, MediaType::Video);
        assert!(version.features.is_empty());
    }

    #[test]
    fn test_parses_record_with_both_ids() {
        let project: Project =
            serde_json::from_value(json!({"_id": "p2", "id": "p2", "title": "Beta"})).unwrap();
        assert_eq!(project.id, "p2");
    }
}
