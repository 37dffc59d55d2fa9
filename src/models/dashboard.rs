use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlogPost, Comment, ContactMessage, Project};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishCounts {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentCounts {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactCounts {
    pub total: u64,
    pub read: u64,
    pub unread: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Counts {
    pub blogs: PublishCounts,
    pub projects: PublishCounts,
    pub comments: CommentCounts,
    pub contacts: ContactCounts,
    pub subscribers: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentItems {
    pub blogs: Vec<BlogPost>,
    pub projects: Vec<Project>,
    pub comments: Vec<Comment>,
    pub contacts: Vec<ContactMessage>,
}

/// One server-health sample. `cpu` and `memory` are fractions in `0..=1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub errors: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub counts: Counts,
    pub recent: RecentItems,
    pub server_health: Vec<HealthPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_partial_stats() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "counts": {"blogs": {"total": 3, "published": 2, "draft": 1}, "subscribers": 9},
            "serverHealth": [{"timestamp": "2024-05-01T12:30:00Z", "cpu": 0.1234, "memory": 0.5}]
        }))
        .unwrap();
        assert_eq!(stats.counts.blogs.published, 2);
        assert_eq!(stats.counts.subscribers, 9);
        assert_eq!(stats.server_health.len(), 1);
        assert!(stats.recent.blogs.is_empty());
    }
}
