use chrono::{DateTime, Utc};

use super::notify::Notifier;
use crate::api::{endpoints, ApiClient};
use crate::models::{BlogPost, Comment, ContactMessage, DashboardStats, HealthPoint, Project, ResourceKind};

const TITLE_LIMIT: usize = 40;

/// One row of a "recent items" list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentItem {
    pub id: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub flag: bool,
    pub status: &'static str,
    /// Dashboard page for the item; comments have none.
    pub link: Option<String>,
}

/// Cuts to 40 characters with a trailing `...`.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_LIMIT {
        let cut: String = title.chars().take(TITLE_LIMIT).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}

fn item(
    kind: ResourceKind,
    id: &str,
    title: &str,
    date: Option<DateTime<Utc>>,
    author: Option<String>,
    flag: bool,
) -> RecentItem {
    RecentItem {
        id: id.to_string(),
        title: truncate_title(title),
        date,
        author,
        flag,
        status: kind.status_label(flag),
        link: match kind {
            ResourceKind::Blog => Some(format!("/dashboard/blogs/edit/{}", id)),
            ResourceKind::Project => Some(format!("/projects/{}", id)),
            ResourceKind::Message => Some(format!("/dashboard/messages/{}", id)),
            ResourceKind::Comment | ResourceKind::Subscriber => None,
        },
    }
}

fn recent_blog(post: &BlogPost) -> RecentItem {
    item(ResourceKind::Blog, &post.id, &post.title, post.created_at, None, post.published)
}

fn recent_project(project: &Project) -> RecentItem {
    item(
        ResourceKind::Project,
        &project.id,
        &project.title,
        project.created_at,
        None,
        project.published,
    )
}

fn recent_comment(comment: &Comment) -> RecentItem {
    item(
        ResourceKind::Comment,
        &comment.id,
        &comment.content,
        comment.created_at,
        Some(comment.author.name.clone()),
        comment.approved,
    )
}

fn recent_message(message: &ContactMessage) -> RecentItem {
    item(
        ResourceKind::Message,
        &message.id,
        &message.subject,
        message.created_at,
        Some(message.name.clone()),
        message.read,
    )
}

/// Recent rows for one resource family. Subscribers have no recent list.
pub fn recent_items(stats: &DashboardStats, kind: ResourceKind) -> Vec<RecentItem> {
    let recent = &stats.recent;
    match kind {
        ResourceKind::Blog => recent.blogs.iter().map(recent_blog).collect(),
        ResourceKind::Project => recent.projects.iter().map(recent_project).collect(),
        ResourceKind::Comment => recent.comments.iter().map(recent_comment).collect(),
        ResourceKind::Message => recent.contacts.iter().map(recent_message).collect(),
        ResourceKind::Subscriber => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// `HH:MM`
    pub name: String,
    /// Percentage with two decimals.
    pub cpu: String,
    pub memory: String,
    pub requests: u64,
    pub errors: u64,
}

pub fn chart_points(points: &[HealthPoint]) -> Vec<ChartPoint> {
    points
        .iter()
        .map(|p| ChartPoint {
            name: p.timestamp.format("%H:%M").to_string(),
            cpu: format!("{:.2}", p.cpu * 100.0),
            memory: format!("{:.2}", p.memory * 100.0),
            requests: p.requests,
            errors: p.errors,
        })
        .collect()
}

/// A summary card on the overview.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub total: u64,
    /// `(label, count)` pairs for the split, absent for plain totals.
    pub split: Option<[(&'static str, u64); 2]>,
    pub link: &'static str,
}

pub fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    let c = &stats.counts;
    vec![
        StatCard {
            title: "Blogs",
            total: c.blogs.total,
            split: Some([("Published", c.blogs.published), ("Draft", c.blogs.draft)]),
            link: "/dashboard/blogs",
        },
        StatCard {
            title: "Projects",
            total: c.projects.total,
            split: Some([("Published", c.projects.published), ("Draft", c.projects.draft)]),
            link: "/dashboard/projects",
        },
        StatCard {
            title: "Comments",
            total: c.comments.total,
            split: Some([("Approved", c.comments.approved), ("Pending", c.comments.pending)]),
            link: "/dashboard",
        },
        StatCard {
            title: "Messages",
            total: c.contacts.total,
            split: Some([("Read", c.contacts.read), ("Unread", c.contacts.unread)]),
            link: "/dashboard/messages",
        },
        StatCard {
            title: "Subscribers",
            total: c.subscribers,
            split: None,
            link: "/dashboard/subscribers",
        },
        StatCard {
            title: "Likes",
            total: c.likes,
            split: None,
            link: "#",
        },
    ]
}

/// Loads the overview statistics; a failure raises a toast and yields `None`.
pub async fn load(client: &ApiClient, notifier: &mut Notifier) -> Option<DashboardStats> {
    match client
        .fetch::<DashboardStats>(&endpoints::dashboard_stats(), "dashboard stats")
        .await
    {
        Ok(stats) => Some(stats),
        Err(e) => {
            notifier.error("Error", e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short"), "short");
        let long = "a".repeat(41);
        assert_eq!(truncate_title(&long), format!("{}...", "a".repeat(40)));
        assert_eq!(truncate_title(&"b".repeat(40)), "b".repeat(40));
    }

    #[test]
    fn test_recent_items_use_kind_accessors() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "recent": {
                "comments": [{"_id": "c1", "author": {"name": "Ann"}, "content": "Great post", "approved": false}],
                "contacts": [{"_id": "m1", "name": "Dana", "email": "d@x.io", "subject": "Hi", "read": true}]
            }
        }))
        .unwrap();

        let comments = recent_items(&stats, ResourceKind::Comment);
        assert_eq!(comments[0].title, "Great post");
        assert_eq!(comments[0].author.as_deref(), Some("Ann"));
        assert_eq!(comments[0].status, "Pending");

        let messages = recent_items(&stats, ResourceKind::Message);
        assert_eq!(messages[0].status, "Read");
        assert_eq!(messages[0].link.as_deref(), Some("/dashboard/messages/m1"));
        assert_eq!(comments[0].link, None);
        assert!(recent_items(&stats, ResourceKind::Blog).is_empty());
    }

    #[test]
    fn test_chart_points_format() {
        let points: Vec<HealthPoint> = serde_json::from_value(json!([
            {"timestamp": "2024-05-01T09:05:00Z", "cpu": 0.1234, "memory": 0.5, "requests": 10, "errors": 1}
        ]))
        .unwrap();
        let chart = chart_points(&points);
        assert_eq!(chart[0].name, "09:05");
        assert_eq!(chart[0].cpu, "12.34");
        assert_eq!(chart[0].memory, "50.00");
    }
}
