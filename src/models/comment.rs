use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ContentType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub author: CommentAuthor,
    pub content: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

document_serde!(Comment);

impl Comment {
    /// This comment plus every reply below it.
    pub fn thread_len(&self) -> usize {
        1 + self.replies.iter().map(Comment::thread_len).sum::<usize>()
    }
}

/// Nests a flat list by `parentId`. Comments already carrying `replies` keep them.
/// A reply whose parent is not in the list is kept at the top level.
pub fn nest(comments: Vec<Comment>) -> Vec<Comment> {
    let ids: std::collections::HashSet<String> = comments.iter().map(|c| c.id.clone()).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<String, Vec<Comment>> = HashMap::new();
    for comment in comments {
        match comment.parent_id.clone() {
            Some(parent) if ids.contains(&parent) && parent != comment.id => {
                children.entry(parent).or_default().push(comment)
            }
            _ => roots.push(comment),
        }
    }

    fn adopt(comment: &mut Comment, children: &mut HashMap<String, Vec<Comment>>) {
        if let Some(mut own) = children.remove(&comment.id) {
            comment.replies.append(&mut own);
        }
        for reply in comment.replies.iter_mut() {
            adopt(reply, children);
        }
    }

    for root in roots.iter_mut() {
        adopt(root, &mut children);
    }

    // Parent cycles leave entries unclaimed; surface them rather than drop them.
    let mut orphans: Vec<Comment> = children.into_values().flatten().collect();
    orphans.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    roots.extend(orphans);
    roots
}

/// Inserts `reply` under the comment with `parent_id`. Returns false if no such parent exists.
pub fn attach_reply(comments: &mut [Comment], parent_id: &str, reply: Comment) -> bool {
    let mut reply = Some(reply);
    attach_inner(comments, parent_id, &mut reply)
}

fn attach_inner(comments: &mut [Comment], parent_id: &str, reply: &mut Option<Comment>) -> bool {
    for comment in comments.iter_mut() {
        if comment.id == parent_id {
            if let Some(reply) = reply.take() {
                comment.replies.push(reply);
            }
            return true;
        }
        if attach_inner(&mut comment.replies, parent_id, reply) {
            return true;
        }
    }
    false
}
