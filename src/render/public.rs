use chrono::Utc;

use super::html::{
    badge, escape, format_date, hidden, layout, sanitize, tag_list, text_input, textarea,
    time_ago,
};
use crate::models::{BlogPost, Comment, ContentType, Project};
use crate::views::comments::CommentSection;
use crate::views::like::LikeWidget;
use crate::views::notify::Toast;
use crate::views::public::{ContactForm, HomePage};

/// Public page for a piece of content.
pub fn content_path(content_type: ContentType, id: &str) -> String {
    match content_type {
        ContentType::Blog => format!("/blog/{}", urlencoding::encode(id)),
        ContentType::Project => format!("/projects/{}", urlencoding::encode(id)),
    }
}

// ============================================================================
// Cards
// ============================================================================

pub fn blog_card(post: &BlogPost) -> String {
    let image = if post.image.is_empty() {
        String::new()
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape(&post.image),
            escape(&post.title)
        )
    };
    format!(
        "<article class=\"card blog-card\">{image}<h3><a href=\"{href}\">{title}</a></h3>\
         <p class=\"meta\"><span>{date}</span> <span>{read}</span></p>\
         <p>{excerpt}</p>{tags}</article>",
        image = image,
        href = content_path(ContentType::Blog, &post.id),
        title = escape(&post.title),
        date = format_date(post.created_at),
        read = escape(post.read_time()),
        excerpt = escape(&post.excerpt),
        tags = tag_list(&post.tags),
    )
}

pub fn project_card(project: &Project) -> String {
    let mut links = String::new();
    if !project.demo_url.is_empty() {
        links.push_str(&format!(
            "<a href=\"{}\" rel=\"noopener\">Live Demo</a> ",
            escape(&project.demo_url)
        ));
    }
    if !project.repo_url.is_empty() {
        links.push_str(&format!(
            "<a href=\"{}\" rel=\"noopener\">Code</a>",
            escape(&project.repo_url)
        ));
    }
    format!(
        "<article class=\"card project-card\"><h3><a href=\"{href}\">{title}</a></h3>\
         <p>{description}</p>{tags}<p class=\"links\">{links}</p></article>",
        href = content_path(ContentType::Project, &project.id),
        title = escape(&project.title),
        description = escape(&project.description),
        tags = tag_list(&project.tags),
        links = links,
    )
}

fn subscribe_form(return_to: &str) -> String {
    format!(
        "<section class=\"card newsletter\"><h2>Subscribe to my Newsletter</h2>\
         <p>Get notified about new blog posts, projects, and updates.</p>\
         <form method=\"post\" action=\"/subscribe\">{}\
         <input type=\"email\" name=\"email\" placeholder=\"Enter your email\" required>\
         <button type=\"submit\">Subscribe</button></form></section>",
        hidden("return_to", return_to)
    )
}

// ============================================================================
// Pages
// ============================================================================

pub fn home(page: &HomePage, toasts: &[Toast]) -> String {
    let body = match &page.error {
        Some(error) => format!("<p class=\"error\">{}</p>", escape(error)),
        None => {
            let projects: String = page.featured.iter().map(|p| project_card(p)).collect();
            let posts: String = page.recent.iter().map(|p| blog_card(p)).collect();
            format!(
                "<section class=\"featured\"><h2>Featured Projects</h2>{}\
                 <a href=\"/projects\">View All Projects</a></section>\
                 <section class=\"recent\"><h2>Latest Blog Posts</h2>{}\
                 <a href=\"/blog\">View All Posts</a></section>",
                projects, posts
            )
        }
    };
    layout(
        "Portfolio",
        &format!("{}{}", body, subscribe_form("/")),
        toasts,
    )
}

pub fn blog_list(posts: &[BlogPost], toasts: &[Toast]) -> String {
    let cards: String = if posts.is_empty() {
        "<p class=\"empty\">No blog posts yet.</p>".to_string()
    } else {
        posts.iter().map(blog_card).collect()
    };
    layout(
        "Blog",
        &format!("<h1>Blog</h1><div class=\"grid\">{}</div>{}", cards, subscribe_form("/blog")),
        toasts,
    )
}

pub fn project_list(projects: &[Project], toasts: &[Toast]) -> String {
    let cards: String = if projects.is_empty() {
        "<p class=\"empty\">No projects yet.</p>".to_string()
    } else {
        projects.iter().map(project_card).collect()
    };
    layout(
        "Projects",
        &format!("<h1>Projects</h1><div class=\"grid\">{}</div>", cards),
        toasts,
    )
}

pub fn like_button(widget: &LikeWidget) -> String {
    format!(
        "<form method=\"post\" action=\"/likes/{}/{}\" class=\"like\">\
         <button type=\"submit\" class=\"{}\" aria-pressed=\"{}\">&#9829; {}</button></form>",
        widget.content_type,
        urlencoding::encode(&widget.content_id),
        if widget.liked() { "liked" } else { "" },
        widget.liked(),
        widget.likes()
    )
}

fn comment_form(section: &CommentSection, parent_id: Option<&str>) -> String {
    let (label, button) = match parent_id {
        Some(_) => ("Reply", "Post Reply"),
        None => ("Leave a comment", "Post Comment"),
    };
    format!(
        "<form method=\"post\" action=\"/comments/{}/{}\" class=\"comment-form\">\
         <h4>{}</h4>{}{}{}{}<button type=\"submit\">{}</button></form>",
        section.content_type,
        urlencoding::encode(&section.content_id),
        label,
        hidden("parent_id", parent_id.unwrap_or("")),
        text_input("name", "Name", ""),
        text_input("email", "Email (optional)", ""),
        textarea("content", "Comment", ""),
        button
    )
}

fn comment_item(comment: &Comment, section: &CommentSection, now: chrono::DateTime<Utc>) -> String {
    let avatar = match &comment.author.avatar {
        Some(url) => format!(
            "<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
            escape(url),
            escape(&comment.author.name)
        ),
        None => "<span class=\"avatar\"></span>".to_string(),
    };
    let replies: String = comment
        .replies
        .iter()
        .map(|reply| comment_item(reply, section, now))
        .collect();
    let replies = if replies.is_empty() {
        String::new()
    } else {
        format!("<div class=\"replies\">{}</div>", replies)
    };
    format!(
        "<div class=\"comment\" id=\"comment-{id}\">{avatar}<h4>{name}</h4>\
         <p class=\"meta\">{ago}</p><div class=\"body\">{content}</div>\
         <details><summary>Reply</summary>{form}</details>{replies}</div>",
        id = escape(&comment.id),
        avatar = avatar,
        name = escape(&comment.author.name),
        ago = time_ago(comment.created_at, now),
        content = escape(&comment.content),
        form = comment_form(section, Some(&comment.id)),
        replies = replies,
    )
}

/// Comment tree with the top-level form. Rendering recurses through replies.
pub fn comment_section(section: &CommentSection) -> String {
    let now = Utc::now();
    let list: String = if section.comments().is_empty() {
        "<p class=\"empty\">No comments yet. Be the first to comment!</p>".to_string()
    } else {
        section
            .comments()
            .iter()
            .map(|c| comment_item(c, section, now))
            .collect()
    };
    format!(
        "<section class=\"comments\"><h2>Comments ({})</h2>{}{}</section>",
        section.total(),
        comment_form(section, None),
        list
    )
}

pub fn blog_detail(
    post: &BlogPost,
    like: &LikeWidget,
    comments: &CommentSection,
    toasts: &[Toast],
) -> String {
    let author = post
        .author_name()
        .map(|name| format!("<span>{}</span>", escape(name)))
        .unwrap_or_default();
    let tags: String = post.tags.iter().map(|t| badge(t, "badge-secondary")).collect();
    let image = if post.image.is_empty() {
        String::new()
    } else {
        format!("<img class=\"hero\" src=\"{}\" alt=\"{}\">", escape(&post.image), escape(&post.title))
    };
    let body = format!(
        "<a href=\"/blog\">Back to Blog</a><article><h1>{title}</h1>\
         <p class=\"meta\"><span>{date}</span> <span>{read}</span> {author}</p>\
         <div class=\"tags\">{tags}</div>{image}<div class=\"content\">{content}</div>\
         {like}</article>{comments}",
        title = escape(&post.title),
        date = format_date(post.created_at),
        read = escape(post.read_time()),
        author = author,
        tags = tags,
        image = image,
        content = sanitize(&post.content),
        like = like_button(like),
        comments = comment_section(comments),
    );
    layout(&post.title, &body, toasts)
}

fn bullet_list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let lis: String = items
        .iter()
        .map(|i| format!("<li>{}</li>", escape(i)))
        .collect();
    format!("<section><h2>{}</h2><ul>{}</ul></section>", escape(title), lis)
}

pub fn project_detail(
    project: &Project,
    like: &LikeWidget,
    comments: &CommentSection,
    toasts: &[Toast],
) -> String {
    let versions: String = project
        .versions
        .iter()
        .rev()
        .map(|v| {
            let media: String = v
                .media
                .iter()
                .map(|m| {
                    format!(
                        "<figure><a href=\"{}\">{}</a><figcaption>{}</figcaption></figure>",
                        escape(&m.url),
                        match m.media_type {
                            crate::models::MediaType::Image => "Image",
                            crate::models::MediaType::Video => "Video",
                        },
                        escape(&m.caption)
                    )
                })
                .collect();
            format!(
                "<details class=\"version\"><summary>{} <small>{}</small> {}</summary>\
                 <div>{}</div>{}{}{}</details>",
                escape(&v.version),
                escape(&v.date),
                escape(&v.notes),
                sanitize(&v.description),
                bullet_list("Features", &v.features),
                bullet_list("Changes", &v.changes),
                media
            )
        })
        .collect();
    let screenshots: String = project
        .screenshots
        .iter()
        .map(|s| format!("<img src=\"{}\" alt=\"Screenshot\">", escape(s)))
        .collect();

    let body = format!(
        "<a href=\"/projects\">Back to Projects</a><article><h1>{title}</h1><p>{description}</p>\
         {tags}<div class=\"content\">{long}</div>{features}{challenges}{solutions}\
         <div class=\"screenshots\">{screenshots}</div><section class=\"versions\">\
         <h2>Version History</h2>{versions}</section>{like}</article>{comments}",
        title = escape(&project.title),
        description = escape(&project.description),
        tags = tag_list(&project.tags),
        long = sanitize(&project.long_description),
        features = bullet_list("Key Features", &project.features),
        challenges = bullet_list("Challenges", &project.challenges),
        solutions = bullet_list("Solutions", &project.solutions),
        screenshots = screenshots,
        versions = versions,
        like = like_button(like),
        comments = comment_section(comments),
    );
    layout(&project.title, &body, toasts)
}

pub fn contact(form: &ContactForm, toasts: &[Toast]) -> String {
    let body = format!(
        "<h1>Get in Touch</h1><form method=\"post\" action=\"/contact\" class=\"contact\">\
         {}{}{}{}<button type=\"submit\">Send Message</button></form>",
        text_input("name", "Name", &form.name),
        text_input("email", "Email", &form.email),
        text_input("subject", "Subject", &form.subject),
        textarea("message", "Message", &form.message),
    );
    layout("Contact", &body, toasts)
}

pub fn not_found(toasts: &[Toast]) -> String {
    layout(
        "Not Found",
        "<h1>404</h1><p>The page you are looking for does not exist.</p><a href=\"/\">Go home</a>",
        toasts,
    )
}

pub fn error_page(message: &str, toasts: &[Toast]) -> String {
    layout(
        "Error",
        &format!(
            "<h1>Something went wrong</h1><p class=\"error\">{}</p><a href=\"/\">Go home</a>",
            escape(message)
        ),
        toasts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_card_badges() {
        let project: Project = serde_json::from_value(json!({
            "_id": "p1", "title": "Alpha", "tags": ["x", "y"]
        }))
        .unwrap();
        let html = project_card(&project);
        assert!(html.contains(">Alpha</a>"));
        assert!(html.contains(">x</span>"));
        assert!(html.contains(">y</span>"));
        assert!(!html.contains("badge-outline"));
    }

    #[test]
    fn test_blog_detail_sanitizes_content() {
        let post: BlogPost = serde_json::from_value(json!({
            "_id": "b1", "title": "T", "content": "<p>ok</p><script>x()</script>"
        }))
        .unwrap();
        let store = crate::store::MemoryStore::new();
        let like = LikeWidget::mount(&store, ContentType::Blog, "b1", 0);
        let comments = CommentSection::new(ContentType::Blog, "b1");
        let html = blog_detail(&post, &like, &comments, &[]);
        assert!(html.contains("<p>ok</p>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Comments (0)"));
    }
}
