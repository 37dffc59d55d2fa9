use chrono::Utc;

use super::html::{
    action_button, badge, checkbox, dashboard_layout, escape, format_date, hidden, layout,
    tag_list, text_input, textarea, time_ago,
};
use crate::models::{BlogPost, ContactMessage, DashboardStats, MediaType, Project, ResourceKind, Subscriber};
use crate::views::blog_form::BlogEditor;
use crate::views::list::{EmptyState, ListResource, ListView, PendingAction, StatusFilter};
use crate::views::message::MessageDetail;
use crate::views::notify::Toast;
use crate::views::overview::{chart_points, recent_items, stat_cards};
use crate::views::project_form::ProjectEditor;

// ============================================================================
// Tables
// ============================================================================

/// Column layout of a dashboard list.
pub trait TableRow: ListResource {
    const HEADERS: &'static [&'static str];

    /// Cell markup, already escaped.
    fn cells(&self) -> Vec<String>;

    /// Optional per-row link (edit page or detail view).
    fn row_link(&self) -> Option<String> {
        None
    }

    /// Label of the toggle action for the row's current state.
    fn toggle_label(&self) -> &'static str;

    /// Whether a "New" button is offered above the table.
    fn creatable() -> bool {
        false
    }
}

fn status_badge(kind: ResourceKind, flag: bool) -> String {
    let class = if flag { "badge-default" } else { "badge-secondary" };
    badge(kind.status_label(flag), class)
}

impl TableRow for BlogPost {
    const HEADERS: &'static [&'static str] = &["Title", "Tags", "Status", "Date"];

    fn cells(&self) -> Vec<String> {
        vec![
            escape(&self.title),
            tag_list(&self.tags),
            status_badge(Self::KIND, self.published),
            format_date(self.created_at),
        ]
    }

    fn row_link(&self) -> Option<String> {
        Some(format!("/dashboard/blogs/edit/{}", urlencoding::encode(&self.id)))
    }

    fn toggle_label(&self) -> &'static str {
        if self.published {
            "Unpublish"
        } else {
            "Publish"
        }
    }

    fn creatable() -> bool {
        true
    }
}

impl TableRow for Project {
    const HEADERS: &'static [&'static str] = &["Title", "Tags", "Status", "Date"];

    fn cells(&self) -> Vec<String> {
        vec![
            escape(&self.title),
            tag_list(&self.tags),
            status_badge(Self::KIND, self.published),
            format_date(self.created_at),
        ]
    }

    fn row_link(&self) -> Option<String> {
        Some(format!("/projects/{}", urlencoding::encode(&self.id)))
    }

    fn toggle_label(&self) -> &'static str {
        if self.published {
            "Unpublish"
        } else {
            "Publish"
        }
    }

    fn creatable() -> bool {
        true
    }
}

impl TableRow for ContactMessage {
    const HEADERS: &'static [&'static str] = &["Name", "Subject", "Status", "Received"];

    fn cells(&self) -> Vec<String> {
        vec![
            format!("{}<br><small>{}</small>", escape(&self.name), escape(&self.email)),
            escape(&self.subject),
            status_badge(Self::KIND, self.read),
            time_ago(self.created_at, Utc::now()),
        ]
    }

    fn row_link(&self) -> Option<String> {
        Some(format!("/dashboard/messages/{}", urlencoding::encode(&self.id)))
    }

    fn toggle_label(&self) -> &'static str {
        if self.read {
            "Mark as Unread"
        } else {
            "Mark as Read"
        }
    }
}

impl TableRow for Subscriber {
    const HEADERS: &'static [&'static str] = &["Email", "Status", "Subscribed"];

    fn cells(&self) -> Vec<String> {
        vec![
            escape(&self.email),
            status_badge(Self::KIND, self.active),
            format_date(self.created_at),
        ]
    }

    fn toggle_label(&self) -> &'static str {
        if self.active {
            "Deactivate"
        } else {
            "Activate"
        }
    }
}

fn list_path<R: TableRow>() -> String {
    format!("/dashboard/{}", R::KIND.slug())
}

fn action_path<R: TableRow>(id: &str, action: &str) -> String {
    format!(
        "/dashboard/{}/{}/{}",
        R::KIND.slug(),
        urlencoding::encode(id),
        action
    )
}

fn filter_form<R: TableRow>(view: &ListView<R>) -> String {
    let on = R::KIND.status_label(true);
    let off = R::KIND.status_label(false);
    let selected = |filter: StatusFilter| {
        if view.status_filter() == filter {
            " selected"
        } else {
            ""
        }
    };
    format!(
        "<form method=\"get\" action=\"{path}\" class=\"filters\">\
         <input type=\"search\" name=\"q\" value=\"{q}\" placeholder=\"Search {plural}...\">\
         <select name=\"status\"><option value=\"all\"{all}>All</option>\
         <option value=\"{on_value}\"{on_sel}>{on}</option>\
         <option value=\"{off_value}\"{off_sel}>{off}</option></select>\
         <button type=\"submit\">Filter</button></form>",
        path = list_path::<R>(),
        q = escape(view.search_term()),
        plural = R::PLURAL,
        all = selected(StatusFilter::All),
        on_value = on.to_lowercase(),
        on_sel = selected(StatusFilter::On),
        on = on,
        off_value = off.to_lowercase(),
        off_sel = selected(StatusFilter::Off),
        off = off,
    )
}

fn empty_state<R: TableRow>(state: EmptyState) -> String {
    let subtitle = match state {
        EmptyState::NoResults => format!(
            "No {} match your filters. Try different search terms or filters.",
            R::PLURAL
        ),
        EmptyState::Nothing => R::nothing_yet(),
    };
    format!(
        "<div class=\"empty\"><h3>No {} found</h3><p>{}</p></div>",
        R::PLURAL,
        escape(&subtitle)
    )
}

fn table<R: TableRow>(view: &ListView<R>) -> String {
    let head: String = R::HEADERS
        .iter()
        .map(|h| format!("<th>{}</th>", h))
        .chain(std::iter::once("<th>Actions</th>".to_string()))
        .collect();
    let rows: String = view
        .visible()
        .into_iter()
        .map(|item| {
            let cells: String = item
                .cells()
                .into_iter()
                .map(|c| format!("<td>{}</td>", c))
                .collect();
            let open = item
                .row_link()
                .map(|href| format!("<a href=\"{}\">Open</a> ", escape(&href)))
                .unwrap_or_default();
            format!(
                "<tr>{cells}<td>{open}<a href=\"{toggle}\">{toggle_label}</a> \
                 <a href=\"{delete}\" class=\"destructive\">Delete</a></td></tr>",
                cells = cells,
                open = open,
                toggle = action_path::<R>(item.id(), "toggle"),
                toggle_label = item.toggle_label(),
                delete = action_path::<R>(item.id(), "delete"),
            )
        })
        .collect();
    format!(
        "<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
        head, rows
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn list_page<R: TableRow>(view: &ListView<R>, user_name: &str, toasts: &[Toast]) -> String {
    let title = capitalize(R::KIND.slug());
    let new_button = if R::creatable() {
        format!(
            "<a class=\"button\" href=\"{}/new\">New {}</a>",
            list_path::<R>(),
            R::KIND.label()
        )
    } else {
        String::new()
    };
    let content = match view.empty_state() {
        Some(state) => empty_state::<R>(state),
        None => table(view),
    };
    let body = format!(
        "<div class=\"page-header\"><h1>{}</h1>{}</div>{}{}",
        title,
        new_button,
        filter_form(view),
        content
    );
    dashboard_layout(&title, user_name, &body, toasts)
}

/// Dialog for the list's pending action. Posting the form confirms it.
pub fn confirm_page<R: TableRow>(view: &ListView<R>, user_name: &str, toasts: &[Toast]) -> String {
    let (Some(action), Some(item)) = (view.pending(), view.pending_item()) else {
        return list_page(view, user_name, toasts);
    };
    let label = R::KIND.label().to_lowercase();
    let (title, description, path, button) = match action {
        PendingAction::Delete(id) => (
            "Are you sure?".to_string(),
            format!(
                "This action cannot be undone. This will permanently delete the {}.",
                label
            ),
            action_path::<R>(id, "delete"),
            "Delete",
        ),
        PendingAction::Toggle(id) => (
            item.toggle_prompt(),
            format!("This will change the status of the {}.", label),
            action_path::<R>(id, "toggle"),
            item.toggle_label(),
        ),
    };
    let body = format!(
        "<div class=\"dialog\" role=\"alertdialog\"><h2>{title}</h2><p>{description}</p>\
         <form method=\"post\" action=\"{path}\"><a href=\"{cancel}\">Cancel</a> \
         <button type=\"submit\">{button}</button></form></div>",
        title = escape(&title),
        description = escape(&description),
        path = escape(&path),
        cancel = list_path::<R>(),
        button = escape(button),
    );
    dashboard_layout(&title, user_name, &body, toasts)
}

// ============================================================================
// Login & overview
// ============================================================================

pub fn login_page(email: &str, toasts: &[Toast]) -> String {
    let body = format!(
        "<div class=\"card login\"><h1>Admin Login</h1>\
         <form method=\"post\" action=\"/dashboard/login\">{}\
         <label>Password<input type=\"password\" name=\"password\"></label>\
         <button type=\"submit\">Login</button></form></div>",
        text_input("email", "Email", email)
    );
    layout("Login", &body, toasts)
}

pub fn overview_page(stats: Option<&DashboardStats>, user_name: &str, toasts: &[Toast]) -> String {
    let Some(stats) = stats else {
        return dashboard_layout(
            "Overview",
            user_name,
            "<h1>Dashboard</h1><p class=\"error\">Statistics are unavailable.</p>",
            toasts,
        );
    };

    let cards: String = stat_cards(stats)
        .iter()
        .map(|card| {
            let split = card
                .split
                .map(|[(a, x), (b, y)]| format!("<p>{}: {} / {}: {}</p>", a, x, b, y))
                .unwrap_or_default();
            format!(
                "<a class=\"card stat\" href=\"{}\"><h3>{}</h3><strong>{}</strong>{}</a>",
                card.link, card.title, card.total, split
            )
        })
        .collect();

    let chart_rows: String = chart_points(&stats.server_health)
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}%</td><td>{}%</td><td>{}</td><td>{}</td></tr>",
                p.name, p.cpu, p.memory, p.requests, p.errors
            )
        })
        .collect();

    let recent: String = [
        (ResourceKind::Blog, "Recent Blogs"),
        (ResourceKind::Project, "Recent Projects"),
        (ResourceKind::Comment, "Recent Comments"),
        (ResourceKind::Message, "Recent Messages"),
    ]
    .iter()
    .map(|(kind, heading)| {
        let items: String = recent_items(stats, *kind)
            .iter()
            .map(|item| {
                let title = match &item.link {
                    Some(href) => format!("<a href=\"{}\">{}</a>", escape(href), escape(&item.title)),
                    None => escape(&item.title),
                };
                let author = item
                    .author
                    .as_deref()
                    .map(|a| format!(" <small>by {}</small>", escape(a)))
                    .unwrap_or_default();
                format!(
                    "<li>{}{} <span>{}</span> {}</li>",
                    title,
                    author,
                    format_date(item.date),
                    status_badge(*kind, item.flag)
                )
            })
            .collect();
        let items = if items.is_empty() {
            "<li class=\"empty\">Nothing yet</li>".to_string()
        } else {
            items
        };
        format!("<section class=\"recent\"><h2>{}</h2><ul>{}</ul></section>", heading, items)
    })
    .collect();

    let body = format!(
        "<h1>Dashboard</h1><div class=\"stats\">{}</div>\
         <section class=\"chart\"><h2>Server Health</h2><table><thead><tr><th>Time</th>\
         <th>CPU</th><th>Memory</th><th>Requests</th><th>Errors</th></tr></thead>\
         <tbody>{}</tbody></table></section>{}",
        cards, chart_rows, recent
    );
    dashboard_layout("Overview", user_name, &body, toasts)
}

// ============================================================================
// Editors
// ============================================================================

/// Values with a remove button each; `action` receives the value.
fn value_list(values: &[String], action: &str) -> String {
    let items: String = values
        .iter()
        .map(|v| {
            format!(
                "<li>{} {}</li>",
                escape(v),
                action_button(action, Some(v.as_str()), "Remove")
            )
        })
        .collect();
    format!("<ul class=\"values\">{}</ul>", items)
}

/// Values removed by position.
fn indexed_list(values: &[String], action: &str) -> String {
    let items: String = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            format!(
                "<li>{} {}</li>",
                escape(v),
                action_button(action, Some(i.to_string().as_str()), "Remove")
            )
        })
        .collect();
    format!("<ul class=\"values\">{}</ul>", items)
}

fn set_field(label: &str, input: &str, values: &[String], noun: &str) -> String {
    format!(
        "<fieldset><legend>{}</legend>{}{}{}</fieldset>",
        escape(label),
        text_input(&format!("{}_input", noun), &format!("Add {}", noun.replace('_', " ")), input),
        action_button(&format!("add_{}", noun), None, "Add"),
        value_list(values, &format!("remove_{}", noun)),
    )
}

fn image_field(image: &str, file_field: &str, action: &str) -> String {
    let preview = if image.is_empty() {
        String::new()
    } else {
        format!("<img class=\"preview\" src=\"{}\" alt=\"Preview\">", escape(image))
    };
    format!(
        "<fieldset><legend>Image</legend>{}{}\
         <input type=\"file\" name=\"{}\" accept=\"image/*\">{}</fieldset>",
        text_input("image", "Image URL", image),
        preview,
        file_field,
        action_button(action, None, "Upload")
    )
}

fn state_field<T: serde::Serialize>(state: &T) -> String {
    let json = serde_json::to_string(state).unwrap_or_default();
    hidden("state", &json)
}

pub fn blog_editor_page(editor: &BlogEditor, user_name: &str, toasts: &[Toast]) -> String {
    let form = &editor.form;
    let (title, action, submit) = match &editor.editing {
        Some(id) => (
            "Edit Blog",
            format!("/dashboard/blogs/edit/{}", urlencoding::encode(id)),
            "Update Blog",
        ),
        None => ("Create Blog", "/dashboard/blogs/new".to_string(), "Create Blog"),
    };
    let body = format!(
        "<h1>{title}</h1><form method=\"post\" action=\"{action}\" enctype=\"multipart/form-data\">\
         {state}{title_input}{excerpt}{content}{tags}{image}{published}\
         <div class=\"form-actions\"><a href=\"/dashboard/blogs\">Cancel</a> {submit}</div></form>",
        title = title,
        action = escape(&action),
        state = state_field(editor),
        title_input = text_input("title", "Title", &form.title),
        excerpt = textarea("excerpt", "Excerpt", &form.excerpt),
        content = textarea("content", "Content", &form.content),
        tags = set_field("Tags", "", &form.tags, "tag"),
        image = image_field(&form.image, "image_file", "upload_image"),
        published = checkbox("published", "Published", form.published),
        submit = action_button("submit", None, submit),
    );
    dashboard_layout(title, user_name, &body, toasts)
}

fn version_panel(editor: &ProjectEditor) -> String {
    let active = editor.active_index();
    editor
        .form
        .versions
        .iter()
        .enumerate()
        .map(|(i, version)| {
            let header = format!(
                "<div class=\"version-header\">{} <small>{}</small> {} {}</div>",
                escape(&version.version),
                escape(&version.date),
                action_button("set_active", Some(i.to_string().as_str()), "Edit"),
                action_button("remove_version", Some(i.to_string().as_str()), "Remove")
            );
            if i != active {
                return format!("<div class=\"version\">{}</div>", header);
            }
            let media: String = version
                .media
                .iter()
                .enumerate()
                .map(|(m, item)| {
                    let kind = match item.media_type {
                        MediaType::Image => "Image",
                        MediaType::Video => "Video",
                    };
                    format!(
                        "<li>{} <a href=\"{}\">{}</a> {}</li>",
                        kind,
                        escape(&item.url),
                        escape(&item.caption),
                        action_button("remove_media", Some(m.to_string().as_str()), "Remove")
                    )
                })
                .collect();
            format!(
                "<div class=\"version active\">{header}{label}{date}{notes}{description}\
                 {features}<fieldset><legend>Changes</legend>{change_input}{add_change}{changes}</fieldset>\
                 <fieldset><legend>Media</legend><ul>{media}</ul>\
                 <select name=\"media_type\"><option value=\"image\">Image</option>\
                 <option value=\"video\">Video</option></select>{media_url}{media_caption}{add_media}\
                 </fieldset></div>",
                header = header,
                label = text_input("version_label", "Version", &version.version),
                date = text_input("version_date", "Date", &version.date),
                notes = text_input("version_notes", "Release Notes", &version.notes),
                description = textarea("version_description", "Description", &version.description),
                features = set_field("Version Features", "", &version.features, "version_feature"),
                change_input = text_input("version_change_input", "Add change", ""),
                add_change = action_button("add_version_change", None, "Add"),
                changes = value_list(&version.changes, "remove_version_change"),
                media = media,
                media_url = text_input("media_url", "Media URL", ""),
                media_caption = text_input("media_caption", "Caption", ""),
                add_media = action_button("add_media", None, "Add Media"),
            )
        })
        .collect()
}

pub fn project_editor_page(editor: &ProjectEditor, user_name: &str, toasts: &[Toast]) -> String {
    let form = &editor.form;
    let screenshots = format!(
        "<fieldset><legend>Screenshots</legend>{}\
         <input type=\"file\" name=\"screenshot_file\" accept=\"image/*\">{}</fieldset>",
        indexed_list(&form.screenshots, "remove_screenshot"),
        action_button("upload_screenshot", None, "Upload Screenshot")
    );
    let body = format!(
        "<h1>Create Project</h1><form method=\"post\" action=\"/dashboard/projects/new\" \
         enctype=\"multipart/form-data\">{state}{title}{description}{long}{demo}{repo}{image}\
         {tags}{features}{challenges}{solutions}{screenshots}\
         <section class=\"versions\"><h2>Versions</h2>{versions}{add_version}</section>{published}\
         <div class=\"form-actions\"><a href=\"/dashboard/projects\">Cancel</a> {submit}</div></form>",
        state = state_field(editor),
        title = text_input("title", "Title", &form.title),
        description = textarea("description", "Short Description", &form.description),
        long = textarea("long_description", "Long Description", &form.long_description),
        demo = text_input("demo_url", "Demo URL", &form.demo_url),
        repo = text_input("repo_url", "Repository URL", &form.repo_url),
        image = image_field(&form.image, "image_file", "upload_image"),
        tags = set_field("Tags", "", &form.tags, "tag"),
        features = set_field("Features", "", &form.features, "feature"),
        challenges = set_field("Challenges", "", &form.challenges, "challenge"),
        solutions = set_field("Solutions", "", &form.solutions, "solution"),
        screenshots = screenshots,
        versions = version_panel(editor),
        add_version = action_button("add_version", None, "Add Version"),
        published = checkbox("published", "Published", form.published),
        submit = action_button("submit", None, "Create Project"),
    );
    dashboard_layout("Create Project", user_name, &body, toasts)
}

// ============================================================================
// Messages
// ============================================================================

pub fn message_page(detail: &MessageDetail, user_name: &str, toasts: &[Toast]) -> String {
    let message = detail.message();
    let id = urlencoding::encode(&message.id);
    let toggle = if message.read {
        "Mark as Unread"
    } else {
        "Mark as Read"
    };
    let body = format!(
        "<a href=\"/dashboard/messages\">Back to Messages</a><article class=\"card message\">\
         <h1>{subject}</h1><p>From {name} &lt;<a href=\"mailto:{email}\">{email}</a>&gt;</p>\
         <p class=\"meta\">{date} {status}</p><div class=\"body\">{text}</div>\
         <form method=\"post\" action=\"/dashboard/messages/{id}/read\">\
         <button type=\"submit\">{toggle}</button></form>\
         <form method=\"post\" action=\"/dashboard/messages/{id}/remove\">\
         <button type=\"submit\" class=\"destructive\">Delete</button></form></article>",
        subject = escape(&message.subject),
        name = escape(&message.name),
        email = escape(&message.email),
        date = format_date(message.created_at),
        status = status_badge(ResourceKind::Message, message.read),
        text = escape(&message.message).replace('\n', "<br>"),
        id = id,
        toggle = toggle,
    );
    dashboard_layout("Message", user_name, &body, toasts)
}
