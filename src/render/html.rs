use chrono::{DateTime, Utc};

use crate::views::notify::Toast;
use crate::views::public::tag_badges;

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strips scripts, handlers and unknown tags from backend-supplied rich HTML.
pub fn sanitize(html: &str) -> String {
    ammonia::clean(html)
}

/// `March 1, 2024`
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Coarse "3 days ago" style distance from `now`.
pub fn time_ago(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return String::new();
    };
    let secs = (now - date).num_seconds().max(0);
    let (value, unit) = match secs {
        0..=59 => return "just now".to_string(),
        60..=3599 => (secs / 60, "minute"),
        3600..=86_399 => (secs / 3600, "hour"),
        86_400..=2_591_999 => (secs / 86_400, "day"),
        2_592_000..=31_535_999 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{} {}{} ago", value, unit, plural)
}

pub fn badge(text: &str, class: &str) -> String {
    format!("<span class=\"badge {}\">{}</span>", class, escape(text))
}

/// Up to three tag badges followed by a `+N` overflow badge.
pub fn tag_list(tags: &[String]) -> String {
    let badges = tag_badges(tags);
    let mut out = String::from("<div class=\"tags\">");
    for tag in badges.shown {
        out.push_str(&badge(tag, "badge-secondary"));
    }
    if badges.overflow > 0 {
        out.push_str(&badge(&format!("+{}", badges.overflow), "badge-outline"));
    }
    out.push_str("</div>");
    out
}

pub fn toast_banner(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"toasts\" role=\"status\">");
    for toast in toasts {
        let class = if toast.is_error() {
            "toast toast-destructive"
        } else {
            "toast"
        };
        out.push_str(&format!("<div class=\"{}\">", class));
        if let Some(title) = &toast.title {
            out.push_str(&format!("<strong>{}</strong> ", escape(title)));
        }
        out.push_str(&format!("<span>{}</span></div>", escape(&toast.description)));
    }
    out.push_str("</div>");
    out
}

pub fn hidden(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
        name,
        escape(value)
    )
}

pub fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" value=\"{value}\"></label>",
        label = escape(label),
        name = name,
        value = escape(value)
    )
}

pub fn textarea(name: &str, label: &str, value: &str) -> String {
    format!(
        "<label>{label}<textarea name=\"{name}\">{value}</textarea></label>",
        label = escape(label),
        name = name,
        value = escape(value)
    )
}

pub fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<label><input type=\"checkbox\" name=\"{}\" value=\"true\"{}> {}</label>",
        name,
        if checked { " checked" } else { "" },
        escape(label)
    )
}

/// A submit button posting `action` (and optionally `value`) with the surrounding form.
pub fn action_button(action: &str, value: Option<&str>, label: &str) -> String {
    let value = value
        .map(|v| format!("{}:{}", action, v))
        .unwrap_or_else(|| action.to_string());
    format!(
        "<button type=\"submit\" name=\"action\" value=\"{}\">{}</button>",
        escape(&value),
        escape(label)
    )
}

const PUBLIC_NAV: &str = "<nav class=\"site-nav\"><a href=\"/\">Home</a> \
    <a href=\"/projects\">Projects</a> <a href=\"/blog\">Blog</a> \
    <a href=\"/contact\">Contact</a></nav>";

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn layout(title: &str, body: &str, toasts: &[Toast]) -> String {
    document(
        title,
        &format!(
            "{}\n{}\n<main class=\"container\">{}</main>",
            PUBLIC_NAV,
            toast_banner(toasts),
            body
        ),
    )
}

/// Dashboard chrome: sidebar, header with the signed-in user, content.
pub fn dashboard_layout(title: &str, user_name: &str, body: &str, toasts: &[Toast]) -> String {
    let initial: String = user_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    let sidebar = "<aside class=\"sidebar\"><a href=\"/dashboard\">Overview</a> \
        <a href=\"/dashboard/blogs\">Blogs</a> <a href=\"/dashboard/projects\">Projects</a> \
        <a href=\"/dashboard/messages\">Messages</a> \
        <a href=\"/dashboard/subscribers\">Subscribers</a></aside>";
    let header = format!(
        "<header class=\"dashboard-header\"><span class=\"avatar\">{}</span> <span>{}</span> \
         <a href=\"/dashboard/logout\">Log out</a></header>",
        escape(&initial),
        escape(user_name)
    );
    document(
        &format!("{} | Dashboard", title),
        &format!(
            "<div class=\"dashboard\">{}<div class=\"dashboard-main\">{}\n{}\n<main>{}</main></div></div>",
            sidebar,
            header,
            toast_banner(toasts),
            body
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_sanitize_strips_script() {
        let clean = sanitize("<p>Hi</p><script>alert(1)</script><img src=x onerror=alert(1)>");
        assert!(clean.contains("<p>Hi</p>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onerror"));
    }

    #[test]
    fn test_tag_list_overflow_badge() {
        let tags: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let html = tag_list(&tags);
        assert_eq!(html.matches("badge-secondary").count(), 3);
        assert!(html.contains(">+1<"));
    }

    #[test]
    fn test_dates() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(format_date(Some(date)), "March 1, 2024");
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        assert_eq!(time_ago(Some(date), now), "3 days ago");
        assert_eq!(time_ago(Some(now), now), "just now");
    }
}
