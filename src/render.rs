use axum::response::Html;

use crate::models::{Flash, Task};

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fills the `{{name}}` slots of an embedded template and rewrites absolute
/// links for the configured base path. Values containing user input must
/// already be escaped.
pub fn page(template: &str, vars: &[(&str, &str)], base_path: &str) -> Html<String> {
    let mut html = template.to_string();
    for (name, value) in vars {
        html = html.replace(&format!("{{{{{name}}}}}"), value);
    }
    Html(inject_base_path(&html, base_path))
}

pub fn flash_html(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => format!(
            r#"<p class="flash {}">{}</p>"#,
            flash.kind.as_str(),
            html_escape(&flash.text)
        ),
        None => String::new(),
    }
}

pub fn errors_html(errors: &[&str]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", html_escape(e)))
        .collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}

pub fn task_rows(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return r#"<li class="empty">Nothing here yet. Add your first task above.</li>"#.into();
    }

    tasks
        .iter()
        .map(|task| {
            format!(
                concat!(
                    "<li><span class=\"title\">{title}</span>",
                    "<span class=\"controls\">",
                    "<a class=\"button small\" href=\"/users/tasks/edit/{id}\">Edit</a>",
                    "<form method=\"post\" action=\"/users/tasks/delete/{id}\">",
                    "<button class=\"small danger\" type=\"submit\">Delete</button>",
                    "</form></span></li>\n"
                ),
                title = html_escape(&task.title),
                id = task.id,
            )
        })
        .collect()
}

fn inject_base_path(html: &str, base_path: &str) -> String {
    if base_path.is_empty() {
        return html.to_string();
    }

    html.replace("href=\"/", &format!("href=\"{}/", base_path))
        .replace("src=\"/", &format!("src=\"{}/", base_path))
        .replace("action=\"/", &format!("action=\"{}/", base_path))
}
