//! HTML pages of the demo site.

use axum::{extract::Path, response::Html};

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="en">
  <head><meta charset="utf-8"><title>Sign in</title></head>
  <body>
    <main>
      <h1>Sign in</h1>
      <p>Your session has not been established yet.</p>
    </main>
  </body>
</html>
"#;

pub async fn login() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn dashboard() -> Html<String> {
    Html(protected_page("/"))
}

pub async fn app(Path(path): Path<String>) -> Html<String> {
    Html(protected_page(&format!("/app/{path}")))
}

fn protected_page(path: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n  <head><meta charset=\"utf-8\"><title>{name}</title></head>\n  <body>\n    <main>\n      <h1>{name}</h1>\n      <p>Signed in. Viewing <code>{path}</code>.</p>\n    </main>\n  </body>\n</html>\n",
        name = env!("CARGO_PKG_NAME"),
        path = escape_html(path),
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
