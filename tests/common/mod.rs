#![allow(dead_code)]

use serde_json::{json, Value};
use site_updates::config::FetchConfig;
use site_updates::SourceDescriptor;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_AGENT: &str = "site-updates-tests";

pub fn fetch_config(server: &MockServer) -> FetchConfig {
    FetchConfig {
        user_agent: USER_AGENT.to_string(),
        github_api_base: server.uri(),
        ..FetchConfig::default()
    }
}

pub fn feed_source(server: &MockServer, name: &str, feed_path: &str) -> SourceDescriptor {
    SourceDescriptor::new(name, format!("https://{name}.example"))
        .with_feed(format!("{}{}", server.uri(), feed_path))
}

/// RSS document with one item per `(title, pubDate)` pair
pub fn rss(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, (title, date))| {
            format!(
                "<item><title>{title}</title><link>https://blog.example/{i}</link><pubDate>{date}</pubDate></item>\n"
            )
        })
        .collect();
    format!("<?xml version=\"1.0\"?>\n<rss version=\"2.0\"><channel>\n<title>Blog</title>\n{body}</channel></rss>\n")
}

/// Commit API record in the shape the commits endpoint returns
pub fn commit(message: &str, date: &str, sha: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/me/tool/commit/{sha}"),
        "commit": {
            "message": message,
            "author": { "name": "me", "date": date },
            "committer": { "name": "me", "date": date }
        }
    })
}

pub async fn serve(server: &MockServer, at: &str, status: u16, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(body.into()))
        .mount(server)
        .await;
}
