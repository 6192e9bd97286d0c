mod common;

use std::fs;

use common::{commit, feed_source, fetch_config, rss, serve};
use serde_json::json;
use site_updates::config::RankingConfig;
use site_updates::{
    load_sources, Aggregator, HttpFetcher, JsonSnapshotStore, SnapshotStore, SourceDescriptor,
};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mixed_sources(server: &MockServer) -> Vec<SourceDescriptor> {
    serve(
        server,
        "/blog.xml",
        200,
        rss(&[
            ("Blog 4", "Thu, 04 Jan 2024 09:00:00 GMT"),
            ("Blog 3", "Wed, 03 Jan 2024 09:00:00 GMT"),
            ("Blog 2", "Tue, 02 Jan 2024 09:00:00 GMT"),
            ("Blog 1", "Mon, 01 Jan 2024 09:00:00 GMT"),
        ]),
    )
    .await;
    serve(
        server,
        "/notes.json",
        200,
        json!([
            { "title": "Undated note" },
            { "title": "Note", "date": "2024-01-03T12:00:00Z", "url": "https://notes.example/n" }
        ])
        .to_string(),
    )
    .await;
    serve(server, "/broken.xml", 500, "oops").await;
    Mock::given(method("GET"))
        .and(path("/repos/me/tool/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            commit("Tool release", "2024-01-05T00:00:00Z", "f1"),
            commit("Tool fix", "2023-12-20T00:00:00Z", "f0"),
        ])))
        .mount(server)
        .await;

    vec![
        feed_source(server, "blog", "/blog.xml"),
        feed_source(server, "notes", "/notes.json"),
        feed_source(server, "tool", "/broken.xml").with_repo("me/tool"),
        SourceDescriptor::new("idle", "https://idle.example"),
    ]
}

#[tokio::test]
async fn build_ranks_caps_and_persists() {
    let server = MockServer::start().await;
    let sources = mixed_sources(&server).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("data/updates.json");

    let fetcher = HttpFetcher::new(&fetch_config(&server)).unwrap();
    let aggregator = Aggregator::new(
        fetcher,
        JsonSnapshotStore::new(&output),
        RankingConfig {
            per_source_cap: 3,
            max_items: 5,
        },
    );

    let snapshot = aggregator.run(&sources).await.unwrap();

    let titles: Vec<&str> = snapshot.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Tool release", "Blog 4", "Note", "Blog 3", "Blog 2"]
    );

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.ends_with("}\n"));
    assert!(!content.contains("Undated note"));
    assert!(!content.contains("Blog 1"));

    let reloaded = JsonSnapshotStore::new(&output).load().unwrap().unwrap();
    assert_eq!(reloaded, snapshot);
}

#[tokio::test]
async fn rebuilding_changes_only_generated_at() {
    let server = MockServer::start().await;
    let sources = mixed_sources(&server).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("updates.json");

    let aggregator = Aggregator::new(
        HttpFetcher::new(&fetch_config(&server)).unwrap(),
        JsonSnapshotStore::new(&output),
        RankingConfig::default(),
    )
    .with_concurrency(3);

    let first = aggregator.run(&sources).await.unwrap();
    let second = aggregator.run(&sources).await.unwrap();

    assert_eq!(first.items, second.items);
    assert_eq!(aggregator.store().load().unwrap().unwrap(), second);
}

#[tokio::test]
async fn build_from_source_list_file() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/only.xml",
        200,
        rss(&[("Only", "Mon, 01 Jan 2024 09:00:00 GMT")]),
    )
    .await;

    let dir = tempdir().unwrap();
    let sources_path = dir.path().join("sources.json");
    fs::write(
        &sources_path,
        json!({
            "sources": [
                { "name": "only", "site": "https://only.example", "feed": format!("{}/only.xml", server.uri()) },
                { "name": "nothing", "site": "https://nothing.example" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let sources = load_sources(&sources_path).unwrap();
    let aggregator = Aggregator::new(
        HttpFetcher::new(&fetch_config(&server)).unwrap(),
        JsonSnapshotStore::new(dir.path().join("updates.json")),
        RankingConfig::default(),
    );

    let snapshot = aggregator.run(&sources).await.unwrap();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].source, "only");
}

#[tokio::test]
async fn all_sources_failing_still_writes_empty_snapshot() {
    let server = MockServer::start().await;
    serve(&server, "/down.xml", 502, "").await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("updates.json");
    let aggregator = Aggregator::new(
        HttpFetcher::new(&fetch_config(&server)).unwrap(),
        JsonSnapshotStore::new(&output),
        RankingConfig::default(),
    );

    let snapshot = aggregator
        .run(&[feed_source(&server, "down", "/down.xml")])
        .await
        .unwrap();

    assert!(snapshot.items.is_empty());
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["items"], json!([]));
    assert!(written["generated_at"].as_str().unwrap().ends_with('Z'));
}
