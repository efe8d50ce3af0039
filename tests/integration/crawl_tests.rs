//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for the archive and run the full
//! pipeline end-to-end into temporary stores.

use jarchive_scraper::config::Config;
use jarchive_scraper::crawler::{run_scrape, CrawlPlan};
use jarchive_scraper::storage::{DocumentSink, Sink, SqliteSink, StoreTotals};
use jarchive_scraper::ScrapeError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock archive
fn create_test_config(base_url: &str, connection: String) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = base_url.to_string();
    config.crawler.workers = 3;
    config.crawler.poll_interval_ms = 20; // Very short for testing
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.storage.connection = connection;
    config.storage.connect_attempts = 2;
    config.storage.connect_interval_ms = 10;
    config
}

fn sqlite_connection(path: &Path) -> String {
    format!("sqlite:///{}", path.display())
}

fn stored_totals(path: &Path) -> StoreTotals {
    let mut sink = SqliteSink::new(path);
    sink.init_connection().expect("Failed to reopen database");
    sink.totals().expect("Failed to count rows")
}

fn landing_page(current: u32) -> String {
    format!(
        r#"<html><body><table class="fullpageheight"><tr><td>
        <a href="showseason.php?season={current}">Season {current}</a>
        <a href="listseasons.php">All seasons</a>
        </td></tr></table></body></html>"#
    )
}

fn season_page(games: &[u32]) -> String {
    let rows: String = games
        .iter()
        .map(|id| {
            format!(
                r#"<tr><td align="left" valign="top" style="width:140px"><a href="showgame.php?game_id={id}">#{id}</a></td><td>aired</td></tr>"#
            )
        })
        .collect();
    format!("<html><body><table>{rows}</table></body></html>")
}

/// A well-formed 6x5 round whose titles and clues start with `prefix`
fn round(prefix: &str) -> String {
    let mut html = String::from(r#"<table class="round"><tr>"#);
    for col in 0..6 {
        html.push_str(&format!(
            r#"<td class="category"><table><tr><td class="category_name">{prefix} CATEGORY {col}</td></tr></table></td>"#
        ));
    }
    html.push_str("</tr>");
    for row in 0..5 {
        html.push_str("<tr>");
        for col in 0..6 {
            html.push_str(&format!(
                r#"<td class="clue"><table><tr><td><div onmouseover="toggle('c', 'c_stuck', '&lt;em class=&quot;correct_response&quot;&gt;{prefix} answer {row}{col}&lt;/em&gt;')"><table><tr><td class="clue_value">${value}</td></tr></table></div></td></tr><tr><td class="clue_text">{prefix} question {row}{col}</td></tr></table></td>"#,
                value = (row + 1) * 200
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn game_page(rounds: &[&str]) -> String {
    let rounds: String = rounds.iter().map(|prefix| round(prefix)).collect();
    format!("<html><head><title>Game</title></head><body>{rounds}</body></html>")
}

async fn mount_landing(server: &MockServer, current: u32) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_page(current)))
        .mount(server)
        .await;
}

async fn mount_season(server: &MockServer, season: u32, games: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/showseason.php"))
        .and(query_param("season", season.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(season_page(games)))
        .mount(server)
        .await;
}

async fn mount_game(server: &MockServer, id: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/showgame.php"))
        .and(query_param("game_id", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scrape_all_seasons_from_landing_page() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("jarchive.db");

    mount_landing(&mock_server, 2).await;
    mount_season(&mock_server, 2, &[21, 22]).await;
    mount_season(&mock_server, 1, &[11]).await;
    mount_game(&mock_server, 21, game_page(&["A"])).await;
    mount_game(&mock_server, 22, game_page(&["B"])).await;
    mount_game(&mock_server, 11, game_page(&["C"])).await;

    // The walk stops at season 1
    Mock::given(method("GET"))
        .and(path("/showseason.php"))
        .and(query_param("season", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(season_page(&[1])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), sqlite_connection(&db_path));
    let summary = run_scrape(config, CrawlPlan::everything())
        .await
        .expect("Scrape failed");

    assert_eq!(summary.seasons_visited, 2);
    assert_eq!(summary.urls_queued, 3);
    assert_eq!(summary.boards_saved, 3);
    assert_eq!(summary.categories, 18);
    assert_eq!(summary.clues, 90);
    assert_eq!(
        summary.headline(),
        "18 categories and 90 clues were collected"
    );

    assert_eq!(
        stored_totals(&db_path),
        StoreTotals {
            categories: 18,
            clues: 90
        }
    );
}

#[tokio::test]
async fn test_two_round_page_saves_twelve_categories() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("two_rounds.db");

    mount_season(&mock_server, 7, &[701]).await;
    mount_game(&mock_server, 701, game_page(&["JEOPARDY", "DOUBLE"])).await;

    let config = create_test_config(&mock_server.uri(), sqlite_connection(&db_path));
    let summary = run_scrape(config, CrawlPlan::single(7))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.boards_saved, 1);
    assert_eq!(summary.categories, 12);
    assert_eq!(summary.clues, 60);
    assert_eq!(stored_totals(&db_path).categories, 12);
}

#[tokio::test]
async fn test_failing_game_page_is_dropped() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("failures.db");

    mount_season(&mock_server, 3, &[31, 32]).await;
    mount_game(&mock_server, 31, game_page(&["OK"])).await;
    Mock::given(method("GET"))
        .and(path("/showgame.php"))
        .and(query_param("game_id", "32"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), sqlite_connection(&db_path));
    let summary = run_scrape(config, CrawlPlan::single(3))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.urls_queued, 2);
    assert_eq!(summary.transport_failures, 1);
    assert_eq!(summary.boards_saved, 1);
    assert_eq!(stored_totals(&db_path).categories, 6);
}

#[tokio::test]
async fn test_page_without_rounds_saves_nothing() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("empty.db");

    mount_season(&mock_server, 4, &[41]).await;
    mount_game(
        &mock_server,
        41,
        "<html><body><p>This game has not been archived yet.</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), sqlite_connection(&db_path));
    let summary = run_scrape(config, CrawlPlan::single(4))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.empty_pages, 1);
    assert_eq!(summary.boards_saved, 0);
    assert_eq!(stored_totals(&db_path), StoreTotals::default());
}

#[tokio::test]
async fn test_descend_from_explicit_season() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("descend.db");

    // Season 9 is empty, so the walk ends after season 10
    mount_season(&mock_server, 10, &[1001]).await;
    mount_season(&mock_server, 9, &[]).await;
    mount_game(&mock_server, 1001, game_page(&["X"])).await;

    let config = create_test_config(&mock_server.uri(), sqlite_connection(&db_path));
    let summary = run_scrape(config, CrawlPlan::descending_from(10))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.seasons_visited, 1);
    assert_eq!(summary.boards_saved, 1);
}

#[tokio::test]
async fn test_document_backend() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("clues.jsonl");

    mount_season(&mock_server, 1, &[101]).await;
    mount_game(&mock_server, 101, game_page(&["DOC"])).await;

    let connection = format!("jsonl://{}", out_path.display());
    let config = create_test_config(&mock_server.uri(), connection);
    let summary = run_scrape(config, CrawlPlan::single(1))
        .await
        .expect("Scrape failed");
    assert_eq!(summary.categories, 6);

    let sink = DocumentSink::new(&out_path);
    assert_eq!(
        sink.totals().unwrap(),
        StoreTotals {
            categories: 6,
            clues: 30
        }
    );

    let first_line = std::fs::read_to_string(&out_path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    let document: serde_json::Value = serde_json::from_str(&first_line).unwrap();
    assert!(document["category"]
        .as_str()
        .unwrap()
        .starts_with("DOC CATEGORY"));
    assert_eq!(document["clues"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_missing_landing_page_is_fatal() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");

    let config = create_test_config(&mock_server.uri(), sqlite_connection(&db_path));
    let result = run_scrape(config, CrawlPlan::everything()).await;

    assert!(matches!(result, Err(ScrapeError::SeasonDiscovery(_))));
    assert_eq!(stored_totals(&db_path), StoreTotals::default());
}

#[tokio::test]
async fn test_storage_connection_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    // Nothing may be fetched when storage cannot be opened
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        &mock_server.uri(),
        "sqlite:////nonexistent-dir/for/sure/clues.db".to_string(),
    );
    let result = run_scrape(config, CrawlPlan::single(1)).await;

    assert!(matches!(result, Err(ScrapeError::Storage(_))));
}

#[tokio::test]
async fn test_unsupported_backend_is_rejected() {
    let config = create_test_config("http://127.0.0.1:9", "mongodb://localhost:27017".to_string());
    let result = run_scrape(config, CrawlPlan::single(1)).await;

    assert!(matches!(result, Err(ScrapeError::Config(_))));
}
