//! Archive page discovery
//!
//! Parses the archive's landing page and season listings to find:
//! - the latest season number (`showseason.php?season=N`)
//! - the game page URLs of a season

use crate::crawler::fetcher::PageFetcher;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static SEASON_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"showseason\.php\?season=(\d+)").expect("valid regex"));

/// URL of a season's listing page
pub fn season_url(base_url: &Url, season: u32) -> String {
    match base_url.join(&format!("showseason.php?season={}", season)) {
        Ok(url) => url.to_string(),
        Err(_) => format!(
            "{}/showseason.php?season={}",
            base_url.as_str().trim_end_matches('/'),
            season
        ),
    }
}

/// Parses the latest season number from the landing page
///
/// The landing page links the newest season first inside the
/// `table.fullpageheight` navigation table.
pub fn parse_current_season(html: &str) -> Option<u32> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("table.fullpageheight a[href]").ok()?;

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| {
            SEASON_HREF_RE
                .captures(href)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
}

/// Parses the game page URLs listed on a season page
///
/// Relative links are resolved against `base_url`. Links that cannot be
/// resolved are skipped.
pub fn parse_season_game_urls(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) =
        Selector::parse(r#"td[align="left"][valign="top"][style="width:140px"] a[href]"#)
    else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| match base_url.join(href.trim()) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("Skipping unresolvable game link {}: {}", href, e);
                None
            }
        })
        .collect()
}

/// Asks the archive for its latest season
///
/// Returns None if the landing page cannot be fetched or does not carry a
/// season marker.
pub async fn fetch_current_season(fetcher: &dyn PageFetcher, base_url: &Url) -> Option<u32> {
    let html = match fetcher.fetch(base_url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Failed to fetch landing page: {}", e);
            return None;
        }
    };

    let season = parse_current_season(&html);
    if season.is_none() {
        tracing::error!("Landing page at {} has no season marker", base_url);
    }
    season
}

/// Lists the game URLs of one season
///
/// Fetch failures are reported as an empty list, which callers treat as the
/// end of the archive.
pub async fn fetch_season_game_urls(
    fetcher: &dyn PageFetcher,
    base_url: &Url,
    season: u32,
) -> Vec<String> {
    let url = season_url(base_url, season);
    match fetcher.fetch(&url).await {
        Ok(html) => parse_season_game_urls(&html, base_url),
        Err(e) => {
            tracing::warn!(season, "Failed to fetch season listing: {}", e);
            Vec::new()
        }
    }
}
