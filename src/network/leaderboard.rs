//! Leaderboard HTTP Client
//!
//! Thin async wrapper over the leaderboard REST endpoints:
//!
//! - `GET  {base}/{game}/rankedlist`
//! - `POST {base}/{game}/{player}/score`
//!
//! The base URL itself answers the connectivity probe.

use std::time::Duration as StdDuration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use super::protocol::{parse_ranked_list, SubmitScoreRequest, WireScoreEntry};
use crate::config::LeaderboardConfig;
use crate::game::score::ScoreEntry;

/// Leaderboard request errors.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// No base URL configured.
    #[error("leaderboard is not configured")]
    NotConfigured,

    /// Transport failure or timeout.
    #[error("leaderboard request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("leaderboard returned {status}: {body}")]
    Status {
        /// HTTP status.
        status: StatusCode,
        /// Response text, for the log.
        body: String,
    },

    /// Response body was not the expected JSON.
    #[error("leaderboard response malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for one game's leaderboard.
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    http: Client,
    base_url: String,
    game_id: String,
}

impl LeaderboardClient {
    /// Build a client; fails with [`LeaderboardError::NotConfigured`] when
    /// no base URL is set.
    pub fn new(config: &LeaderboardConfig) -> Result<Self, LeaderboardError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or(LeaderboardError::NotConfigured)?;

        let http = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base_url, game_id: config.game_id.clone() })
    }

    /// Service root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ranked_list_url(&self) -> String {
        format!("{}/{}/rankedlist", self.base_url, self.game_id)
    }

    fn score_url(&self, username: &str) -> String {
        format!("{}/{}/{}/score", self.base_url, self.game_id, urlencoding::encode(username))
    }

    /// Fetch every entry of the leaderboard. Rows that do not parse are
    /// dropped.
    pub async fn fetch_ranked_list(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let url = self.ranked_list_url();
        debug!(%url, "Fetching ranked list");

        let response = self.http.get(&url).send().await?;
        let text = Self::check(response).await?;
        let rows: Vec<WireScoreEntry> = serde_json::from_str(&text)?;
        let entries = parse_ranked_list(rows);

        debug!(count = entries.len(), "Ranked list received");
        Ok(entries)
    }

    /// Post one run's statistics under the entry's username.
    pub async fn submit_score(&self, entry: &ScoreEntry) -> Result<(), LeaderboardError> {
        let url = self.score_url(&entry.username);
        let body = SubmitScoreRequest::from(entry);

        let response = self.http.post(&url).json(&body).send().await?;
        Self::check(response).await?;

        info!(username = %entry.username, "Score submitted");
        Ok(())
    }

    /// Whether the service is reachable. Any HTTP answer counts.
    pub async fn ping(&self) -> bool {
        match self.http.get(&self.base_url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Leaderboard unreachable");
                false
            }
        }
    }

    async fn check(response: reqwest::Response) -> Result<String, LeaderboardError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(LeaderboardError::Status { status, body })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response and report the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            // Headers, then as much body as Content-Length announces
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            tx.send(String::from_utf8_lossy(&raw).to_string()).ok();
        });

        (format!("http://{addr}"), rx)
    }

    fn config(base_url: String) -> LeaderboardConfig {
        LeaderboardConfig { base_url: Some(base_url), ..LeaderboardConfig::default() }
    }

    #[test]
    fn test_requires_base_url() {
        let err = LeaderboardClient::new(&LeaderboardConfig::default()).unwrap_err();
        assert!(matches!(err, LeaderboardError::NotConfigured));
    }

    #[test]
    fn test_urls() {
        let client = LeaderboardClient::new(&config("http://scores.test/api/".into())).unwrap();
        assert_eq!(client.ranked_list_url(), "http://scores.test/api/ARTreasureHunt/rankedlist");
        assert_eq!(
            client.score_url("Ada Lovelace"),
            "http://scores.test/api/ARTreasureHunt/Ada%20Lovelace/score"
        );
    }

    #[tokio::test]
    async fn test_fetch_ranked_list() {
        let (url, request) = serve_once(
            "200 OK",
            r#"[{"playerID":"ada","highscore":"1","totalTime":"700","puzzleTime":"100","distance":"5","hints":"0","skips":"0"}]"#,
        )
        .await;
        let client = LeaderboardClient::new(&config(url)).unwrap();

        let entries = client.fetch_ranked_list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "ada");

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /ARTreasureHunt/rankedlist "));
    }

    #[tokio::test]
    async fn test_submit_score_posts_json() {
        let (url, request) = serve_once("200 OK", "{}").await;
        let client = LeaderboardClient::new(&config(url)).unwrap();
        let entry = ScoreEntry {
            username: "ada".into(),
            highscore: "1".into(),
            total_time_secs: 700,
            puzzle_time_secs: 100,
            distance_meters: 5,
            hints: 0,
            skips: 0,
        };

        client.submit_score(&entry).await.unwrap();
        let request = request.await.unwrap();
        assert!(request.starts_with("POST /ARTreasureHunt/ada/score "));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#""scoreEntries""#));
    }

    #[tokio::test]
    async fn test_error_status() {
        let (url, _request) = serve_once("500 Internal Server Error", "boom").await;
        let client = LeaderboardClient::new(&config(url)).unwrap();
        let err = client.fetch_ranked_list().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::Status { status, .. } if status.as_u16() == 500));
    }
}
