pub mod error;

pub use error::{ClientError, Result};

use std::time::Duration;

use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_USER_AGENT: &str = "wikirace-bot/0.1 (link-navigation game bot)";

pub struct WikiClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikiClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of the article page for `name`.
    pub fn article_url(&self, name: &str) -> String {
        format!("{}/wiki/{}", self.base_url, name.trim_start_matches('/'))
    }

    /// Fetch the rendered HTML of an article.
    ///
    /// Returns `Ok(None)` on 404 so callers can treat a missing article as a
    /// normal answer rather than a transport failure.
    pub async fn article_html(&self, name: &str) -> Result<Option<String>> {
        let url = self.article_url(name);
        debug!(url = url.as_str(), "Fetching article");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(url = url.as_str(), "Article not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        debug!(url = url.as_str(), bytes = body.len(), "Fetched article");
        Ok(Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> WikiClient {
        WikiClient::new(base, DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base() {
        let c = client("https://en.wikipedia.org/");
        assert_eq!(c.base_url(), "https://en.wikipedia.org");
    }

    #[test]
    fn article_url_joins_name_under_wiki_path() {
        let c = client(DEFAULT_BASE_URL);
        assert_eq!(
            c.article_url("Iranian_Revolution"),
            "https://en.wikipedia.org/wiki/Iranian_Revolution"
        );
    }

    #[test]
    fn article_url_tolerates_leading_slash() {
        let c = client("http://localhost:8080");
        assert_eq!(c.article_url("/Cat"), "http://localhost:8080/wiki/Cat");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let c = WikiClient::new("http://127.0.0.1:9", DEFAULT_USER_AGENT, Duration::from_millis(500))
            .unwrap();
        let err = c.article_html("Cat").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
