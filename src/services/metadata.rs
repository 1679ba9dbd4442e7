//! ISBN metadata lookup against Open Library

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::MetadataConfig,
    error::{AppError, AppResult},
};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Bibliographic data resolved for an ISBN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Source of bibliographic data for ISBN-driven book creation
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve `isbn`; `None` when the source has no usable record
    async fn lookup(&self, isbn: &str) -> Option<BookMetadata>;
}

#[derive(Debug, Deserialize)]
struct EditionResponse {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    name: Option<String>,
}

#[derive(Clone)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &MetadataConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::MetadataLookup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_edition(&self, isbn: &str) -> Result<Option<EditionResponse>, reqwest::Error> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);
        tracing::debug!("Fetching edition {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!("Edition lookup for {} returned {}", isbn, response.status());
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// Author name for an Open Library key like `/authors/OL123A`
    async fn fetch_author_name(&self, key: &str) -> Option<String> {
        let url = format!("{}{}.json", self.base_url, key);
        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => response,
            Ok(response) => {
                tracing::debug!("Author lookup {} returned {}", key, response.status());
                return None;
            }
            Err(e) => {
                tracing::warn!("Author lookup {} failed: {}", key, e);
                return None;
            }
        };

        match response.json::<AuthorResponse>().await {
            Ok(author) => author.name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Author lookup {} returned an unreadable body: {}", key, e);
                None
            }
        }
    }
}

#[async_trait]
impl MetadataProvider for OpenLibraryClient {
    async fn lookup(&self, isbn: &str) -> Option<BookMetadata> {
        let edition = match self.fetch_edition(isbn).await {
            Ok(Some(edition)) => edition,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Open Library lookup for {} failed: {}", isbn, e);
                return None;
            }
        };

        let mut names = Vec::new();
        for author in &edition.authors {
            if let Some(name) = self.fetch_author_name(&author.key).await {
                names.push(name);
            }
        }

        Some(BookMetadata {
            title: edition
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: join_authors(&names),
            isbn: isbn.to_string(),
        })
    }
}

/// Comma-separated author list, or the placeholder when none resolved
pub fn join_authors(names: &[String]) -> String {
    if names.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_authors() {
        assert_eq!(join_authors(&[]), "Unknown Author");
        assert_eq!(
            join_authors(&["Terry Pratchett".to_string(), "Neil Gaiman".to_string()]),
            "Terry Pratchett, Neil Gaiman"
        );
    }

    #[test]
    fn test_unreachable_service_is_absent() {
        let client = OpenLibraryClient::new(&MetadataConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9");

        let result = tokio_test::block_on(client.lookup("1234567890"));
        assert!(result.is_none());
    }
}
