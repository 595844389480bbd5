//! Elsevier Scopus API client: author retrieval and Scopus search.

use crate::config::report_config::ReportConfig;
use crate::core::throttle::RequestThrottle;
use crate::domain::model::{AuthorRecord, Publication};
use crate::domain::ports::PublicationSource;
use crate::utils::error::{ReportError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const API_KEY_HEADER: &str = "X-ELS-APIKey";
const AUTHOR_PATH: &str = "/content/author";
const SEARCH_PATH: &str = "/content/search/scopus";

#[derive(Debug, Deserialize)]
struct AuthorRetrievalEnvelope {
    #[serde(rename = "author-retrieval-response")]
    response: Option<Vec<AuthorRetrieval>>,
}

#[derive(Debug, Deserialize)]
struct AuthorRetrieval {
    #[serde(rename = "author-profile")]
    profile: Option<AuthorProfile>,
}

#[derive(Debug, Deserialize)]
struct AuthorProfile {
    #[serde(rename = "preferred-name")]
    preferred_name: Option<PreferredName>,
}

#[derive(Debug, Deserialize)]
struct PreferredName {
    #[serde(rename = "given-name")]
    given_name: Option<String>,
    surname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "search-results", default)]
    results: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    entry: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEntry {
    #[serde(rename = "dc:title")]
    title: Option<String>,
    #[serde(rename = "prism:coverDate")]
    cover_date: Option<String>,
    #[serde(rename = "citedby-count")]
    cited_by_count: Option<CountValue>,
}

/// The API sends counts as strings, but accept plain numbers too.
/// Anything else decodes as `Other` so one odd entry cannot fail the whole page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountValue {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

impl CountValue {
    fn as_count(&self) -> Option<u64> {
        match self {
            CountValue::Number(n) => Some(*n),
            CountValue::Text(s) => s.trim().parse().ok(),
            CountValue::Other(_) => None,
        }
    }
}

/// Year component of a cover date such as `2023-05-01`.
pub(crate) fn cover_year(cover_date: &str) -> Option<i32> {
    if let Ok(date) = chrono::NaiveDate::parse_from_str(cover_date, "%Y-%m-%d") {
        return Some(chrono::Datelike::year(&date));
    }
    let prefix = cover_date.get(..4)?;
    if prefix.chars().all(|c| c.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

impl SearchEntry {
    fn into_publication(self, author_id: &str) -> Option<Publication> {
        // the API answers an empty search with a single entry carrying only an "error" field
        let Some(cover_date) = self.cover_date else {
            tracing::debug!("Skipping entry without cover date for author_id {}", author_id);
            return None;
        };
        let Some(year) = cover_year(&cover_date) else {
            tracing::debug!(
                "Skipping entry with unparseable cover date '{}' for author_id {}",
                cover_date,
                author_id
            );
            return None;
        };
        let Some(title) = self.title else {
            tracing::warn!(
                "Skipping {} entry without a title for author_id {}",
                year,
                author_id
            );
            return None;
        };
        let citations = self
            .cited_by_count
            .as_ref()
            .and_then(CountValue::as_count)
            .unwrap_or(0);

        Some(Publication {
            title,
            year,
            citations,
        })
    }
}

fn author_from_envelope(
    author_id: &str,
    envelope: AuthorRetrievalEnvelope,
) -> Result<Option<AuthorRecord>> {
    let Some(retrievals) = envelope.response else {
        return Ok(None);
    };

    let malformed = |message: &str| ReportError::MalformedResponse {
        author_id: author_id.to_string(),
        message: message.to_string(),
    };

    let name = retrievals
        .into_iter()
        .next()
        .ok_or_else(|| malformed("empty author-retrieval-response"))?
        .profile
        .ok_or_else(|| malformed("missing author-profile"))?
        .preferred_name
        .ok_or_else(|| malformed("missing preferred-name"))?;

    let display_name = [name.given_name, name.surname]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if display_name.is_empty() {
        return Err(malformed("preferred-name has neither given-name nor surname"));
    }

    Ok(Some(AuthorRecord {
        identifier: author_id.to_string(),
        display_name,
    }))
}

pub struct ScopusClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
    sort: String,
    throttle: RequestThrottle,
}

impl ScopusClient {
    pub fn new(config: &ReportConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
            sort: config.sort.clone(),
            throttle: RequestThrottle::new(config.min_request_interval()),
        })
    }

    /// Every request goes through here: wait for the throttle, send, fail on non-2xx.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.throttle.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("API response status: {}", response.status());
        Ok(response.json().await?)
    }
}

impl PublicationSource for ScopusClient {
    async fn author_profile(&self, author_id: &str) -> Result<Option<AuthorRecord>> {
        let envelope: AuthorRetrievalEnvelope = self
            .get_json(AUTHOR_PATH, &[("author_id", author_id.to_string())])
            .await?;
        author_from_envelope(author_id, envelope)
    }

    async fn publications(&self, author_id: &str) -> Result<Vec<Publication>> {
        let query = [
            ("query", format!("au-id({})", author_id)),
            ("count", self.page_size.to_string()),
            ("sort", self.sort.clone()),
        ];
        let envelope: SearchEnvelope = self.get_json(SEARCH_PATH, &query).await?;

        let entries = envelope.results.map(|r| r.entry).unwrap_or_default();
        tracing::debug!("{} search entries for author_id {}", entries.len(), author_id);

        Ok(entries
            .into_iter()
            .filter_map(|entry| entry.into_publication(author_id))
            .collect())
    }
}
