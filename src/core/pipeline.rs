use crate::adapters::spreadsheet;
use crate::config::report_config::ReportConfig;
use crate::core::{Pipeline, PublicationSource, Storage};
use crate::domain::model::{AuthorPublications, ExtractResult, ReportTable};
use crate::utils::error::Result;
use url::Url;

/// Author identifier from a profile link such as
/// `https://www.scopus.com/authid/detail.uri?authorId=57223100630`.
/// A bare numeric identifier is accepted as is.
pub fn author_id_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    if !link.is_empty() && link.chars().all(|c| c.is_ascii_digit()) {
        return Some(link.to_string());
    }

    if let Ok(url) = Url::parse(link) {
        if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "authorId") {
            return Some(value.into_owned()).filter(|id| !id.is_empty());
        }
    }

    let (_, rest) = link.rsplit_once("authorId=")?;
    let id = rest.split(['&', '#']).next().unwrap_or_default();
    (!id.is_empty()).then(|| id.to_string())
}

pub struct ScopusPipeline<S: Storage, P: PublicationSource> {
    storage: S,
    source: P,
    config: ReportConfig,
}

impl<S: Storage, P: PublicationSource> ScopusPipeline<S, P> {
    pub fn new(storage: S, source: P, config: ReportConfig) -> Self {
        Self {
            storage,
            source,
            config,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Identifiers for the configured profile links, in order; links without one are logged and dropped.
    pub fn author_ids(&self) -> Vec<String> {
        self.config
            .profile_links
            .iter()
            .filter_map(|link| {
                let id = author_id_from_link(link);
                if id.is_none() {
                    tracing::warn!("No author id in profile link '{}', skipping", link);
                }
                id
            })
            .collect()
    }

    /// Profile lookup followed by the publication search. `Ok(None)` when the API has no profile.
    pub async fn fetch_author(&self, author_id: &str) -> Result<Option<AuthorPublications>> {
        let Some(author) = self.source.author_profile(author_id).await? else {
            return Ok(None);
        };
        tracing::debug!("Resolved author_id {} to '{}'", author_id, author.display_name);

        let publications = self.source.publications(author_id).await?;
        Ok(Some(AuthorPublications {
            author,
            publications,
        }))
    }

    /// `fetch_author` with every failure logged; `None` means the author is skipped.
    async fn fetch_or_skip(&self, author_id: &str) -> Option<AuthorPublications> {
        match self.fetch_author(author_id).await {
            Ok(Some(author)) => Some(author),
            Ok(None) => {
                tracing::warn!(
                    "No 'author-retrieval-response' found for author_id {}",
                    author_id
                );
                None
            }
            Err(e) if e.is_request_failure() => {
                tracing::error!("An error occurred for author_id {}: {}", author_id, e);
                None
            }
            Err(e) => {
                tracing::warn!("Skipping author_id {}: {}", author_id, e);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, P: PublicationSource> Pipeline for ScopusPipeline<S, P> {
    async fn extract(&self) -> Result<ExtractResult> {
        let author_ids = self.author_ids();
        let delay = self.config.author_delay();
        let mut result = ExtractResult::default();

        for (index, author_id) in author_ids.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            tracing::info!("Processing author_id: {}", author_id);
            result.attempted += 1;

            match self.fetch_or_skip(author_id).await {
                Some(author) => result.authors.push(author),
                None => result.skipped_authors.push(author_id.clone()),
            }
        }

        Ok(result)
    }

    async fn transform(&self, data: ExtractResult) -> Result<ReportTable> {
        let mut table = ReportTable::new();

        for author in &data.authors {
            let rows = author.rows_for_years(&self.config.target_years);
            tracing::debug!(
                "{}: {} of {} publications in target years",
                author.author.display_name,
                rows.len(),
                author.publications.len()
            );
            table.extend(rows);
        }

        Ok(table)
    }

    async fn load(&self, table: ReportTable) -> Result<String> {
        let file_name = self.config.resolved_output_file();
        let format = self.config.output_format();

        let data = spreadsheet::render(&table, format)?;
        tracing::debug!(
            "Writing {} rows as {:?} ({} bytes) to {}",
            table.len(),
            format,
            data.len(),
            file_name
        );
        self.storage.write_file(&file_name, &data).await?;

        Ok(self.storage.location(&file_name))
    }
}
