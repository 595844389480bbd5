use serde::{Deserialize, Serialize};

/// A researcher profile as resolved from the author lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub identifier: String,
    pub display_name: String,
}

/// One search-result entry after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub title: String,
    pub year: i32,
    pub citations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPublications {
    pub author: AuthorRecord,
    pub publications: Vec<Publication>,
}

impl AuthorPublications {
    /// Rows for the publications whose year is one of `target_years`, in API order.
    pub fn rows_for_years(&self, target_years: &[i32]) -> Vec<PublicationRow> {
        self.publications
            .iter()
            .filter(|p| target_years.contains(&p.year))
            .map(|p| PublicationRow {
                faculty_name: self.author.display_name.clone(),
                paper_title: p.title.clone(),
                citations: p.citations,
                year: p.year,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRow {
    #[serde(rename = "Faculty Name")]
    pub faculty_name: String,
    #[serde(rename = "Paper Title")]
    pub paper_title: String,
    #[serde(rename = "Citations")]
    pub citations: u64,
    #[serde(rename = "Year")]
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    pub rows: Vec<PublicationRow>,
}

impl ReportTable {
    pub const COLUMNS: [&'static str; 4] = ["Faculty Name", "Paper Title", "Citations", "Year"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = PublicationRow>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of the extract phase: what was fetched plus which authors were dropped.
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub authors: Vec<AuthorPublications>,
    pub skipped_authors: Vec<String>,
    pub attempted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub authors_attempted: usize,
    pub skipped_authors: Vec<String>,
    pub rows_emitted: usize,
    pub output_path: String,
}
