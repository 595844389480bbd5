use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting publication extraction");

        let extracted = self.pipeline.extract().await?;
        let authors_attempted = extracted.attempted;
        let skipped_authors = extracted.skipped_authors.clone();
        tracing::info!(
            "Fetched {} of {} authors",
            extracted.authors.len(),
            authors_attempted
        );

        let table = self.pipeline.transform(extracted).await?;
        let rows_emitted = table.len();
        tracing::info!("Collected {} publications in target years", rows_emitted);

        let output_path = self.pipeline.load(table).await?;
        tracing::info!("Report written to {}", output_path);

        if !skipped_authors.is_empty() {
            tracing::warn!(
                "Skipped {} author(s): {}",
                skipped_authors.len(),
                skipped_authors.join(", ")
            );
        }
        tracing::info!("Data extraction complete");

        Ok(RunSummary {
            authors_attempted,
            skipped_authors,
            rows_emitted,
            output_path,
        })
    }
}
