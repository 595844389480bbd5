use crate::domain::model::{AuthorRecord, ExtractResult, Publication, ReportTable};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where `path` ends up, for log output and the engine's return value.
    fn location(&self, path: &str) -> String;
}

/// The bibliographic API as seen by the pipeline.
pub trait PublicationSource: Send + Sync {
    /// `Ok(None)` when the lookup answered without an author profile.
    fn author_profile(
        &self,
        author_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthorRecord>>> + Send;

    fn publications(
        &self,
        author_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Publication>>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<ReportTable>;
    async fn load(&self, table: ReportTable) -> Result<String>;
}
