pub mod etl;
pub mod pipeline;
pub mod throttle;

pub use crate::domain::model::{ExtractResult, ReportTable};
pub use crate::domain::ports::{Pipeline, PublicationSource, Storage};
pub use crate::utils::error::Result;
