// Sample source trait for health data access
use crate::domain::sample::{DailySample, Metric};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("access to {metric} samples was denied")]
    AccessDenied { metric: Metric },
    #[error("sample provider failed: {0}")]
    Provider(String),
    #[error("cannot read samples from {path}: {message}")]
    Io { path: String, message: String },
}

#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Daily totals for `metric` with dates in `[start, end]`.
    ///
    /// Days without data are simply absent. A window that begins before the
    /// earliest record is not an error.
    async fn fetch_samples(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySample>, SourceError>;

    /// Date of the first recorded sample, `None` when nothing was ever recorded.
    async fn earliest_sample_date(&self, metric: Metric) -> Result<Option<NaiveDate>, SourceError>;
}
