// JSON export sample source
use crate::application::sample_source::{SampleSource, SourceError};
use crate::domain::sample::{DailySample, Metric};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

/// One record of the export: `{"metric": "steps", "date": "2025-03-01", "value": 8421}`.
#[derive(Debug, Clone, Deserialize)]
struct SampleRecord {
    metric: Metric,
    date: NaiveDate,
    value: f64,
}

/// Reads a JSON array of sample records on every query.
///
/// Several records for the same day are passed through as-is; the
/// aggregator sums them.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_records(&self) -> Result<Vec<SampleRecord>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| self.io_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, err: impl std::fmt::Display) -> SourceError {
        SourceError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl SampleSource for JsonFileSource {
    async fn fetch_samples(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySample>, SourceError> {
        let samples: Vec<DailySample> = self
            .read_records()
            .await?
            .into_iter()
            .filter(|r| r.metric == metric && r.date >= start && r.date <= end)
            .map(|r| DailySample::new(r.date, r.value))
            .collect();
        tracing::debug!(%metric, %start, %end, count = samples.len(), path = %self.path.display(), "read samples");
        Ok(samples)
    }

    async fn earliest_sample_date(&self, metric: Metric) -> Result<Option<NaiveDate>, SourceError> {
        Ok(self
            .read_records()
            .await?
            .into_iter()
            .filter(|r| r.metric == metric)
            .map(|r| r.date)
            .min())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn export(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_reads_matching_records() {
        let file = export(
            r#"[
                {"metric": "steps", "date": "2025-03-02", "value": 900},
                {"metric": "distance", "date": "2025-03-01", "value": 1200.5},
                {"metric": "steps", "date": "2025-02-27", "value": 400},
                {"metric": "steps", "date": "2025-03-02", "value": 100}
            ]"#,
        );
        let source = JsonFileSource::new(file.path());

        let steps = source.fetch_samples(Metric::Steps, date(3, 1), date(3, 31)).await.unwrap();
        assert_eq!(steps, vec![DailySample::new(date(3, 2), 900.0), DailySample::new(date(3, 2), 100.0)]);
        assert_eq!(source.earliest_sample_date(Metric::Steps).await.unwrap(), Some(date(2, 27)));
        assert_eq!(source.earliest_sample_date(Metric::Sleep).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));
        let err = source.earliest_sample_date(Metric::Steps).await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_malformed_json_is_io_error() {
        let file = export(r#"[{"metric": "steps", "date": "yesterday", "value": 1}]"#);
        let err = JsonFileSource::new(file.path())
            .fetch_samples(Metric::Steps, date(1, 1), date(12, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
