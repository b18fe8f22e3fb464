// In-memory sample source
use crate::application::sample_source::{SampleSource, SourceError};
use crate::domain::sample::{DailySample, Metric};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Samples held in memory, sorted by date per metric.
#[derive(Debug, Clone, Default)]
pub struct MemorySampleSource {
    samples: HashMap<Metric, Vec<DailySample>>,
}

impl MemorySampleSource {
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (Metric, DailySample)>,
    {
        let mut source = Self::default();
        for (metric, sample) in samples {
            source.samples.entry(metric).or_default().push(sample);
        }
        for list in source.samples.values_mut() {
            list.sort_by_key(|s| s.date);
        }
        source
    }

    pub fn len(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SampleSource for MemorySampleSource {
    async fn fetch_samples(
        &self,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySample>, SourceError> {
        Ok(self
            .samples
            .get(&metric)
            .map(|list| {
                list.iter()
                    .filter(|s| s.date >= start && s.date <= end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn earliest_sample_date(&self, metric: Metric) -> Result<Option<NaiveDate>, SourceError> {
        Ok(self
            .samples
            .get(&metric)
            .and_then(|list| list.first())
            .map(|s| s.date))
    }
}
