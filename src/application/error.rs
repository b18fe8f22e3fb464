// Pipeline errors surfaced to callers
use super::art_service::LoadedSeries;
use super::preference_store::PreferenceError;
use super::sample_source::SourceError;
use crate::domain::range::TimeRange;
use crate::domain::sample::Metric;
use crate::presentation::raster::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every fetch failed; there is nothing to draw.
    #[error("{metric} samples unavailable: {source}")]
    SourceUnavailable {
        metric: Metric,
        #[source]
        source: SourceError,
    },
    /// Some year chunks failed. `partial` holds what did load.
    #[error("{metric} samples only partially loaded: {source}")]
    Partial {
        metric: Metric,
        partial: Box<LoadedSeries>,
        #[source]
        source: SourceError,
    },
    #[error("range {range} needs more history than is recorded")]
    RangeUnavailable { range: TimeRange },
    #[error(transparent)]
    Preferences(#[from] PreferenceError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Data that loaded despite the failure, if any.
    pub fn partial(&self) -> Option<&LoadedSeries> {
        match self {
            PipelineError::Partial { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
