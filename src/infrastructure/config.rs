use crate::domain::range::TimeRange;
use crate::domain::sample::Metric;
use crate::presentation::raster::ImageSize;
use chrono::Weekday;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/genart.toml";
const ENV_PREFIX: &str = "GENART";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub preferences: PreferenceSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub ticker: TickerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    /// JSON array of `{metric, date, value}` records.
    pub path: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/samples.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreferenceSettings {
    pub path: PathBuf,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/preferences.toml"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SizeSettings {
    pub width: u32,
    pub height: u32,
}

impl SizeSettings {
    const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn image_size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderSettings {
    pub odometer: SizeSettings,
    pub step_art: SizeSettings,
    pub ticker: SizeSettings,
    pub digit_count: usize,
    pub fraction_digits: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            odometer: SizeSettings::new(676, 316),
            step_art: SizeSettings::new(600, 600),
            ticker: SizeSettings::new(800, 400),
            digit_count: 8,
            fraction_digits: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalendarSettings {
    pub week_start: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            week_start: "sunday".to_string(),
        }
    }
}

impl CalendarSettings {
    pub fn week_start(&self) -> anyhow::Result<Weekday> {
        self.week_start
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown weekday: {}", self.week_start))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerSettings {
    pub metric: Metric,
    pub range: String,
}

impl Default for TickerSettings {
    fn default() -> Self {
        Self {
            metric: Metric::Steps,
            range: "1M".to_string(),
        }
    }
}

impl TickerSettings {
    pub fn range(&self) -> anyhow::Result<TimeRange> {
        self.range.parse().map_err(anyhow::Error::msg)
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from(Path::new(DEFAULT_CONFIG_PATH))
}

/// Read `path` (optional) with `GENART__SECTION__KEY` environment overrides.
pub fn load_app_config_from(path: &Path) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
