// Main entry point - Dependency injection and art export
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Local};
use tracing_subscriber::EnvFilter;

use genart_health::application::art_service::ArtService;
use genart_health::application::error::PipelineError;
use genart_health::application::preference_service::UserPreferences;
use genart_health::domain::range_filter::RangeFilter;
use genart_health::domain::sample::Metric;
use genart_health::infrastructure::config::load_app_config;
use genart_health::infrastructure::json_source::JsonFileSource;
use genart_health::infrastructure::png_export::write_png;
use genart_health::infrastructure::preference_store::TomlPreferenceStore;
use genart_health::presentation::raster::RasterImage;
use genart_health::presentation::widget::WidgetFamily;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;
    let today = Local::now().date_naive();
    let ticker_range = config.ticker.range()?;

    // Create source and store (infrastructure layer)
    let source = Arc::new(JsonFileSource::new(&config.source.path));
    let store = Arc::new(TomlPreferenceStore::new(&config.preferences.path));

    // Create services (application layer)
    let art_service = ArtService::new(source, RangeFilter::new(config.calendar.week_start()?));
    let preferences = UserPreferences::open(store, today)?;
    let prefs = match art_service
        .reconcile_start_year(&preferences, Metric::Distance, today)
        .await
    {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!(error = %e, "could not check selectable years");
            preferences.snapshot()?
        }
    };

    tracing::info!(
        source = %config.source.path.display(),
        output = %config.output.dir.display(),
        start_year = prefs.start_year,
        end_year = prefs.end_year,
        "rendering art"
    );
    let out = config.output.dir.as_path();
    let render = &config.render;

    let odometer = art_service.odometer(&prefs, today).await.and_then(|art| {
        tracing::info!(reading = %art.reading(render.digit_count, render.fraction_digits), caption = %art.caption, "odometer");
        Ok(art.render(render.odometer.image_size(), render.digit_count, render.fraction_digits)?)
    });
    save(out, "odometer.png", odometer).await?;

    for family in WidgetFamily::ALL {
        let snapshot = art_service.widget_snapshot(family, &prefs, today).await;
        save(out, &format!("widget_{}.png", family.as_str()), snapshot).await?;
    }

    let step_art = art_service
        .step_art(today.year(), prefs.step_goal, today)
        .await
        .and_then(|art| {
            tracing::info!(
                year = art.year,
                total = art.total_steps,
                average = art.average_per_day.unwrap_or(0.0),
                "step art"
            );
            Ok(art.render(render.step_art.image_size())?)
        });
    save(out, &format!("steps_{}.png", today.year()), step_art).await?;

    let ticker = art_service
        .ticker(config.ticker.metric, ticker_range, prefs.use_imperial_units, today)
        .await
        .and_then(|art| Ok(art.render(render.ticker.image_size())?));
    save(
        out,
        &format!("ticker_{}_{}.png", config.ticker.metric, ticker_range.label().to_lowercase()),
        ticker,
    )
    .await?;

    Ok(())
}

/// Write a rendered piece, or log why there is nothing to write.
async fn save(dir: &Path, name: &str, image: Result<RasterImage, PipelineError>) -> anyhow::Result<()> {
    match image {
        Ok(image) => write_png(&image, &dir.join(name)).await,
        Err(e) => {
            tracing::warn!(piece = name, error = %e, "skipping");
            Ok(())
        }
    }
}
