// Domain layer - health samples, rollups and the pure chart math
pub mod aggregator;
pub mod axis;
pub mod odometer;
pub mod preferences;
pub mod range;
pub mod range_filter;
pub mod sample;
pub mod summary;
