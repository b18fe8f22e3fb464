// Health metrics into generative art: aggregation, scaling and rendering
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
